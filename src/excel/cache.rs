//! Caché en memoria para lecturas de Excel costosas.
//!
//! A diferencia de un memo global, el caché es un objeto explícito que el
//! servidor construye y pasa al pipeline. La clave es (ruta, fecha de
//! modificación): si el archivo cambia en disco la entrada deja de coincidir
//! y se relee; si alguien reescribe el archivo sin que cambie el mtime, el
//! resultado queda obsoleto hasta invalidar a mano (igualdad de clave, no
//! hash de contenido — limitación asumida y documentada).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::errores::CargaError;

/// Clave de caché: la ruta más su fecha de modificación al momento de leer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaveCache {
    pub ruta: PathBuf,
    pub modificado: Option<SystemTime>,
}

impl ClaveCache {
    pub fn para(ruta: &Path) -> Self {
        ClaveCache {
            ruta: ruta.to_path_buf(),
            modificado: fs::metadata(ruta).ok().and_then(|m| m.modified().ok()),
        }
    }
}

/// Caché por ruta con valores compartidos vía `Arc`. El mutex se mantiene
/// sólo durante la consulta/inserción, nunca durante la lectura del archivo.
pub struct CacheExcel<T> {
    entradas: Mutex<HashMap<PathBuf, (ClaveCache, Arc<T>)>>,
}

impl<T> Default for CacheExcel<T> {
    fn default() -> Self {
        Self::nueva()
    }
}

impl<T> CacheExcel<T> {
    pub fn nueva() -> Self {
        CacheExcel {
            entradas: Mutex::new(HashMap::new()),
        }
    }

    /// Devuelve el valor cacheado si la clave (ruta, mtime) sigue vigente;
    /// si no, ejecuta `cargar`, guarda el resultado y lo devuelve. Un fallo
    /// de `cargar` no se cachea.
    pub fn obtener_o_cargar<F>(&self, ruta: &Path, cargar: F) -> Result<Arc<T>, CargaError>
    where
        F: FnOnce() -> Result<T, CargaError>,
    {
        let clave = ClaveCache::para(ruta);
        {
            let guardia = self.entradas.lock().expect("mutex del caché envenenado");
            if let Some((vigente, valor)) = guardia.get(ruta)
                && *vigente == clave
            {
                return Ok(Arc::clone(valor));
            }
        }

        let valor = Arc::new(cargar()?);
        let mut guardia = self.entradas.lock().expect("mutex del caché envenenado");
        guardia.insert(ruta.to_path_buf(), (clave, Arc::clone(&valor)));
        Ok(valor)
    }

    /// Elimina la entrada de una ruta; la próxima consulta relee el archivo.
    pub fn invalidar(&self, ruta: &Path) {
        let mut guardia = self.entradas.lock().expect("mutex del caché envenenado");
        guardia.remove(ruta);
    }

    pub fn limpiar(&self) {
        let mut guardia = self.entradas.lock().expect("mutex del caché envenenado");
        guardia.clear();
    }

    pub fn cuantas_entradas(&self) -> usize {
        self.entradas
            .lock()
            .expect("mutex del caché envenenado")
            .len()
    }
}
