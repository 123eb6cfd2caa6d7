//! Módulo `excel`: localización de los workbooks y parsing de sus hojas.
//!
//! Submódulos:
//! - `io`: helpers de lectura/parseo de celdas
//! - `cierres`: hoja "CIERRE DE PAGOS" → `Vec<Cierre>`
//! - `gestiones`: hoja "GESTIONES" → `Vec<Gestion>`
//! - `timming`: hoja "TIMMING NOVIEMBRE" → grilla cruda
//! - `cache`: memoización explícita por (ruta, fecha de modificación)

mod cierres;
mod gestiones;
mod io;
mod timming;

pub mod cache;

pub use cache::{CacheExcel, ClaveCache};
pub use cierres::{HOJA_CIERRE, leer_cierre_pagos};
pub use gestiones::{HOJA_GESTIONES, leer_gestiones};
pub use io::{celda_desde, cell_to_string, indice_columna, normalizar_encabezado};
pub use timming::{HOJA_TIMMING, leer_grilla_timming};

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errores::CargaError;

/// Nombre base del workbook principal (cierres + gestiones).
pub const NOMBRE_CIERRE: &str = "ANALISIS WORLDTEL";
/// Nombre base del workbook del cronograma de gastos.
pub const NOMBRE_TIMMING: &str = "TIMMING NOVIEMBRE";

/// Directorio donde buscar los workbooks: `CIERRE_XLSX_DIR` si está definido,
/// si no el directorio de trabajo actual.
pub fn directorio_datos() -> PathBuf {
    if let Ok(dir) = std::env::var("CIERRE_XLSX_DIR") {
        let p = PathBuf::from(dir);
        if p.exists() {
            return p;
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Archivos de bloqueo/temporales de Office (`~$...`), ocultos o backups.
pub fn es_archivo_temporal(nombre: &str) -> bool {
    nombre.starts_with("~$")
        || nombre.starts_with('.')
        || nombre.starts_with('~')
        || nombre.ends_with('~')
}

/// Localiza un workbook por nombre base: primero las rutas candidatas
/// explícitas (relativa, CWD, directorio de datos, HOME), luego cualquier
/// coincidencia de la búsqueda recursiva bajo el directorio de datos.
/// Devuelve la primera que exista y no sea un archivo temporal de Excel.
pub fn buscar_workbook(nombre_base: &str) -> Result<PathBuf, CargaError> {
    let dir = directorio_datos();
    let archivo = format!("{}.xlsx", nombre_base);

    let mut candidatas: Vec<PathBuf> = vec![
        PathBuf::from(&archivo),
        PathBuf::from(format!("./{}", archivo)),
        dir.join(&archivo),
    ];
    if let Ok(home) = std::env::var("HOME") {
        candidatas.push(
            PathBuf::from(home)
                .join("REPORTE MENSUAL WORLDTEL/DASHBOARD ANALISIS")
                .join(&archivo),
        );
    }
    buscar_recursivo(&dir, nombre_base, 6, &mut candidatas);

    for ruta in &candidatas {
        if let Some(nombre) = ruta.file_name().and_then(|s| s.to_str())
            && es_archivo_temporal(nombre)
        {
            continue;
        }
        if ruta.exists() && ruta.is_file() {
            return Ok(ruta.clone());
        }
    }

    Err(CargaError::ArchivoNoEncontrado {
        nombre: archivo,
        intentadas: candidatas,
    })
}

pub fn buscar_workbook_cierre() -> Result<PathBuf, CargaError> {
    buscar_workbook(NOMBRE_CIERRE)
}

pub fn buscar_workbook_timming() -> Result<PathBuf, CargaError> {
    buscar_workbook(NOMBRE_TIMMING)
}

/// Búsqueda recursiva de `.xlsx` cuyo nombre contenga `sustancia`, saltando
/// directorios ocultos, `target` y los temporales de Office.
fn buscar_recursivo(dir: &Path, sustancia: &str, profundidad: usize, salida: &mut Vec<PathBuf>) {
    if profundidad == 0 {
        return;
    }
    let entradas = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };
    for entrada in entradas.flatten() {
        let ruta = entrada.path();
        let nombre = match ruta.file_name().and_then(|s| s.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };
        if ruta.is_dir() {
            if !nombre.starts_with('.') && nombre != "target" {
                buscar_recursivo(&ruta, sustancia, profundidad - 1, salida);
            }
            continue;
        }
        if es_archivo_temporal(&nombre) {
            continue;
        }
        if nombre.to_lowercase().ends_with(".xlsx") && nombre.contains(sustancia) {
            salida.push(ruta);
        }
    }
}

/// Abre un workbook distinguiendo el caso "en uso por otra aplicación"
/// (PermissionDenied, típico de Excel con el archivo abierto) del resto de
/// fallos de lectura.
pub(crate) fn abrir_workbook(
    ruta: &Path,
) -> Result<calamine::Sheets<BufReader<fs::File>>, CargaError> {
    match calamine::open_workbook_auto(ruta) {
        Ok(wb) => Ok(wb),
        Err(calamine::Error::Io(e)) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(CargaError::ArchivoBloqueado {
                ruta: ruta.to_path_buf(),
            })
        }
        Err(e) => Err(CargaError::Lectura {
            ruta: ruta.to_path_buf(),
            fuente: e,
        }),
    }
}
