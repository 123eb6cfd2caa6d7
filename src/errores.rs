//! Taxonomía de errores de carga del informe.
//!
//! Los errores sobre el dataset fundamental (CIERRE DE PAGOS) detienen el
//! render completo; los de datasets secundarios (GESTIONES, TIMMING) sólo
//! degradan su propia sección a un aviso de "sin datos".

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CargaError {
    /// Ninguna ruta candidata existe. Se reportan todas las intentadas para
    /// que el usuario sepa dónde colocar el archivo.
    #[error("no se encontró el archivo '{nombre}'; rutas intentadas: {intentadas:?}")]
    ArchivoNoEncontrado {
        nombre: String,
        intentadas: Vec<PathBuf>,
    },

    /// El archivo existe pero otra aplicación lo tiene abierto (normalmente
    /// Excel). El usuario debe cerrarlo y recargar la página.
    #[error(
        "el archivo '{}' está siendo utilizado por otra aplicación (probablemente Excel); ciérralo y recarga la página",
        .ruta.display()
    )]
    ArchivoBloqueado { ruta: PathBuf },

    /// La hoja requerida no existe en el workbook. Se listan las hojas que
    /// sí existen para que el usuario vea con qué archivo está tratando.
    #[error(
        "la hoja '{hoja}' no existe en '{}'; hojas disponibles: {disponibles:?}",
        .ruta.display()
    )]
    HojaFaltante {
        hoja: String,
        ruta: PathBuf,
        disponibles: Vec<String>,
    },

    /// La hoja existe pero sus columnas no coinciden con lo esperado.
    #[error("la hoja '{hoja}' no tiene el formato esperado: {detalle}")]
    HojaMalformada { hoja: String, detalle: String },

    /// La hoja existe pero todas sus filas quedaron descartadas por las
    /// reglas de validez.
    #[error("la hoja '{hoja}' quedó sin filas válidas tras el filtrado")]
    SinDatos { hoja: String },

    /// La grilla de TIMMING es más pequeña que una de las ventanas declaradas.
    #[error(
        "la ventana '{ventana}' excede la grilla de TIMMING ({filas} filas x {columnas} columnas)"
    )]
    VentanaFueraDeRango {
        ventana: String,
        filas: usize,
        columnas: usize,
    },

    /// Cualquier otro fallo de lectura del workbook.
    #[error("error al leer '{}': {fuente}", .ruta.display())]
    Lectura {
        ruta: PathBuf,
        #[source]
        fuente: calamine::Error,
    },
}

impl CargaError {
    /// Texto de remediación para mostrar junto al error en la página.
    pub fn sugerencia(&self) -> Option<&'static str> {
        match self {
            CargaError::ArchivoNoEncontrado { .. } => {
                Some("Coloca el archivo .xlsx junto al ejecutable o define CIERRE_XLSX_DIR")
            }
            CargaError::ArchivoBloqueado { .. } => {
                Some("Cierra el archivo en Excel y recarga la página")
            }
            _ => None,
        }
    }
}
