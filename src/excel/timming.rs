//! Lectura de la hoja "TIMMING NOVIEMBRE" como grilla cruda.
//!
//! La hoja no tiene fila de encabezados: el módulo `timming` extrae de la
//! grilla las cuatro sub-tablas declaradas por ventanas fijas.

use std::path::Path;

use calamine::Reader;

use crate::errores::CargaError;
use crate::excel::io::celda_desde;
use crate::models::Grilla;

pub const HOJA_TIMMING: &str = "TIMMING NOVIEMBRE";

pub fn leer_grilla_timming(ruta: &Path) -> Result<Grilla, CargaError> {
    let mut workbook = crate::excel::abrir_workbook(ruta)?;

    let hojas = workbook.sheet_names().to_owned();
    if !hojas.iter().any(|s| s == HOJA_TIMMING) {
        return Err(CargaError::HojaFaltante {
            hoja: HOJA_TIMMING.to_string(),
            ruta: ruta.to_path_buf(),
            disponibles: hojas,
        });
    }
    let range = workbook
        .worksheet_range(HOJA_TIMMING)
        .map_err(|e| CargaError::HojaMalformada {
            hoja: HOJA_TIMMING.to_string(),
            detalle: e.to_string(),
        })?;

    Ok(range
        .rows()
        .map(|fila| fila.iter().map(celda_desde).collect())
        .collect())
}
