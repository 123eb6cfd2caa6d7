//! Lectura de la hoja "GESTIONES".

use std::path::Path;

use calamine::{Data, Reader};

use crate::errores::CargaError;
use crate::excel::io::{cell_to_string, fecha_celda, indice_columna, normalizar_encabezado, numero_celda};
use crate::models::Gestion;

pub const HOJA_GESTIONES: &str = "GESTIONES";

const COLUMNAS_REQUERIDAS: [&str; 4] =
    ["GESTOR", "FECHA_GESTION", "FECHA_PROMESA", "MONTO_PROMESA"];

/// Lee las gestiones con promesa. Una gestión sólo es válida si trae gestor,
/// ambas fechas y un monto de promesa > 0; las demás se descartan aquí,
/// antes de cualquier agregación. Si no queda ninguna fila válida — incluida
/// una hoja que sólo trae el encabezado — el resultado es `SinDatos` y la
/// sección del informe degrada a su aviso en lugar de mostrar ceros.
pub fn leer_gestiones(ruta: &Path) -> Result<Vec<Gestion>, CargaError> {
    let mut workbook = crate::excel::abrir_workbook(ruta)?;

    let hojas = workbook.sheet_names().to_owned();
    if !hojas.iter().any(|s| s == HOJA_GESTIONES) {
        return Err(CargaError::HojaFaltante {
            hoja: HOJA_GESTIONES.to_string(),
            ruta: ruta.to_path_buf(),
            disponibles: hojas,
        });
    }
    let range = workbook
        .worksheet_range(HOJA_GESTIONES)
        .map_err(|e| CargaError::HojaMalformada {
            hoja: HOJA_GESTIONES.to_string(),
            detalle: e.to_string(),
        })?;

    let mut filas = range.rows();
    let encabezado = filas.next().ok_or_else(|| CargaError::HojaMalformada {
        hoja: HOJA_GESTIONES.to_string(),
        detalle: "la hoja está vacía".to_string(),
    })?;
    let encabezados: Vec<String> = encabezado
        .iter()
        .map(|c| normalizar_encabezado(&cell_to_string(c)))
        .collect();

    for columna in COLUMNAS_REQUERIDAS {
        if indice_columna(&encabezados, columna).is_none() {
            return Err(CargaError::HojaMalformada {
                hoja: HOJA_GESTIONES.to_string(),
                detalle: format!("falta la columna '{}'", columna),
            });
        }
    }
    let idx_gestor = indice_columna(&encabezados, "GESTOR").unwrap();
    let idx_gestion = indice_columna(&encabezados, "FECHA_GESTION").unwrap();
    let idx_promesa = indice_columna(&encabezados, "FECHA_PROMESA").unwrap();
    let idx_monto = indice_columna(&encabezados, "MONTO_PROMESA").unwrap();

    let mut gestiones = Vec::new();
    for fila in filas {
        let gestor = cell_to_string(fila.get(idx_gestor).unwrap_or(&Data::Empty));
        let fecha_gestion = fecha_celda(fila.get(idx_gestion).unwrap_or(&Data::Empty));
        let fecha_promesa = fecha_celda(fila.get(idx_promesa).unwrap_or(&Data::Empty));
        let monto_promesa = numero_celda(fila.get(idx_monto).unwrap_or(&Data::Empty));

        let (Some(fecha_gestion), Some(fecha_promesa), Some(monto_promesa)) =
            (fecha_gestion, fecha_promesa, monto_promesa)
        else {
            continue;
        };
        if gestor.is_empty() || monto_promesa <= 0.0 {
            continue;
        }

        gestiones.push(Gestion {
            gestor,
            fecha_gestion,
            fecha_promesa,
            monto_promesa,
        });
    }

    if gestiones.is_empty() {
        return Err(CargaError::SinDatos {
            hoja: HOJA_GESTIONES.to_string(),
        });
    }
    Ok(gestiones)
}
