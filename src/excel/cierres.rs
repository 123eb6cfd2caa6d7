//! Lectura de la hoja "CIERRE DE PAGOS".

use std::path::Path;

use calamine::{Data, Reader};

use crate::errores::CargaError;
use crate::excel::io::{cell_to_string, fecha_celda, indice_columna, normalizar_encabezado, numero_celda};
use crate::models::Cierre;

pub const HOJA_CIERRE: &str = "CIERRE DE PAGOS";

/// Valor centinela de ASESOR que no pertenece a ningún equipo.
const ASESOR_ESTUDIO: &str = "ESTUDIO";

const COLUMNAS_REQUERIDAS: [&str; 4] = ["ASESOR", "CARTERA", "MONTO", "RAZON_SOCIAL"];

/// Lee los cierres de pago. Descarta en origen las filas con ASESOR vacío o
/// igual a "ESTUDIO"; FECHA_DE_PAGO es opcional por fila (y por planilla:
/// si la columna no existe, todos los cierres quedan sin fecha).
pub fn leer_cierre_pagos(ruta: &Path) -> Result<Vec<Cierre>, CargaError> {
    let mut workbook = crate::excel::abrir_workbook(ruta)?;

    let hojas = workbook.sheet_names().to_owned();
    if !hojas.iter().any(|s| s == HOJA_CIERRE) {
        return Err(CargaError::HojaFaltante {
            hoja: HOJA_CIERRE.to_string(),
            ruta: ruta.to_path_buf(),
            disponibles: hojas,
        });
    }
    let range = workbook
        .worksheet_range(HOJA_CIERRE)
        .map_err(|e| CargaError::HojaMalformada {
            hoja: HOJA_CIERRE.to_string(),
            detalle: e.to_string(),
        })?;

    let mut filas = range.rows();
    let encabezado = filas.next().ok_or_else(|| CargaError::HojaMalformada {
        hoja: HOJA_CIERRE.to_string(),
        detalle: "la hoja está vacía".to_string(),
    })?;
    let encabezados: Vec<String> = encabezado
        .iter()
        .map(|c| normalizar_encabezado(&cell_to_string(c)))
        .collect();

    for columna in COLUMNAS_REQUERIDAS {
        if indice_columna(&encabezados, columna).is_none() {
            return Err(CargaError::HojaMalformada {
                hoja: HOJA_CIERRE.to_string(),
                detalle: format!("falta la columna '{}'", columna),
            });
        }
    }
    let idx_asesor = indice_columna(&encabezados, "ASESOR").unwrap();
    let idx_cartera = indice_columna(&encabezados, "CARTERA").unwrap();
    let idx_monto = indice_columna(&encabezados, "MONTO").unwrap();
    let idx_razon = indice_columna(&encabezados, "RAZON_SOCIAL").unwrap();
    let idx_fecha = indice_columna(&encabezados, "FECHA_DE_PAGO");

    let mut cierres = Vec::new();
    for fila in filas {
        let asesor = cell_to_string(fila.get(idx_asesor).unwrap_or(&Data::Empty));
        if asesor.is_empty() || asesor == ASESOR_ESTUDIO {
            continue;
        }
        let cartera = cell_to_string(fila.get(idx_cartera).unwrap_or(&Data::Empty));
        let razon_social = cell_to_string(fila.get(idx_razon).unwrap_or(&Data::Empty));
        let monto = numero_celda(fila.get(idx_monto).unwrap_or(&Data::Empty)).unwrap_or(0.0);
        let fecha_pago =
            idx_fecha.and_then(|i| fecha_celda(fila.get(i).unwrap_or(&Data::Empty)));

        cierres.push(Cierre {
            asesor,
            cartera,
            monto,
            razon_social,
            fecha_pago,
        });
    }

    Ok(cierres)
}
