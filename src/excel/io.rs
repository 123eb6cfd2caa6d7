//! Helpers de IO y utilidades para parsing de Excel.

use calamine::Data;
use chrono::{Duration, NaiveDate};

use crate::models::Celda;

/// Convierte un `Data` de calamine a String (versión genérica para celdas).
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Convierte un `Data` de calamine a nuestra `Celda` tipada. Las fechas
/// seriales de Excel se convierten a fecha de calendario; el resto mantiene
/// su tipo natural.
pub fn celda_desde(d: &Data) -> Celda {
    match d {
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Celda::Vacia
            } else {
                Celda::Texto(s.to_string())
            }
        }
        Data::Float(f) => Celda::Numero(*f),
        Data::Int(i) => Celda::Numero(*i as f64),
        Data::Bool(b) => Celda::Numero(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => match fecha_desde_serial(dt.as_f64()) {
            Some(f) => Celda::Fecha(f),
            None => Celda::Vacia,
        },
        Data::DateTimeIso(s) => match NaiveDate::parse_from_str(&s[..s.len().min(10)], "%Y-%m-%d")
        {
            Ok(f) => Celda::Fecha(f),
            Err(_) => Celda::Texto(s.clone()),
        },
        Data::DurationIso(s) => Celda::Texto(s.clone()),
        Data::Empty | Data::Error(_) => Celda::Vacia,
    }
}

/// Fecha de pago u otra fecha opcional directamente desde un `Data`.
pub fn fecha_celda(d: &Data) -> Option<NaiveDate> {
    celda_desde(d).como_fecha()
}

/// Monto numérico desde un `Data`; acepta texto con separadores de miles.
pub fn numero_celda(d: &Data) -> Option<f64> {
    celda_desde(d).como_numero()
}

/// Fecha de calendario desde un serial de Excel (sistema 1900).
fn fecha_desde_serial(serial: f64) -> Option<NaiveDate> {
    if serial <= 0.0 {
        return None;
    }
    // Base 1899-12-30: compensa el día fantasma 1900-02-29 de Excel
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Normaliza encabezados eliminando espacios y pasando a minúsculas.
pub fn normalizar_encabezado(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Busca el índice de la columna cuyo encabezado normalizado coincide.
pub fn indice_columna(encabezados: &[String], nombre: &str) -> Option<usize> {
    let objetivo = normalizar_encabezado(nombre);
    encabezados.iter().position(|h| *h == objetivo)
}
