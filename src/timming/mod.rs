//! Extracción del cronograma TIMMING desde la grilla cruda.
//!
//! La hoja "TIMMING NOVIEMBRE" no trae encabezados: contiene cuatro
//! sub-tablas embebidas en posiciones fijas. Ese acuerdo de layout con la
//! planilla se declara aquí como ventanas nombradas (rango de filas y
//! columna inicial) en lugar de índices sueltos, y se valida contra las
//! dimensiones reales de la grilla antes de extraer nada.

use chrono::NaiveDate;

use crate::errores::CargaError;
use crate::models::{Celda, Grilla};

/// Etiquetas de las cinco columnas de cada sub-tabla, en su orden fijo.
pub const COLUMNAS_TIMMING: [&str; 5] =
    ["DIA_HABIL", "FECHA", "TIMMING", "META_DIA", "META_ACUMULADA"];

/// Una ventana declarada dentro de la grilla: filas [fila_inicio, fila_fin)
/// y cinco columnas a partir de `col_inicio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct VentanaTimming {
    pub nombre: &'static str,
    pub fila_inicio: usize,
    pub fila_fin: usize,
    pub col_inicio: usize,
}

impl VentanaTimming {
    pub fn col_fin(&self) -> usize {
        self.col_inicio + COLUMNAS_TIMMING.len()
    }
}

/// Las cuatro sub-tablas del cronograma: gasto general y gasto por asesor,
/// para las dos categorías de gasto.
pub const VENTANAS: [VentanaTimming; 4] = [
    VentanaTimming {
        nombre: "GASTO GENERAL",
        fila_inicio: 2,
        fila_fin: 34,
        col_inicio: 0,
    },
    VentanaTimming {
        nombre: "GASTO GENERAL POR ASESOR",
        fila_inicio: 2,
        fila_fin: 34,
        col_inicio: 6,
    },
    VentanaTimming {
        nombre: "GASTO FIJO",
        fila_inicio: 38,
        fila_fin: 70,
        col_inicio: 0,
    },
    VentanaTimming {
        nombre: "GASTO FIJO POR ASESOR",
        fila_inicio: 38,
        fila_fin: 70,
        col_inicio: 6,
    },
];

/// Una fila del cronograma ya tipada.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FilaTimming {
    pub dia_habil: i64,
    pub fecha: Option<NaiveDate>,
    pub ratio: f64,
    pub meta_dia: f64,
    pub meta_acumulada: f64,
}

/// Una sub-tabla extraída, con el nombre de su ventana.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TablaTimming {
    pub nombre: &'static str,
    pub filas: Vec<FilaTimming>,
}

impl TablaTimming {
    /// Meta acumulada de la última fila (la meta total de la sub-tabla).
    pub fn meta_final(&self) -> Option<f64> {
        self.filas.last().map(|f| f.meta_acumulada)
    }
}

/// Verifica que la grilla sea al menos tan grande como la ventana. Fallar
/// aquí de forma explícita evita extraer basura cuando la planilla cambió de
/// forma.
pub fn validar_ventana(ventana: &VentanaTimming, grilla: &Grilla) -> Result<(), CargaError> {
    let filas = grilla.len();
    let columnas = grilla.iter().map(|f| f.len()).max().unwrap_or(0);
    if filas < ventana.fila_fin || columnas < ventana.col_fin() {
        return Err(CargaError::VentanaFueraDeRango {
            ventana: ventana.nombre.to_string(),
            filas,
            columnas,
        });
    }
    Ok(())
}

/// Extrae una ventana de la grilla. Sólo conserva las filas cuyo índice de
/// día hábil es numérico; las filas en blanco o de pie de tabla dentro de la
/// ventana se saltan. Una ventana donde ninguna fila parsea devuelve una
/// tabla vacía, no un error.
pub fn extraer_ventana(
    grilla: &Grilla,
    ventana: &VentanaTimming,
) -> Result<TablaTimming, CargaError> {
    validar_ventana(ventana, grilla)?;

    let mut filas = Vec::new();
    for fila in &grilla[ventana.fila_inicio..ventana.fila_fin] {
        let celda = |col: usize| fila.get(ventana.col_inicio + col).unwrap_or(&Celda::Vacia);

        let dia_habil = match celda(0).como_entero() {
            Some(d) => d,
            None => continue,
        };
        filas.push(FilaTimming {
            dia_habil,
            fecha: celda(1).como_fecha(),
            ratio: celda(2).como_numero().unwrap_or(0.0),
            meta_dia: celda(3).como_numero().unwrap_or(0.0),
            meta_acumulada: celda(4).como_numero().unwrap_or(0.0),
        });
    }

    Ok(TablaTimming {
        nombre: ventana.nombre,
        filas,
    })
}

/// Extrae las cuatro sub-tablas declaradas en `VENTANAS`.
pub fn extraer_todas(grilla: &Grilla) -> Result<Vec<TablaTimming>, CargaError> {
    VENTANAS
        .iter()
        .map(|v| extraer_ventana(grilla, v))
        .collect()
}

/// Meta acumulada esperada a la fecha `hoy`: se ordenan las filas con fecha
/// por fecha ascendente y se toma la última con fecha <= hoy. El orden se
/// impone aquí; una planilla desordenada no produce un resultado equivocado
/// en silencio.
pub fn esperado_a_fecha(tabla: &TablaTimming, hoy: NaiveDate) -> Option<f64> {
    let mut con_fecha: Vec<(NaiveDate, f64)> = tabla
        .filas
        .iter()
        .filter_map(|f| f.fecha.map(|fecha| (fecha, f.meta_acumulada)))
        .collect();
    con_fecha.sort_by_key(|(fecha, _)| *fecha);

    con_fecha
        .iter()
        .rev()
        .find(|(fecha, _)| *fecha <= hoy)
        .map(|(_, meta)| *meta)
}
