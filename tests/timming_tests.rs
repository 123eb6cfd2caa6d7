use chrono::NaiveDate;

use cierredash::errores::CargaError;
use cierredash::models::{Celda, Grilla};
use cierredash::timming::{
    COLUMNAS_TIMMING, VENTANAS, VentanaTimming, esperado_a_fecha, extraer_todas, extraer_ventana,
    validar_ventana,
};

fn fecha(a: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(a, m, d).unwrap()
}

fn fila_cronograma(dia: f64, fecha: NaiveDate, ratio: f64, meta: f64, acum: f64) -> Vec<Celda> {
    vec![
        Celda::Numero(dia),
        Celda::Fecha(fecha),
        Celda::Numero(ratio),
        Celda::Numero(meta),
        Celda::Numero(acum),
    ]
}

fn ventana_chica() -> VentanaTimming {
    VentanaTimming {
        nombre: "GASTO GENERAL",
        fila_inicio: 1,
        fila_fin: 4,
        col_inicio: 0,
    }
}

#[test]
fn test_ventanas_declaradas() {
    assert_eq!(VENTANAS.len(), 4);
    assert_eq!(COLUMNAS_TIMMING.len(), 5);
    for ventana in &VENTANAS {
        assert!(ventana.fila_inicio < ventana.fila_fin);
        assert_eq!(ventana.col_fin(), ventana.col_inicio + 5);
    }
    // Las sub-tablas "por asesor" comparten filas con la general
    assert_eq!(VENTANAS[0].fila_inicio, VENTANAS[1].fila_inicio);
    assert_eq!(VENTANAS[2].fila_inicio, VENTANAS[3].fila_inicio);
}

#[test]
fn test_grilla_chica_no_pasa_validacion() {
    // Una grilla de 3x2 no alcanza para ninguna ventana real
    let grilla: Grilla = vec![vec![Celda::Vacia; 2]; 3];
    let error = validar_ventana(&VENTANAS[0], &grilla).unwrap_err();
    match error {
        CargaError::VentanaFueraDeRango {
            ventana,
            filas,
            columnas,
        } => {
            assert_eq!(ventana, "GASTO GENERAL");
            assert_eq!(filas, 3);
            assert_eq!(columnas, 2);
        }
        otro => panic!("error inesperado: {:?}", otro),
    }

    let error = extraer_todas(&grilla).unwrap_err();
    assert!(matches!(error, CargaError::VentanaFueraDeRango { .. }));
}

#[test]
fn test_extraccion_salta_filas_no_numericas() {
    let grilla: Grilla = vec![
        vec![Celda::Texto("DIA".into()), Celda::Texto("FECHA".into())],
        fila_cronograma(1.0, fecha(2024, 11, 4), 0.05, 100.0, 100.0),
        // pie de tabla dentro de la ventana: se salta
        vec![Celda::Texto("TOTAL".into()), Celda::Vacia],
        fila_cronograma(2.0, fecha(2024, 11, 5), 0.07, 140.0, 240.0),
    ];
    let tabla = extraer_ventana(&grilla, &ventana_chica()).unwrap();

    assert_eq!(tabla.filas.len(), 2);
    assert_eq!(tabla.filas[0].dia_habil, 1);
    assert_eq!(tabla.filas[0].fecha, Some(fecha(2024, 11, 4)));
    assert_eq!(tabla.filas[1].meta_acumulada, 240.0);
    assert_eq!(tabla.meta_final(), Some(240.0));
}

#[test]
fn test_ventana_sin_filas_validas_da_tabla_vacia() {
    let grilla: Grilla = vec![
        vec![Celda::Vacia; 5],
        vec![Celda::Texto("x".into()); 5],
        vec![Celda::Vacia; 5],
        vec![Celda::Texto("TOTAL".into()); 5],
    ];
    let tabla = extraer_ventana(&grilla, &ventana_chica()).unwrap();
    assert!(tabla.filas.is_empty());
    assert_eq!(tabla.meta_final(), None);
}

#[test]
fn test_celdas_faltantes_valen_cero() {
    // Fila corta: sólo día hábil y fecha; el resto se completa con 0
    let grilla: Grilla = vec![
        vec![Celda::Vacia; 5],
        vec![Celda::Numero(1.0), Celda::Fecha(fecha(2024, 11, 4))],
        vec![Celda::Vacia; 5],
        vec![Celda::Vacia; 5],
    ];
    let tabla = extraer_ventana(&grilla, &ventana_chica()).unwrap();
    assert_eq!(tabla.filas.len(), 1);
    assert_eq!(tabla.filas[0].ratio, 0.0);
    assert_eq!(tabla.filas[0].meta_dia, 0.0);
    assert_eq!(tabla.filas[0].meta_acumulada, 0.0);
}

#[test]
fn test_esperado_a_fecha_toma_la_ultima_cumplida() {
    let grilla: Grilla = vec![
        vec![Celda::Vacia; 5],
        fila_cronograma(1.0, fecha(2024, 11, 4), 0.05, 100.0, 100.0),
        fila_cronograma(2.0, fecha(2024, 11, 5), 0.07, 140.0, 240.0),
        fila_cronograma(3.0, fecha(2024, 11, 6), 0.08, 160.0, 400.0),
    ];
    let tabla = extraer_ventana(&grilla, &ventana_chica()).unwrap();

    assert_eq!(esperado_a_fecha(&tabla, fecha(2024, 11, 5)), Some(240.0));
    // Entre fechas: vale la anterior
    assert_eq!(esperado_a_fecha(&tabla, fecha(2024, 11, 4)), Some(100.0));
    // Después del cronograma: la meta final
    assert_eq!(esperado_a_fecha(&tabla, fecha(2024, 12, 1)), Some(400.0));
    // Antes de toda fecha: nada que reportar
    assert_eq!(esperado_a_fecha(&tabla, fecha(2024, 11, 1)), None);
}

#[test]
fn test_esperado_a_fecha_ordena_planilla_desordenada() {
    // Las filas llegan fuera de orden cronológico: el resultado no cambia
    let grilla: Grilla = vec![
        vec![Celda::Vacia; 5],
        fila_cronograma(3.0, fecha(2024, 11, 6), 0.08, 160.0, 400.0),
        fila_cronograma(1.0, fecha(2024, 11, 4), 0.05, 100.0, 100.0),
        fila_cronograma(2.0, fecha(2024, 11, 5), 0.07, 140.0, 240.0),
    ];
    let tabla = extraer_ventana(&grilla, &ventana_chica()).unwrap();
    assert_eq!(esperado_a_fecha(&tabla, fecha(2024, 11, 5)), Some(240.0));
}
