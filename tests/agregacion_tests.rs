use chrono::NaiveDate;

use cierredash::agregacion::{
    evolucion_pagos, monto_por_equipo, participacion, por_asesor, por_asesor_cartera, por_cartera,
    resumen_equipos, tasa_conversion,
};
use cierredash::equipos::ConfigEquipos;
use cierredash::models::{Cierre, Equipo};

fn cierre(asesor: &str, cartera: &str, monto: f64, razon: &str) -> Cierre {
    Cierre {
        asesor: asesor.to_string(),
        cartera: cartera.to_string(),
        monto,
        razon_social: razon.to_string(),
        fecha_pago: None,
    }
}

fn cierre_con_fecha(asesor: &str, monto: f64, fecha: (i32, u32, u32)) -> Cierre {
    Cierre {
        fecha_pago: NaiveDate::from_ymd_opt(fecha.0, fecha.1, fecha.2),
        ..cierre(asesor, "A", monto, "E")
    }
}

#[test]
fn test_escenario_concreto_dos_asesores() {
    // Escenario de referencia: Laura (WORLDTEL) y Juan (GI CORONADO) en la
    // cartera "A"
    let cierres = vec![
        cierre("Laura Villanueva Solayo", "A", 100.0, "E1"),
        cierre("Juan Perez", "A", 50.0, "E2"),
    ];
    let config = ConfigEquipos::default();

    let agregados = por_asesor_cartera(&cierres, &config);
    assert_eq!(agregados.len(), 2);
    let laura = agregados
        .iter()
        .find(|f| f.asesor == "Laura Villanueva Solayo")
        .unwrap();
    assert_eq!(laura.equipo, Equipo::Worldtel);
    let juan = agregados.iter().find(|f| f.asesor == "Juan Perez").unwrap();
    assert_eq!(juan.equipo, Equipo::GiCoronado);

    assert_eq!(monto_por_equipo(&cierres, &config, Equipo::Worldtel), 100.0);
    assert_eq!(monto_por_equipo(&cierres, &config, Equipo::GiCoronado), 50.0);

    let pct = participacion(100.0, 50.0);
    assert!((pct - 66.66666).abs() < 0.01);
    assert_eq!(format!("{:.1}%", pct), "66.7%");
}

#[test]
fn test_conservacion_de_montos_por_equipo() {
    // La suma de los agregados de un equipo debe igualar la suma de sus
    // cierres, sin doble conteo entre carteras
    let cierres = vec![
        cierre("Laura Villanueva Solayo", "A", 100.0, "E1"),
        cierre("Laura Villanueva Solayo", "B", 40.0, "E1"),
        cierre("Juan Jose Felix Ventura", "A", 25.5, "E2"),
        cierre("Juan Perez", "B", 10.0, "E3"),
        cierre("Maria Lopez", "A", 7.25, "E4"),
    ];
    let config = ConfigEquipos::default();
    let agregados = por_asesor_cartera(&cierres, &config);

    for equipo in [Equipo::Worldtel, Equipo::GiCoronado] {
        let suma_agregada: f64 = agregados
            .iter()
            .filter(|f| f.equipo == equipo)
            .map(|f| f.monto_total)
            .sum();
        let suma_directa = monto_por_equipo(&cierres, &config, equipo);
        assert!(
            (suma_agregada - suma_directa).abs() < 1e-9,
            "descuadre en {}: {} vs {}",
            equipo,
            suma_agregada,
            suma_directa
        );
    }
}

#[test]
fn test_clientes_distintos_por_grupo() {
    let cierres = vec![
        cierre("Ana", "A", 10.0, "E1"),
        cierre("Ana", "A", 20.0, "E1"),
        cierre("Ana", "A", 30.0, "E2"),
        cierre("Ana", "B", 5.0, "E1"),
    ];
    let config = ConfigEquipos::nueva(vec!["Ana".to_string()]);
    let agregados = por_asesor_cartera(&cierres, &config);

    let en_a = agregados.iter().find(|f| f.cartera == "A").unwrap();
    assert_eq!(en_a.num_clientes, 2, "E1 repetido no debe contar dos veces");
    assert_eq!(en_a.monto_total, 60.0);
    let en_b = agregados.iter().find(|f| f.cartera == "B").unwrap();
    assert_eq!(en_b.num_clientes, 1);
}

#[test]
fn test_cartera_moda_y_desempate_por_primera_aparicion() {
    let cierres = vec![
        cierre("Ana", "B", 1.0, "E1"),
        cierre("Ana", "A", 1.0, "E2"),
        cierre("Ana", "B", 1.0, "E3"),
    ];
    let config = ConfigEquipos::nueva(vec!["Ana".to_string()]);
    let asesores = por_asesor(&cierres, &config);
    assert_eq!(asesores.len(), 1);
    assert_eq!(asesores[0].cartera_moda, "B", "B es la más frecuente");
    assert_eq!(asesores[0].monto_total, 3.0);
    assert_eq!(asesores[0].num_clientes, 3);

    // Empate 1-1: gana la primera encontrada en el orden de entrada
    let empate = vec![cierre("Ana", "B", 1.0, "E1"), cierre("Ana", "A", 1.0, "E2")];
    let asesores = por_asesor(&empate, &config);
    assert_eq!(asesores[0].cartera_moda, "B");
}

#[test]
fn test_resumen_equipos_siempre_trae_los_dos() {
    let cierres = vec![cierre("Laura Villanueva Solayo", "A", 100.0, "E1")];
    let config = ConfigEquipos::default();
    let resumen = resumen_equipos(&por_asesor(&cierres, &config));

    assert_eq!(resumen.len(), 2);
    assert_eq!(resumen[0].equipo, Equipo::Worldtel);
    assert_eq!(resumen[0].monto_total, 100.0);
    assert_eq!(resumen[0].num_asesores, 1);
    assert_eq!(resumen[1].equipo, Equipo::GiCoronado);
    assert_eq!(resumen[1].monto_total, 0.0);
    assert_eq!(resumen[1].num_asesores, 0);
}

#[test]
fn test_por_cartera() {
    let cierres = vec![
        cierre("Laura Villanueva Solayo", "A", 100.0, "E1"),
        cierre("Juan Perez", "A", 50.0, "E2"),
        cierre("Juan Perez", "B", 25.0, "E2"),
    ];
    let config = ConfigEquipos::default();
    let carteras = por_cartera(&cierres, &config);

    assert_eq!(carteras.len(), 3);
    let a_wl = carteras
        .iter()
        .find(|c| c.cartera == "A" && c.equipo == Equipo::Worldtel)
        .unwrap();
    assert_eq!(a_wl.monto_total, 100.0);
    let a_gi = carteras
        .iter()
        .find(|c| c.cartera == "A" && c.equipo == Equipo::GiCoronado)
        .unwrap();
    assert_eq!(a_gi.monto_total, 50.0);
}

#[test]
fn test_tasa_conversion_acotada_y_cero_sin_proyeccion() {
    assert_eq!(tasa_conversion(0.0, 0.0), 0.0);
    assert_eq!(tasa_conversion(100.0, 0.0), 100.0);
    assert_eq!(tasa_conversion(0.0, 100.0), 0.0);

    for (recaudado, promesas) in [(1.0, 3.0), (50.0, 50.0), (0.01, 1000.0)] {
        let pct = tasa_conversion(recaudado, promesas);
        assert!(
            (0.0..=100.0).contains(&pct),
            "conversión fuera de rango: {}",
            pct
        );
    }
}

#[test]
fn test_evolucion_acumulada_por_equipo() {
    let cierres = vec![
        cierre_con_fecha("Laura Villanueva Solayo", 100.0, (2024, 1, 2)),
        cierre_con_fecha("Laura Villanueva Solayo", 50.0, (2024, 1, 1)),
        cierre_con_fecha("Juan Perez", 30.0, (2024, 1, 1)),
        // sin fecha: no participa de la evolución
        cierre("Laura Villanueva Solayo", "A", 999.0, "E9"),
    ];
    let config = ConfigEquipos::default();
    let evolucion = evolucion_pagos(&cierres, &config);

    assert_eq!(evolucion.len(), 3);
    // orden cronológico
    assert!(evolucion.windows(2).all(|w| w[0].fecha <= w[1].fecha));

    let wl: Vec<_> = evolucion
        .iter()
        .filter(|p| p.equipo == Equipo::Worldtel)
        .collect();
    assert_eq!(wl[0].monto_diario, 50.0);
    assert_eq!(wl[0].monto_acumulado, 50.0);
    assert_eq!(wl[1].monto_diario, 100.0);
    assert_eq!(wl[1].monto_acumulado, 150.0);

    let gi: Vec<_> = evolucion
        .iter()
        .filter(|p| p.equipo == Equipo::GiCoronado)
        .collect();
    assert_eq!(gi[0].monto_acumulado, 30.0);
}

#[test]
fn test_idempotencia_de_la_agregacion() {
    let cierres = vec![
        cierre("Laura Villanueva Solayo", "B", 10.0, "E1"),
        cierre("Juan Perez", "A", 20.0, "E2"),
        cierre("Laura Villanueva Solayo", "A", 30.0, "E3"),
    ];
    let config = ConfigEquipos::default();

    let primera = serde_json::to_string(&por_asesor_cartera(&cierres, &config)).unwrap();
    let segunda = serde_json::to_string(&por_asesor_cartera(&cierres, &config)).unwrap();
    assert_eq!(primera, segunda, "dos corridas deben ser idénticas byte a byte");
}
