use cierredash::models::{Equipo, FilaAgregada};
use cierredash::tablas::{
    formatear_conteo, formatear_monto, formatear_porcentaje, tabla_html, tabla_jerarquica,
};

fn fila(asesor: &str, equipo: Equipo, cartera: &str, monto: f64, clientes: usize) -> FilaAgregada {
    FilaAgregada {
        asesor: asesor.to_string(),
        equipo,
        cartera: cartera.to_string(),
        monto_total: monto,
        num_clientes: clientes,
    }
}

#[test]
fn test_encabezados_cuadran_con_sus_detalles() {
    let filas = vec![
        fila("Laura", Equipo::Worldtel, "A", 100.0, 1),
        fila("Juan", Equipo::GiCoronado, "A", 50.0, 1),
        fila("Laura", Equipo::Worldtel, "B", 40.0, 2),
    ];
    let tabla = tabla_jerarquica(&filas, false);

    let mut i = 0;
    while i < tabla.len() {
        assert!(tabla[i].es_encabezado, "cada sección abre con encabezado");
        let mut suma_monto = 0.0;
        let mut suma_clientes = 0;
        let mut j = i + 1;
        while j < tabla.len() && !tabla[j].es_encabezado {
            suma_monto += tabla[j].monto;
            suma_clientes += tabla[j].clientes;
            j += 1;
        }
        assert_eq!(tabla[i].monto, suma_monto, "monto del encabezado descuadrado");
        assert_eq!(tabla[i].clientes, suma_clientes);
        i = j;
    }
}

#[test]
fn test_orden_secciones_ascendente_detalles_descendente() {
    let filas = vec![
        fila("Zoe", Equipo::GiCoronado, "B", 10.0, 1),
        fila("Ana", Equipo::GiCoronado, "A", 5.0, 1),
        fila("Bruno", Equipo::GiCoronado, "A", 50.0, 1),
    ];
    let tabla = tabla_jerarquica(&filas, false);

    assert!(tabla[0].etiqueta.contains("A"), "la cartera A va primero");
    assert!(tabla[1].etiqueta.contains("Bruno"), "mayor monto primero");
    assert!(tabla[2].etiqueta.contains("Ana"));
    assert!(tabla[3].etiqueta.contains("B"));
    assert!(tabla[3].es_encabezado);
}

#[test]
fn test_escenario_concreto_cartera_compartida() {
    // Laura (WORLDTEL) y Juan (GI CORONADO) en la cartera "A": el encabezado
    // suma a ambos equipos
    let filas = vec![
        fila("Laura Villanueva Solayo", Equipo::Worldtel, "A", 100.0, 1),
        fila("Juan Perez", Equipo::GiCoronado, "A", 50.0, 1),
    ];
    let tabla = tabla_jerarquica(&filas, true);

    assert_eq!(tabla.len(), 3);
    assert_eq!(tabla[0].monto, 150.0);
    assert_eq!(tabla[0].clientes, 2);
    assert!(tabla[1].etiqueta.contains("(WORLDTEL)"));
    assert!(tabla[2].etiqueta.contains("(GI CORONADO)"));
}

#[test]
fn test_formato_de_moneda() {
    assert_eq!(formatear_monto(1234.5), "S/ 1,234.50");
    assert_eq!(formatear_monto(150.0), "S/ 150.00");
    assert_eq!(formatear_monto(1234567.891), "S/ 1,234,567.89");
    assert_eq!(formatear_monto(0.0), "S/ 0.00");
    assert_eq!(formatear_monto(-1234.5), "S/ -1,234.50");
    assert_eq!(formatear_monto(999.999), "S/ 1,000.00");
}

#[test]
fn test_formato_de_porcentaje_y_conteo() {
    assert_eq!(formatear_porcentaje(66.66666), "66.7%");
    assert_eq!(formatear_porcentaje(0.0), "0.0%");
    assert_eq!(formatear_porcentaje(100.0), "100.0%");
    assert_eq!(formatear_conteo(1234), "1,234");
    assert_eq!(formatear_conteo(42), "42");
}

#[test]
fn test_html_marca_encabezados_y_alinea_columnas() {
    let filas = vec![
        fila("Laura", Equipo::Worldtel, "A", 100.0, 1),
        fila("Juan", Equipo::GiCoronado, "A", 50.0, 1),
    ];
    let html = tabla_html(&tabla_jerarquica(&filas, false), "Cartera / Asesor", "Monto");

    assert!(html.contains("#fff3cd"), "fila de cartera resaltada");
    assert!(html.contains("text-align: right"), "monto a la derecha");
    assert!(html.contains("text-align: center"), "clientes centrados");
    assert!(html.contains("S/ 150.00"), "total de la cartera formateado");
    assert!(html.contains("S/ 100.00"));
}

#[test]
fn test_html_identico_en_dos_corridas() {
    let filas = vec![
        fila("Laura", Equipo::Worldtel, "B", 10.0, 1),
        fila("Ana", Equipo::GiCoronado, "A", 30.0, 2),
        fila("Juan", Equipo::GiCoronado, "A", 30.0, 1),
    ];
    let primera = tabla_html(&tabla_jerarquica(&filas, true), "Cartera / Asesor", "Monto ($)");
    let segunda = tabla_html(&tabla_jerarquica(&filas, true), "Cartera / Asesor", "Monto ($)");
    assert_eq!(primera, segunda);
}

#[test]
fn test_empates_conservan_orden_de_entrada() {
    let filas = vec![
        fila("Primero", Equipo::GiCoronado, "A", 30.0, 1),
        fila("Segundo", Equipo::GiCoronado, "A", 30.0, 1),
    ];
    let tabla = tabla_jerarquica(&filas, false);
    assert!(tabla[1].etiqueta.contains("Primero"));
    assert!(tabla[2].etiqueta.contains("Segundo"));
}
