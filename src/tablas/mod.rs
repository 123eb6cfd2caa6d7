//! Tablas jerárquicas (cartera como encabezado, asesores debajo) y su
//! renderizado a HTML, más los formatos de texto del informe:
//! montos "S/ 1,234.56" y porcentajes "66.7%".

use crate::models::FilaAgregada;

/// Una fila ya lista para mostrar: encabezado de sección (cartera, con sus
/// totales) o detalle (un asesor). Los totales del encabezado se calculan una
/// sola vez sobre los miembros de la sección; las cadenas formateadas son
/// copias de esos mismos valores, así que encabezado y detalles cuadran
/// exactamente.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FilaJerarquica {
    pub etiqueta: String,
    pub clientes: usize,
    pub monto: f64,
    pub es_encabezado: bool,
}

/// Construye la tabla jerárquica: carteras en orden lexicográfico ascendente;
/// dentro de cada cartera, asesores por monto descendente (orden estable, los
/// empates conservan el orden de entrada). Con `con_equipo` cada detalle
/// lleva el equipo entre paréntesis, como en la vista combinada.
pub fn tabla_jerarquica(filas: &[FilaAgregada], con_equipo: bool) -> Vec<FilaJerarquica> {
    let mut carteras: Vec<&str> = filas.iter().map(|f| f.cartera.as_str()).collect();
    carteras.sort_unstable();
    carteras.dedup();

    let mut tabla = Vec::new();
    for cartera in carteras {
        let miembros: Vec<&FilaAgregada> =
            filas.iter().filter(|f| f.cartera == cartera).collect();

        let total_monto: f64 = miembros.iter().map(|m| m.monto_total).sum();
        let total_clientes: usize = miembros.iter().map(|m| m.num_clientes).sum();
        tabla.push(FilaJerarquica {
            etiqueta: format!("◼ {}", cartera),
            clientes: total_clientes,
            monto: total_monto,
            es_encabezado: true,
        });

        let mut orden = miembros;
        orden.sort_by(|a, b| {
            b.monto_total
                .partial_cmp(&a.monto_total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for m in orden {
            let etiqueta = if con_equipo {
                format!("    {} ({})", m.asesor, m.equipo)
            } else {
                format!("  {}", m.asesor)
            };
            tabla.push(FilaJerarquica {
                etiqueta,
                clientes: m.num_clientes,
                monto: m.monto_total,
                es_encabezado: false,
            });
        }
    }
    tabla
}

/// Renderiza la tabla jerárquica como `<table>` HTML con estilos en línea:
/// filas de cartera resaltadas (#fff3cd, negrita), monto a la derecha,
/// clientes centrados.
pub fn tabla_html(filas: &[FilaJerarquica], titulo: &str, etiqueta_monto: &str) -> String {
    let mut html = String::from("<table style='width:100%; border-collapse: collapse;'>\n");
    html.push_str("<tr style='background-color: #e8e8e8; font-weight: bold;'>");
    html.push_str(&format!(
        "<th style='padding: 10px; border: 1px solid #ddd; text-align: left;'>{}</th>",
        titulo
    ));
    html.push_str(
        "<th style='padding: 10px; border: 1px solid #ddd; text-align: center;'>Clientes</th>",
    );
    html.push_str(&format!(
        "<th style='padding: 10px; border: 1px solid #ddd; text-align: right;'>{}</th>",
        etiqueta_monto
    ));
    html.push_str("</tr>\n");

    for fila in filas {
        let (fondo, peso) = if fila.es_encabezado {
            ("#fff3cd", "bold")
        } else {
            ("#ffffff", "normal")
        };
        html.push_str(&format!(
            "<tr style='background-color: {}; font-weight: {};'>",
            fondo, peso
        ));
        html.push_str(&format!(
            "<td style='padding: 8px; border: 1px solid #ddd; white-space: pre;'>{}</td>",
            fila.etiqueta
        ));
        html.push_str(&format!(
            "<td style='padding: 8px; border: 1px solid #ddd; text-align: center;'>{}</td>",
            fila.clientes
        ));
        html.push_str(&format!(
            "<td style='padding: 8px; border: 1px solid #ddd; text-align: right;'>{}</td>",
            formatear_monto(fila.monto)
        ));
        html.push_str("</tr>\n");
    }

    html.push_str("</table>");
    html
}

/// Formato de moneda del informe: "S/ {monto:,.2f}" con separador de miles.
pub fn formatear_monto(valor: f64) -> String {
    let texto = format!("{:.2}", valor.abs());
    let (entero, decimales) = texto.split_once('.').unwrap_or((texto.as_str(), "00"));
    let signo = if valor < 0.0 { "-" } else { "" };
    format!("S/ {}{}.{}", signo, separar_miles(entero), decimales)
}

/// Formato de porcentaje del informe: "{valor:.1f}%".
pub fn formatear_porcentaje(valor: f64) -> String {
    format!("{:.1}%", valor)
}

/// Conteo con separador de miles, sin decimales (tarjetas de clientes).
pub fn formatear_conteo(valor: usize) -> String {
    separar_miles(&valor.to_string())
}

fn separar_miles(entero: &str) -> String {
    let digitos: Vec<char> = entero.chars().collect();
    let mut salida = String::with_capacity(digitos.len() + digitos.len() / 3);
    for (i, c) in digitos.iter().enumerate() {
        if i > 0 && (digitos.len() - i) % 3 == 0 {
            salida.push(',');
        }
        salida.push(*c);
    }
    salida
}
