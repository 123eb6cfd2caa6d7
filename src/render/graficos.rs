//! Gráficos del informe como SVG en memoria (plotters), listos para
//! incrustarse en la página.

use std::error::Error;

use plotters::prelude::*;

use crate::models::{CarteraResumen, Equipo, PuntoEvolucion};

/// Azul del equipo WORLDTEL (el #1f77b4 del informe original).
pub const AZUL_WORLDTEL: RGBColor = RGBColor(31, 119, 180);
/// Naranja del equipo GI CORONADO (#ff7f0e).
pub const NARANJA_GI: RGBColor = RGBColor(255, 127, 14);

const TAMANO: (u32, u32) = (640, 440);

fn svg_vacio() -> String {
    String::from("<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'></svg>")
}

fn color_equipo(equipo: Equipo) -> RGBColor {
    match equipo {
        Equipo::Worldtel => AZUL_WORLDTEL,
        Equipo::GiCoronado => NARANJA_GI,
    }
}

fn etiqueta_segmento(segmento: &SegmentValue<i32>, nombres: &[String]) -> String {
    match segmento {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => nombres
            .get(*i as usize)
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// Barras verticales comparando los dos equipos (monto o clientes): una
/// barra azul y una naranja, en el orden de `datos`.
pub fn barras_comparativas(
    titulo: &str,
    eje_y: &str,
    datos: &[(String, f64)],
) -> Result<String, Box<dyn Error>> {
    if datos.is_empty() {
        return Ok(svg_vacio());
    }
    let nombres: Vec<String> = datos.iter().map(|(n, _)| n.clone()).collect();
    let maximo = datos.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let tope = if maximo > 0.0 { maximo * 1.15 } else { 1.0 };
    let n = datos.len() as i32;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, TAMANO).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(titulo, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(78)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..tope)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(datos.len())
            .x_label_formatter(&|s| etiqueta_segmento(s, &nombres))
            .y_desc(eje_y)
            .draw()?;
        chart.draw_series(datos.iter().enumerate().map(|(i, (_, valor))| {
            let color = if i % 2 == 0 { AZUL_WORLDTEL } else { NARANJA_GI };
            Rectangle::new(
                [
                    (SegmentValue::Exact(i as i32), 0.0),
                    (SegmentValue::Exact(i as i32 + 1), *valor),
                ],
                color.filled(),
            )
        }))?;
        root.present()?;
    }
    Ok(svg)
}

/// Barras horizontales de monto por asesor, de un solo equipo.
pub fn barras_asesores(
    titulo: &str,
    datos: &[(String, f64)],
    equipo: Equipo,
) -> Result<String, Box<dyn Error>> {
    if datos.is_empty() {
        return Ok(svg_vacio());
    }
    let nombres: Vec<String> = datos.iter().map(|(n, _)| n.clone()).collect();
    let maximo = datos.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let tope = if maximo > 0.0 { maximo * 1.15 } else { 1.0 };
    let n = datos.len() as i32;
    let color = color_equipo(equipo);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, TAMANO).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(titulo, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(190)
            .build_cartesian_2d(0f64..tope, (0..n).into_segmented())?;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(datos.len())
            .y_label_formatter(&|s| etiqueta_segmento(s, &nombres))
            .x_labels(6)
            .draw()?;
        chart.draw_series(datos.iter().enumerate().map(|(i, (_, valor))| {
            Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i as i32)),
                    (*valor, SegmentValue::Exact(i as i32 + 1)),
                ],
                color.filled(),
            )
        }))?;
        root.present()?;
    }
    Ok(svg)
}

/// Barras agrupadas por cartera: para cada cartera, la barra azul de
/// WORLDTEL y la naranja de GI CORONADO lado a lado.
pub fn barras_carteras(
    titulo: &str,
    carteras: &[CarteraResumen],
) -> Result<String, Box<dyn Error>> {
    if carteras.is_empty() {
        return Ok(svg_vacio());
    }
    let mut nombres: Vec<String> = carteras.iter().map(|c| c.cartera.clone()).collect();
    nombres.sort();
    nombres.dedup();

    let monto_de = |cartera: &str, equipo: Equipo| -> f64 {
        carteras
            .iter()
            .filter(|c| c.cartera == cartera && c.equipo == equipo)
            .map(|c| c.monto_total)
            .sum()
    };
    let maximo = carteras
        .iter()
        .map(|c| c.monto_total)
        .fold(0.0f64, f64::max);
    let tope = if maximo > 0.0 { maximo * 1.15 } else { 1.0 };
    let n = nombres.len();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, TAMANO).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(titulo, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(78)
            .build_cartesian_2d(-0.6f64..(n as f64 - 0.4), 0f64..tope)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| {
                let i = x.round();
                if i < 0.0 {
                    return String::new();
                }
                nombres.get(i as usize).cloned().unwrap_or_default()
            })
            .draw()?;
        chart.draw_series(nombres.iter().enumerate().map(|(i, cartera)| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.38, 0.0), (x - 0.02, monto_de(cartera, Equipo::Worldtel))],
                AZUL_WORLDTEL.filled(),
            )
        }))?;
        chart.draw_series(nombres.iter().enumerate().map(|(i, cartera)| {
            let x = i as f64;
            Rectangle::new(
                [(x + 0.02, 0.0), (x + 0.38, monto_de(cartera, Equipo::GiCoronado))],
                NARANJA_GI.filled(),
            )
        }))?;
        root.present()?;
    }
    Ok(svg)
}

/// Evolución del monto acumulado por equipo, una línea por equipo sobre las
/// fechas de pago presentes en los cierres.
pub fn linea_evolucion(
    titulo: &str,
    puntos: &[PuntoEvolucion],
) -> Result<String, Box<dyn Error>> {
    if puntos.is_empty() {
        return Ok(svg_vacio());
    }
    let mut fechas: Vec<chrono::NaiveDate> = puntos.iter().map(|p| p.fecha).collect();
    fechas.sort();
    fechas.dedup();

    let serie = |equipo: Equipo| -> Vec<(f64, f64)> {
        puntos
            .iter()
            .filter(|p| p.equipo == equipo)
            .map(|p| {
                let i = fechas.iter().position(|f| *f == p.fecha).unwrap_or(0);
                (i as f64, p.monto_acumulado)
            })
            .collect()
    };
    let maximo = puntos
        .iter()
        .map(|p| p.monto_acumulado)
        .fold(0.0f64, f64::max);
    let tope = if maximo > 0.0 { maximo * 1.1 } else { 1.0 };
    let fin = (fechas.len().max(2) - 1) as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, TAMANO).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(titulo, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(78)
            .build_cartesian_2d(0f64..fin, 0f64..tope)?;
        chart
            .configure_mesh()
            .x_labels(fechas.len().min(10))
            .x_label_formatter(&|x| {
                fechas
                    .get(x.round() as usize)
                    .map(|f| f.format("%d/%m").to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        for equipo in [Equipo::Worldtel, Equipo::GiCoronado] {
            let color = color_equipo(equipo);
            let datos = serie(equipo);
            if datos.is_empty() {
                continue;
            }
            chart
                .draw_series(LineSeries::new(datos, color.stroke_width(3)))?
                .label(equipo.etiqueta())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(3))
                });
        }
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;
        root.present()?;
    }
    Ok(svg)
}
