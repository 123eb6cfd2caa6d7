//! Armado del informe y su página HTML.
//!
//! `armar_informe` corre el pipeline de agregación sobre los datos ya
//! cargados; `pagina` lo convierte en el HTML completo del dashboard. Los
//! datasets secundarios (gestiones, timming) viajan como `Result`: un fallo
//! en ellos degrada su sección a un aviso informativo sin tumbar el resto.

pub mod graficos;

use chrono::NaiveDate;

use crate::agregacion::{
    self, TablaCruzada, evolucion_pagos, por_asesor, por_asesor_cartera, por_cartera,
    resumen_equipos, tabla_cruzada_promesas, tasa_conversion, total_promesas,
};
use crate::equipos::{ConfigEquipos, SELECTOR_EQUIPOS, parsear_seleccion};
use crate::errores::CargaError;
use crate::models::{
    AsesorResumen, CarteraResumen, Cierre, Equipo, FilaAgregada, Gestion, Grilla, PuntoEvolucion,
    ResumenEquipo,
};
use crate::tablas::{formatear_conteo, formatear_monto, formatear_porcentaje, tabla_html, tabla_jerarquica};
use crate::timming::{TablaTimming, esperado_a_fecha, extraer_todas};

/// Todo lo que la página necesita, ya agregado y en orden determinista.
pub struct DatosInforme {
    pub cierres: Vec<Cierre>,
    pub agregados: Vec<FilaAgregada>,
    pub asesores: Vec<AsesorResumen>,
    pub carteras: Vec<CarteraResumen>,
    pub resumen: Vec<ResumenEquipo>,
    pub evolucion: Vec<PuntoEvolucion>,
    pub gestiones: Result<Vec<Gestion>, CargaError>,
    pub timming: Result<Vec<TablaTimming>, CargaError>,
}

/// Corre la agregación completa sobre los cierres (dataset fundamental) y
/// conserva los resultados o errores de los datasets secundarios.
pub fn armar_informe(
    config: &ConfigEquipos,
    cierres: Vec<Cierre>,
    gestiones: Result<Vec<Gestion>, CargaError>,
    grilla: Result<Grilla, CargaError>,
) -> DatosInforme {
    let agregados = por_asesor_cartera(&cierres, config);
    let asesores = por_asesor(&cierres, config);
    let carteras = por_cartera(&cierres, config);
    let resumen = resumen_equipos(&asesores);
    let evolucion = evolucion_pagos(&cierres, config);
    let timming = grilla.and_then(|g| extraer_todas(&g));

    DatosInforme {
        cierres,
        agregados,
        asesores,
        carteras,
        resumen,
        evolucion,
        gestiones,
        timming,
    }
}

impl DatosInforme {
    pub fn resumen_de(&self, equipo: Equipo) -> Option<&ResumenEquipo> {
        self.resumen.iter().find(|r| r.equipo == equipo)
    }

    fn monto_de(&self, equipo: Equipo) -> f64 {
        self.resumen_de(equipo).map(|r| r.monto_total).unwrap_or(0.0)
    }
}

fn aviso(mensaje: &str) -> String {
    format!(
        "<div style='background:#fff3cd; border:1px solid #ffe08a; border-radius:8px; padding:14px; margin:12px 0; color:#664d03;'>ℹ️ {}</div>",
        mensaje
    )
}

fn tarjeta(etiqueta: &str, valor: &str, gi: bool) -> String {
    let clase = if gi { "metric-card gi" } else { "metric-card" };
    format!(
        "<div class='{}'><div class='metric-label'>{}</div><div class='metric-value'>{}</div></div>",
        clase, etiqueta, valor
    )
}

fn encabezado_equipo(equipo: Equipo) -> String {
    let (clase, icono) = match equipo {
        Equipo::Worldtel => ("worldtel-header", "🟦"),
        Equipo::GiCoronado => ("gi-header", "🟧"),
    };
    format!(
        "<div class='team-header {}'>{} EQUIPO {}</div>",
        clase, icono, equipo
    )
}

fn grafico_o_aviso(resultado: Result<String, Box<dyn std::error::Error>>) -> String {
    match resultado {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("⚠️ no se pudo dibujar un gráfico: {}", e);
            aviso("No se pudo dibujar el gráfico")
        }
    }
}

/// Tabla HTML del cruce de promesas, con los márgenes "TOTAL".
pub fn tabla_cruzada_html(tabla: &TablaCruzada) -> String {
    let mut html = String::from("<table style='width:100%; border-collapse: collapse;'>\n");
    html.push_str("<tr style='background-color: #e8e8e8; font-weight: bold;'>");
    html.push_str("<th style='padding: 8px; border: 1px solid #ddd;'>Gestión \\ Promesa</th>");
    for fecha in &tabla.fechas_promesa {
        html.push_str(&format!(
            "<th style='padding: 8px; border: 1px solid #ddd; text-align: right;'>{}</th>",
            fecha.format("%d/%m/%Y")
        ));
    }
    html.push_str("<th style='padding: 8px; border: 1px solid #ddd; text-align: right;'>TOTAL</th></tr>\n");

    for (f, fecha) in tabla.fechas_gestion.iter().enumerate() {
        html.push_str("<tr>");
        html.push_str(&format!(
            "<td style='padding: 8px; border: 1px solid #ddd; font-weight: bold;'>{}</td>",
            fecha.format("%d/%m/%Y")
        ));
        for c in 0..tabla.fechas_promesa.len() {
            html.push_str(&format!(
                "<td style='padding: 8px; border: 1px solid #ddd; text-align: right;'>{}</td>",
                formatear_monto(tabla.celdas[f][c])
            ));
        }
        html.push_str(&format!(
            "<td style='padding: 8px; border: 1px solid #ddd; text-align: right; font-weight: bold;'>{}</td>",
            formatear_monto(tabla.total_fila[f])
        ));
        html.push_str("</tr>\n");
    }

    html.push_str("<tr style='background-color: #fff3cd; font-weight: bold;'><td style='padding: 8px; border: 1px solid #ddd;'>TOTAL</td>");
    for total in &tabla.total_columna {
        html.push_str(&format!(
            "<td style='padding: 8px; border: 1px solid #ddd; text-align: right;'>{}</td>",
            formatear_monto(*total)
        ));
    }
    html.push_str(&format!(
        "<td style='padding: 8px; border: 1px solid #ddd; text-align: right;'>{}</td></tr>\n",
        formatear_monto(tabla.gran_total)
    ));
    html.push_str("</table>");
    html
}

fn selector_html(seleccion: &str) -> String {
    let mut opciones = String::new();
    for opcion in SELECTOR_EQUIPOS {
        let marcada = if opcion == seleccion { " selected" } else { "" };
        opciones.push_str(&format!(
            "<option value='{0}'{1}>{0}</option>",
            opcion, marcada
        ));
    }
    format!(
        "<form method='get' style='margin:12px 0;'>\
         <label for='equipo'>Equipo (gestiones): </label>\
         <select name='equipo' id='equipo' onchange='this.form.submit()'>{}</select>\
         </form>",
        opciones
    )
}

fn seccion_equipo(informe: &DatosInforme, equipo: Equipo) -> String {
    let del_equipo: Vec<FilaAgregada> = informe
        .agregados
        .iter()
        .filter(|f| f.equipo == equipo)
        .cloned()
        .collect();
    let tabla = tabla_jerarquica(&del_equipo, false);
    format!(
        "<div style='flex:1; min-width:420px;'>{}{}</div>",
        encabezado_equipo(equipo),
        tabla_html(&tabla, "Cartera / Asesor", "Monto")
    )
}

fn seccion_gestiones(informe: &DatosInforme, config: &ConfigEquipos, seleccion: &str) -> String {
    let gestiones = match &informe.gestiones {
        Ok(g) => g,
        Err(e) => return aviso(&format!("Sin datos de gestiones: {}", e)),
    };
    if gestiones.is_empty() {
        return aviso("Sin datos de gestiones: no hay promesas válidas que mostrar");
    }

    let filtro = parsear_seleccion(seleccion);
    let cruzada = tabla_cruzada_promesas(gestiones, config, filtro);

    let mut tarjetas = String::from("<div class='metric-container'>");
    for equipo in [Equipo::Worldtel, Equipo::GiCoronado] {
        let recaudado = informe.monto_de(equipo);
        let promesas = total_promesas(gestiones, config, Some(equipo));
        let proyectado = recaudado + promesas;
        let conversion = tasa_conversion(recaudado, promesas);
        let gi = equipo == Equipo::GiCoronado;
        tarjetas.push_str(&tarjeta(
            &format!("Promesas {}", equipo),
            &formatear_monto(promesas),
            gi,
        ));
        tarjetas.push_str(&tarjeta(
            &format!("Proyectado {}", equipo),
            &formatear_monto(proyectado),
            gi,
        ));
        tarjetas.push_str(&tarjeta(
            &format!("Conversión {}", equipo),
            &formatear_porcentaje(conversion),
            gi,
        ));
    }
    tarjetas.push_str("</div>");

    format!(
        "{}{}<h3>Promesas por fecha de gestión y fecha de promesa ({})</h3>{}",
        selector_html(seleccion),
        tarjetas,
        seleccion,
        tabla_cruzada_html(&cruzada)
    )
}

fn seccion_timming(informe: &DatosInforme, hoy: NaiveDate) -> String {
    let tablas = match &informe.timming {
        Ok(t) => t,
        Err(e) => return aviso(&format!("Sin datos de TIMMING: {}", e)),
    };

    let mut html = String::from("<div class='metric-container'>");
    for tabla in tablas {
        let esperado = esperado_a_fecha(tabla, hoy)
            .map(formatear_monto)
            .unwrap_or_else(|| "—".to_string());
        let meta = tabla
            .meta_final()
            .map(formatear_monto)
            .unwrap_or_else(|| "—".to_string());
        html.push_str(&tarjeta(
            tabla.nombre,
            &format!("A la fecha: {}<br>Meta: {}", esperado, meta),
            false,
        ));
    }
    html.push_str("</div>");
    html
}

/// La página completa del dashboard. `seleccion` es el valor crudo del
/// selector de equipo; cualquier valor fuera de `SELECTOR_EQUIPOS` se trata
/// como "TODOS".
pub fn pagina(
    informe: &DatosInforme,
    config: &ConfigEquipos,
    seleccion: &str,
    hoy: NaiveDate,
) -> String {
    let seleccion = if SELECTOR_EQUIPOS.contains(&seleccion) {
        seleccion
    } else {
        "TODOS"
    };

    let monto_wl = informe.monto_de(Equipo::Worldtel);
    let monto_gi = informe.monto_de(Equipo::GiCoronado);

    // Tarjetas del resumen de equipos
    let mut tarjetas = String::from("<div class='metric-container'>");
    for r in &informe.resumen {
        let gi = r.equipo == Equipo::GiCoronado;
        tarjetas.push_str(&tarjeta(
            &format!("Monto Total {}", r.equipo),
            &formatear_monto(r.monto_total),
            gi,
        ));
        tarjetas.push_str(&tarjeta(
            &format!("Clientes {}", r.equipo),
            &formatear_conteo(r.num_clientes),
            gi,
        ));
        tarjetas.push_str(&tarjeta(
            &format!("Asesores {}", r.equipo),
            &r.num_asesores.to_string(),
            gi,
        ));
    }
    tarjetas.push_str("</div>");

    // Gráficos comparativos
    let datos_monto: Vec<(String, f64)> = informe
        .resumen
        .iter()
        .map(|r| (r.equipo.etiqueta().to_string(), r.monto_total))
        .collect();
    let datos_clientes: Vec<(String, f64)> = informe
        .resumen
        .iter()
        .map(|r| (r.equipo.etiqueta().to_string(), r.num_clientes as f64))
        .collect();
    let grafico_monto = grafico_o_aviso(graficos::barras_comparativas(
        "Monto Total por Equipo",
        "Monto (S/)",
        &datos_monto,
    ));
    let grafico_clientes = grafico_o_aviso(graficos::barras_comparativas(
        "Total de Clientes por Equipo",
        "Cantidad",
        &datos_clientes,
    ));

    let mut graficos_asesores = String::from("<div style='display:flex; gap:16px; flex-wrap:wrap;'>");
    for equipo in [Equipo::Worldtel, Equipo::GiCoronado] {
        let mut datos: Vec<(String, f64)> = informe
            .asesores
            .iter()
            .filter(|a| a.equipo == equipo)
            .map(|a| (a.asesor.clone(), a.monto_total))
            .collect();
        // ascendente, para que el mayor quede arriba en las barras horizontales
        datos.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        graficos_asesores.push_str(&format!(
            "<div style='flex:1; min-width:420px;'>{}{}</div>",
            encabezado_equipo(equipo),
            grafico_o_aviso(graficos::barras_asesores("Monto por Asesor", &datos, equipo))
        ));
    }
    graficos_asesores.push_str("</div>");

    let grafico_carteras = grafico_o_aviso(graficos::barras_carteras(
        "Monto por Cartera y Equipo",
        &informe.carteras,
    ));
    let grafico_evolucion = grafico_o_aviso(graficos::linea_evolucion(
        "Evolución del Monto Acumulado",
        &informe.evolucion,
    ));

    let tabla_combinada = tabla_html(
        &tabla_jerarquica(&informe.agregados, true),
        "Cartera / Asesor",
        "Monto ($)",
    );

    let diferencia = monto_wl - monto_gi;
    let color_dif = if diferencia > 0.0 { "#27ae60" } else { "#e74c3c" };
    let participacion = agregacion::participacion(monto_wl, monto_gi);

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>Análisis Comparativo Worldtel</title>
<style>
  body {{ font-family: sans-serif; margin: 24px; background: #fafafa; }}
  .header-container {{ background: linear-gradient(135deg, #1f77b4 0%, #0d47a1 100%); padding: 30px; border-radius: 15px; margin-bottom: 30px; }}
  .header-title {{ text-align: center; color: #ffffff; font-size: 2.4em; margin: 0 0 8px 0; }}
  .subtitle {{ text-align: center; color: #e3f2fd; margin: 0; }}
  .team-header {{ padding: 15px 20px; border-radius: 10px; margin: 15px 0; font-size: 1.2em; font-weight: bold; color: white; }}
  .worldtel-header {{ background: linear-gradient(135deg, #1f77b4 0%, #0d47a1 100%); }}
  .gi-header {{ background: linear-gradient(135deg, #ff7f0e 0%, #e65100 100%); }}
  .metric-container {{ display: flex; gap: 15px; margin: 15px 0; flex-wrap: wrap; }}
  .metric-card {{ flex: 1; min-width: 150px; background: white; padding: 18px; border-radius: 10px; border-left: 4px solid #1f77b4; text-align: center; }}
  .metric-card.gi {{ border-left-color: #ff7f0e; }}
  .metric-label {{ color: #666; font-size: 0.9em; margin-bottom: 8px; }}
  .metric-value {{ font-size: 1.4em; font-weight: bold; color: #1f77b4; }}
  .metric-card.gi .metric-value {{ color: #ff7f0e; }}
  .divider {{ border-top: 3px solid #e0e0e0; margin: 30px 0; }}
  .section-title {{ font-size: 1.6em; font-weight: bold; color: #1f77b4; margin: 25px 0 15px 0; border-bottom: 3px solid #1f77b4; padding-bottom: 8px; }}
</style>
</head>
<body>
<div class="header-container">
  <h1 class="header-title">📊 ANÁLISIS COMPARATIVO</h1>
  <p class="subtitle">WORLDTEL vs GI CORONADO - Cierre de Pagos</p>
</div>

<div style="display:flex; gap:16px; flex-wrap:wrap;">{equipo_wl}{equipo_gi}</div>

<h2 class="section-title">Resumen de Equipos</h2>
{tarjetas}

<div class="divider"></div>
<h2 class="section-title">📈 Análisis Comparativo</h2>
<div style="display:flex; gap:16px; flex-wrap:wrap;">
  <div style="flex:1; min-width:420px;">{grafico_monto}</div>
  <div style="flex:1; min-width:420px;">{grafico_clientes}</div>
</div>

<h2 class="section-title">👥 Desempeño Individual por Asesor</h2>
{graficos_asesores}

<div class="divider"></div>
<h2 class="section-title">📋 Análisis por Cartera</h2>
{grafico_carteras}
<h3>Detalle por Cartera y Asesor</h3>
{tabla_combinada}

<div class="divider"></div>
<h2 class="section-title">📅 Evolución de Pagos</h2>
{grafico_evolucion}

<div class="divider"></div>
<h2 class="section-title">🤝 Gestiones y Promesas</h2>
{seccion_gestiones}

<div class="divider"></div>
<h2 class="section-title">⏱️ TIMMING de Gastos</h2>
{seccion_timming}

<div class="divider"></div>
<h2 class="section-title">📊 Resumen General Comparativo</h2>
<div class="metric-container">
  {tarjeta_wl}
  {tarjeta_gi}
  <div class="metric-card" style="border-left-color: {color_dif};">
    <div class="metric-label">Diferencia WORLDTEL</div>
    <div class="metric-value" style="color: {color_dif};">{diferencia}</div>
  </div>
  {tarjeta_part}
</div>
</body>
</html>"#,
        equipo_wl = seccion_equipo(informe, Equipo::Worldtel),
        equipo_gi = seccion_equipo(informe, Equipo::GiCoronado),
        tarjetas = tarjetas,
        grafico_monto = grafico_monto,
        grafico_clientes = grafico_clientes,
        graficos_asesores = graficos_asesores,
        grafico_carteras = grafico_carteras,
        tabla_combinada = tabla_combinada,
        grafico_evolucion = grafico_evolucion,
        seccion_gestiones = seccion_gestiones(informe, config, seleccion),
        seccion_timming = seccion_timming(informe, hoy),
        tarjeta_wl = tarjeta("Monto WORLDTEL", &formatear_monto(monto_wl), false),
        tarjeta_gi = tarjeta("Monto GI CORONADO", &formatear_monto(monto_gi), true),
        color_dif = color_dif,
        diferencia = formatear_monto(diferencia),
        tarjeta_part = tarjeta(
            "Participación WORLDTEL",
            &formatear_porcentaje(participacion),
            false
        ),
    )
}

/// Página de error para fallos fatales del dataset fundamental.
pub fn pagina_error(error: &CargaError) -> String {
    let sugerencia = error
        .sugerencia()
        .map(|s| format!("<p>⚠️ {}</p>", s))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="es"><head><meta charset="utf-8"><title>Error</title></head>
<body style="font-family: sans-serif; margin: 40px;">
<h1>❌ No se pudo generar el informe</h1>
<p>{}</p>
{}
</body></html>"#,
        error, sugerencia
    )
}
