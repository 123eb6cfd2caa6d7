//! Servidor HTTP del dashboard.
//!
//! Una corrida completa del pipeline (localizar → cargar → clasificar →
//! agregar → tablas) por cada render de la página. El estado compartido son
//! los cachés explícitos por workbook; el resto se recalcula siempre.

use std::collections::HashMap;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use serde_json::json;

use crate::agregacion::{tasa_conversion, total_promesas};
use crate::equipos::{ConfigEquipos, SELECTOR_EQUIPOS};
use crate::errores::CargaError;
use crate::excel::{self, CacheExcel};
use crate::models::{Cierre, Equipo, Gestion, Grilla};
use crate::render::{self, DatosInforme, armar_informe};

/// Estado de la aplicación: la configuración de equipos y un caché por
/// dataset, inyectados en los handlers vía `web::Data`.
pub struct EstadoApp {
    pub config: ConfigEquipos,
    pub cache_cierres: CacheExcel<Vec<Cierre>>,
    pub cache_gestiones: CacheExcel<Vec<Gestion>>,
    pub cache_grilla: CacheExcel<Grilla>,
}

impl EstadoApp {
    pub fn nuevo() -> Self {
        EstadoApp {
            config: ConfigEquipos::default(),
            cache_cierres: CacheExcel::nueva(),
            cache_gestiones: CacheExcel::nueva(),
            cache_grilla: CacheExcel::nueva(),
        }
    }
}

/// Carga los tres datasets y arma el informe. Sólo los errores del dataset
/// fundamental (CIERRE DE PAGOS) se propagan; gestiones y timming viajan
/// como `Result` dentro del informe para degradar su propia sección.
fn cargar_informe(estado: &EstadoApp) -> Result<DatosInforme, CargaError> {
    let ruta = excel::buscar_workbook_cierre()?;

    let cierres = estado
        .cache_cierres
        .obtener_o_cargar(&ruta, || excel::leer_cierre_pagos(&ruta))?;

    let gestiones = estado
        .cache_gestiones
        .obtener_o_cargar(&ruta, || excel::leer_gestiones(&ruta))
        .map(|g| (*g).clone());

    let grilla = excel::buscar_workbook_timming().and_then(|ruta_t| {
        estado
            .cache_grilla
            .obtener_o_cargar(&ruta_t, || excel::leer_grilla_timming(&ruta_t))
            .map(|g| (*g).clone())
    });

    Ok(armar_informe(
        &estado.config,
        (*cierres).clone(),
        gestiones,
        grilla,
    ))
}

/// GET / — la página completa del dashboard. `?equipo=` filtra la sección de
/// gestiones; acepta exactamente TODOS, WORLDTEL o GI CORONADO.
async fn dashboard_handler(
    estado: web::Data<EstadoApp>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let seleccion = query
        .get("equipo")
        .map(|s| s.as_str())
        .filter(|s| SELECTOR_EQUIPOS.contains(s))
        .unwrap_or("TODOS")
        .to_string();

    match cargar_informe(&estado) {
        Ok(informe) => {
            let hoy = chrono::Local::now().date_naive();
            let html = render::pagina(&informe, &estado.config, &seleccion, hoy);
            HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(html)
        }
        Err(e) => {
            eprintln!("❌ fallo al generar el informe: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body(render::pagina_error(&e))
        }
    }
}

/// GET /api/resumen — totales y conversión por equipo en JSON.
async fn resumen_handler(estado: web::Data<EstadoApp>) -> impl Responder {
    let informe = match cargar_informe(&estado) {
        Ok(i) => i,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("fallo al generar el informe: {}", e)}));
        }
    };

    let conversion = informe.gestiones.as_ref().ok().map(|gestiones| {
        let detalle: Vec<serde_json::Value> = [Equipo::Worldtel, Equipo::GiCoronado]
            .into_iter()
            .map(|equipo| {
                let recaudado = informe
                    .resumen_de(equipo)
                    .map(|r| r.monto_total)
                    .unwrap_or(0.0);
                let promesas = total_promesas(gestiones, &estado.config, Some(equipo));
                json!({
                    "equipo": equipo,
                    "recaudado": recaudado,
                    "promesas": promesas,
                    "total_proyectado": recaudado + promesas,
                    "conversion_pct": tasa_conversion(recaudado, promesas),
                })
            })
            .collect();
        detalle
    });

    HttpResponse::Ok().json(json!({
        "equipos": informe.resumen,
        "conversion": conversion,
        "cierres": informe.cierres.len(),
        "gestiones_ok": informe.gestiones.is_ok(),
        "timming_ok": informe.timming.is_ok(),
    }))
}

async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

pub async fn run_server(bind_addr: &str) -> std::io::Result<()> {
    let estado = web::Data::new(EstadoApp::nuevo());
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(estado.clone())
            .route("/", web::get().to(dashboard_handler))
            .route("/api/resumen", web::get().to(resumen_handler))
            .route("/health", web::get().to(health_handler))
    })
    .bind(bind_addr)?
    .run()
    .await
}
