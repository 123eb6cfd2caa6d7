//! Agregaciones sobre cierres y gestiones.
//!
//! Todas las operaciones trabajan sobre los registros ya filtrados por el
//! loader (sin asesor vacío ni "ESTUDIO") y devuelven vectores en orden
//! determinista (BTreeMap por clave de grupo), de modo que dos corridas
//! sobre la misma entrada producen tablas idénticas byte a byte.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;

use crate::equipos::ConfigEquipos;
use crate::models::{
    AsesorResumen, CarteraResumen, Cierre, Equipo, FilaAgregada, Gestion, PuntoEvolucion,
    ResumenEquipo,
};

/// Agregado por (asesor, equipo, cartera): suma de montos y razones sociales
/// distintas dentro del grupo. Orden de salida: (asesor, cartera) ascendente.
pub fn por_asesor_cartera(cierres: &[Cierre], config: &ConfigEquipos) -> Vec<FilaAgregada> {
    let mut grupos: BTreeMap<(String, String), (f64, HashSet<String>)> = BTreeMap::new();
    for c in cierres {
        let entrada = grupos
            .entry((c.asesor.clone(), c.cartera.clone()))
            .or_insert_with(|| (0.0, HashSet::new()));
        entrada.0 += c.monto;
        entrada.1.insert(c.razon_social.clone());
    }

    grupos
        .into_iter()
        .map(|((asesor, cartera), (monto, clientes))| FilaAgregada {
            equipo: config.clasificar(&asesor),
            asesor,
            cartera,
            monto_total: monto,
            num_clientes: clientes.len(),
        })
        .collect()
}

/// Vista simplificada por asesor: suma total, razones sociales distintas y la
/// cartera moda (la más frecuente entre sus cierres; empate → la primera
/// encontrada en el orden de entrada). Orden de salida: asesor ascendente.
pub fn por_asesor(cierres: &[Cierre], config: &ConfigEquipos) -> Vec<AsesorResumen> {
    struct Acum {
        monto: f64,
        clientes: HashSet<String>,
        frecuencia: HashMap<String, usize>,
        orden_carteras: Vec<String>,
    }

    let mut grupos: BTreeMap<String, Acum> = BTreeMap::new();
    for c in cierres {
        let acum = grupos.entry(c.asesor.clone()).or_insert_with(|| Acum {
            monto: 0.0,
            clientes: HashSet::new(),
            frecuencia: HashMap::new(),
            orden_carteras: Vec::new(),
        });
        acum.monto += c.monto;
        acum.clientes.insert(c.razon_social.clone());
        if !acum.frecuencia.contains_key(&c.cartera) {
            acum.orden_carteras.push(c.cartera.clone());
        }
        *acum.frecuencia.entry(c.cartera.clone()).or_insert(0) += 1;
    }

    grupos
        .into_iter()
        .map(|(asesor, acum)| {
            let max = acum.frecuencia.values().copied().max().unwrap_or(0);
            // la primera cartera (en orden de aparición) que alcanza la
            // frecuencia máxima
            let moda = acum
                .orden_carteras
                .iter()
                .find(|c| acum.frecuencia.get(*c).copied() == Some(max))
                .cloned()
                .unwrap_or_default();
            AsesorResumen {
                equipo: config.clasificar(&asesor),
                asesor,
                monto_total: acum.monto,
                num_clientes: acum.clientes.len(),
                cartera_moda: moda,
            }
        })
        .collect()
}

/// Agregado por (cartera, equipo) para el gráfico comparativo de carteras.
pub fn por_cartera(cierres: &[Cierre], config: &ConfigEquipos) -> Vec<CarteraResumen> {
    let mut grupos: BTreeMap<(String, Equipo), (f64, HashSet<String>)> = BTreeMap::new();
    for c in cierres {
        let equipo = config.clasificar(&c.asesor);
        let entrada = grupos
            .entry((c.cartera.clone(), equipo))
            .or_insert_with(|| (0.0, HashSet::new()));
        entrada.0 += c.monto;
        entrada.1.insert(c.razon_social.clone());
    }

    grupos
        .into_iter()
        .map(|((cartera, equipo), (monto, clientes))| CarteraResumen {
            cartera,
            equipo,
            monto_total: monto,
            num_clientes: clientes.len(),
        })
        .collect()
}

/// Totales por equipo para las tarjetas del resumen, derivados de la vista
/// simplificada por asesor (igual que el informe original: los clientes se
/// suman por asesor, no se deduplican entre asesores). Devuelve siempre los
/// dos equipos, en el orden [WORLDTEL, GI CORONADO].
pub fn resumen_equipos(asesores: &[AsesorResumen]) -> Vec<ResumenEquipo> {
    [Equipo::Worldtel, Equipo::GiCoronado]
        .into_iter()
        .map(|equipo| {
            let del_equipo: Vec<&AsesorResumen> =
                asesores.iter().filter(|a| a.equipo == equipo).collect();
            ResumenEquipo {
                equipo,
                monto_total: del_equipo.iter().map(|a| a.monto_total).sum(),
                num_clientes: del_equipo.iter().map(|a| a.num_clientes).sum(),
                num_asesores: del_equipo.len(),
            }
        })
        .collect()
}

/// Suma de montos de cierre por equipo, directamente sobre los registros.
pub fn monto_por_equipo(cierres: &[Cierre], config: &ConfigEquipos, equipo: Equipo) -> f64 {
    cierres
        .iter()
        .filter(|c| config.clasificar(&c.asesor) == equipo)
        .map(|c| c.monto)
        .sum()
}

/// Participación porcentual de `monto` sobre `monto + otro`; 0 cuando la suma
/// es 0 (división por cero protegida, no es un error).
pub fn participacion(monto: f64, otro: f64) -> f64 {
    let total = monto + otro;
    if total > 0.0 { monto / total * 100.0 } else { 0.0 }
}

/// Tasa de conversión: recaudado / (recaudado + promesas) × 100, con la misma
/// protección de división por cero.
pub fn tasa_conversion(recaudado: f64, promesas: f64) -> f64 {
    participacion(recaudado, promesas)
}

/// Cruce de promesas: suma de MONTO_PROMESA por (fecha de gestión × fecha de
/// promesa), con columna y fila de totales "TOTAL". Las combinaciones de
/// fechas sin promesas valen 0, no faltan.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TablaCruzada {
    /// Fechas de gestión (filas), orden ascendente.
    pub fechas_gestion: Vec<NaiveDate>,
    /// Fechas de promesa (columnas), orden ascendente.
    pub fechas_promesa: Vec<NaiveDate>,
    /// celdas[fila][columna], alineadas con los vectores de fechas.
    pub celdas: Vec<Vec<f64>>,
    /// Margen "TOTAL" por fila de gestión.
    pub total_fila: Vec<f64>,
    /// Margen "TOTAL" por columna de promesa.
    pub total_columna: Vec<f64>,
    pub gran_total: f64,
}

/// Construye la tabla cruzada sobre las gestiones válidas, opcionalmente
/// filtradas por equipo del gestor.
pub fn tabla_cruzada_promesas(
    gestiones: &[Gestion],
    config: &ConfigEquipos,
    filtro: Option<Equipo>,
) -> TablaCruzada {
    let seleccion: Vec<&Gestion> = gestiones
        .iter()
        .filter(|g| match filtro {
            Some(equipo) => config.clasificar(&g.gestor) == equipo,
            None => true,
        })
        .collect();

    let fechas_gestion: Vec<NaiveDate> = seleccion
        .iter()
        .map(|g| g.fecha_gestion)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let fechas_promesa: Vec<NaiveDate> = seleccion
        .iter()
        .map(|g| g.fecha_promesa)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let indice_gestion: HashMap<NaiveDate, usize> = fechas_gestion
        .iter()
        .enumerate()
        .map(|(i, f)| (*f, i))
        .collect();
    let indice_promesa: HashMap<NaiveDate, usize> = fechas_promesa
        .iter()
        .enumerate()
        .map(|(i, f)| (*f, i))
        .collect();

    let mut celdas = vec![vec![0.0; fechas_promesa.len()]; fechas_gestion.len()];
    for g in &seleccion {
        celdas[indice_gestion[&g.fecha_gestion]][indice_promesa[&g.fecha_promesa]] +=
            g.monto_promesa;
    }

    let total_fila: Vec<f64> = celdas.iter().map(|fila| fila.iter().sum()).collect();
    let total_columna: Vec<f64> = (0..fechas_promesa.len())
        .map(|c| celdas.iter().map(|fila| fila[c]).sum())
        .collect();
    let gran_total = total_fila.iter().sum();

    TablaCruzada {
        fechas_gestion,
        fechas_promesa,
        celdas,
        total_fila,
        total_columna,
        gran_total,
    }
}

/// Suma de promesas válidas, con filtro de equipo opcional.
pub fn total_promesas(gestiones: &[Gestion], config: &ConfigEquipos, filtro: Option<Equipo>) -> f64 {
    gestiones
        .iter()
        .filter(|g| match filtro {
            Some(equipo) => config.clasificar(&g.gestor) == equipo,
            None => true,
        })
        .map(|g| g.monto_promesa)
        .sum()
}

/// Evolución de pagos: monto diario y acumulado por equipo, sólo sobre los
/// cierres con fecha de pago, en orden (fecha, equipo) ascendente.
pub fn evolucion_pagos(cierres: &[Cierre], config: &ConfigEquipos) -> Vec<PuntoEvolucion> {
    let mut diarios: BTreeMap<(NaiveDate, Equipo), f64> = BTreeMap::new();
    for c in cierres {
        if let Some(fecha) = c.fecha_pago {
            *diarios
                .entry((fecha, config.clasificar(&c.asesor)))
                .or_insert(0.0) += c.monto;
        }
    }

    let mut acumulados: HashMap<Equipo, f64> = HashMap::new();
    diarios
        .into_iter()
        .map(|((fecha, equipo), monto)| {
            let acumulado = acumulados.entry(equipo).or_insert(0.0);
            *acumulado += monto;
            PuntoEvolucion {
                fecha,
                equipo,
                monto_diario: monto,
                monto_acumulado: *acumulado,
            }
        })
        .collect()
}
