//! Clasificación de asesores/gestores en equipos.
//!
//! La pertenencia a WORLDTEL se decide por una lista de nombres conocidos que
//! se inyecta como configuración; cualquier nombre que no esté en la lista
//! cae por defecto en GI CORONADO. La comparación es exacta (sin normalizar
//! mayúsculas ni espacios): un nombre mal escrito en la planilla termina en
//! el equipo equivocado, y eso se detecta revisando la fuente, no aquí.

use std::collections::HashSet;

use crate::models::Equipo;

/// Valores aceptados por el selector de equipo de la página.
pub const SELECTOR_EQUIPOS: [&str; 3] = ["TODOS", "WORLDTEL", "GI CORONADO"];

/// Lista vigente de asesores WORLDTEL.
pub const MIEMBROS_WORLDTEL: [&str; 9] = [
    "Laura Villanueva Solayo",
    "Cherry Nathalia Matson Zambrano",
    "Sandra Maria Benavides Vela",
    "Carmen Dora Niño Ordinola",
    "Daniel Alejandro Barrios Pavon",
    "Juan Jose Felix Ventura",
    "Rosa Elena Villarreal Pelaez",
    "Carla del Rosario Castillo Alvarez",
    "Lesly Dayanne Zarate Roman",
];

/// Configuración del clasificador: el conjunto de nombres que pertenecen a
/// WORLDTEL. Se pasa explícitamente al pipeline para poder probarla y
/// actualizarla sin tocar la lógica.
#[derive(Debug, Clone)]
pub struct ConfigEquipos {
    miembros_worldtel: HashSet<String>,
}

impl Default for ConfigEquipos {
    fn default() -> Self {
        ConfigEquipos::nueva(MIEMBROS_WORLDTEL.iter().map(|s| s.to_string()))
    }
}

impl ConfigEquipos {
    pub fn nueva<I: IntoIterator<Item = String>>(nombres: I) -> Self {
        ConfigEquipos {
            miembros_worldtel: nombres.into_iter().collect(),
        }
    }

    /// Clasifica un nombre (asesor o gestor) en su equipo.
    pub fn clasificar(&self, nombre: &str) -> Equipo {
        if self.miembros_worldtel.contains(nombre) {
            Equipo::Worldtel
        } else {
            Equipo::GiCoronado
        }
    }

    pub fn cuantos_worldtel(&self) -> usize {
        self.miembros_worldtel.len()
    }
}

/// Interpreta el valor del selector de equipo. `TODOS` (o cualquier valor no
/// reconocido) significa "sin filtro".
pub fn parsear_seleccion(valor: &str) -> Option<Equipo> {
    match valor {
        "WORLDTEL" => Some(Equipo::Worldtel),
        "GI CORONADO" => Some(Equipo::GiCoronado),
        _ => None,
    }
}
