// Estructuras de datos principales del informe

use chrono::NaiveDate;

/// Los dos equipos comparados en el informe. Cualquier asesor que no esté en
/// la lista de WORLDTEL pertenece por defecto a GI CORONADO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum Equipo {
    #[serde(rename = "WORLDTEL")]
    Worldtel,
    #[serde(rename = "GI CORONADO")]
    GiCoronado,
}

impl Equipo {
    pub fn etiqueta(&self) -> &'static str {
        match self {
            Equipo::Worldtel => "WORLDTEL",
            Equipo::GiCoronado => "GI CORONADO",
        }
    }
}

impl std::fmt::Display for Equipo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.etiqueta())
    }
}

/// Una línea de cierre de pago (hoja "CIERRE DE PAGOS").
/// Las filas con ASESOR vacío o igual a "ESTUDIO" se descartan al cargar.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Cierre {
    pub asesor: String,
    pub cartera: String,
    pub monto: f64,
    pub razon_social: String,
    pub fecha_pago: Option<NaiveDate>,
}

/// Una gestión con promesa de pago (hoja "GESTIONES").
/// Sólo es válida si los cuatro campos están presentes y el monto es > 0;
/// el parser descarta las inválidas antes de agregar.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Gestion {
    pub gestor: String,
    pub fecha_gestion: NaiveDate,
    pub fecha_promesa: NaiveDate,
    pub monto_promesa: f64,
}

/// Agregado por (asesor, equipo, cartera): monto sumado y razones sociales
/// distintas. Un asesor aparece una vez por cada cartera que atendió.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FilaAgregada {
    pub asesor: String,
    pub equipo: Equipo,
    pub cartera: String,
    pub monto_total: f64,
    pub num_clientes: usize,
}

/// Vista simplificada por asesor (sin desglose de cartera). `cartera_moda`
/// es la cartera más frecuente entre sus cierres; en caso de empate gana la
/// primera encontrada en el orden de entrada.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AsesorResumen {
    pub asesor: String,
    pub equipo: Equipo,
    pub monto_total: f64,
    pub num_clientes: usize,
    pub cartera_moda: String,
}

/// Agregado por (cartera, equipo), alimenta el gráfico comparativo de carteras.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CarteraResumen {
    pub cartera: String,
    pub equipo: Equipo,
    pub monto_total: f64,
    pub num_clientes: usize,
}

/// Totales por equipo para las tarjetas del resumen. `num_clientes` suma los
/// conteos distintos por asesor (un mismo cliente atendido por dos asesores
/// cuenta dos veces, igual que en el informe original).
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResumenEquipo {
    pub equipo: Equipo,
    pub monto_total: f64,
    pub num_clientes: usize,
    pub num_asesores: usize,
}

/// Un punto de la serie de evolución de pagos: monto del día y acumulado por
/// equipo, en orden cronológico.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PuntoEvolucion {
    pub fecha: NaiveDate,
    pub equipo: Equipo,
    pub monto_diario: f64,
    pub monto_acumulado: f64,
}

/// Celda ya tipada de una hoja leída como grilla cruda (sin encabezados).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Celda {
    Texto(String),
    Numero(f64),
    Fecha(NaiveDate),
    Vacia,
}

/// Grilla cruda: filas de celdas tal como vienen de la hoja.
pub type Grilla = Vec<Vec<Celda>>;

impl Celda {
    pub fn como_texto(&self) -> String {
        match self {
            Celda::Texto(s) => s.trim().to_string(),
            Celda::Numero(n) => {
                if (n.floor() - n).abs() < f64::EPSILON {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Celda::Fecha(f) => f.to_string(),
            Celda::Vacia => String::new(),
        }
    }

    /// Número de la celda; para texto acepta separadores de miles, el prefijo
    /// "S/" y el símbolo de porcentaje.
    pub fn como_numero(&self) -> Option<f64> {
        match self {
            Celda::Numero(n) => Some(*n),
            Celda::Texto(s) => {
                let limpio = s.trim().trim_start_matches("S/").replace([',', '%'], "");
                limpio.trim().parse::<f64>().ok()
            }
            _ => None,
        }
    }

    /// Entero de la celda: números sin parte fraccionaria o texto parseable.
    pub fn como_entero(&self) -> Option<i64> {
        match self {
            Celda::Numero(n) if (n.floor() - n).abs() < f64::EPSILON => Some(*n as i64),
            Celda::Texto(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn como_fecha(&self) -> Option<NaiveDate> {
        match self {
            Celda::Fecha(f) => Some(*f),
            Celda::Texto(s) => {
                let s = s.trim();
                for formato in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d %H:%M:%S"] {
                    if let Ok(f) = NaiveDate::parse_from_str(s, formato) {
                        return Some(f);
                    }
                }
                None
            }
            _ => None,
        }
    }
}
