// Biblioteca raíz del crate `cierredash`.
// Reexporta los módulos del pipeline (excel → equipos → agregación →
// tablas/timming → render) y el servidor del dashboard.

pub mod agregacion;
pub mod equipos;
pub mod errores;
pub mod excel;
pub mod models;
pub mod render;
pub mod server;
pub mod tablas;
pub mod timming;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
