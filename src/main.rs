// --- Dashboard Análisis Comparativo WORLDTEL vs GI CORONADO ---

use cierredash::run_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // .env opcional: CIERRE_BIND y CIERRE_XLSX_DIR
    let _ = dotenv::dotenv();

    println!("=== Análisis Comparativo WORLDTEL (dashboard) ===");
    let bind = std::env::var("CIERRE_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    println!("Iniciando servidor en http://{}", bind);
    run_server(&bind).await
}
