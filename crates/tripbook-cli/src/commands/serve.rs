//! Server command implementation

use std::path::Path;

use anyhow::Result;
use tripbook_core::Config;
use tripbook_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    config: Config,
    host: &str,
    port: u16,
    allowed_origins: Option<&str>,
) -> Result<()> {
    println!("🚀 Starting Tripbook web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let allowed_origins: Vec<String> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }

    let db = open_db(db_path)?;
    let server = ServerConfig { allowed_origins };

    tripbook_server::serve_with_config(db, config, host, port, server).await
}
