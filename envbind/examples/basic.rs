//! Basic usage example

use envbind::{EnvBind, Mode};

#[derive(Debug, Default, EnvBind)]
struct Config {
    // Bound from SERVER_ADDR
    #[env(key = "SERVER_ADDR")]
    pub server_addr: String,

    // Keeps its current value when MAX_CONNECTIONS is unset or malformed
    #[env(key = "MAX_CONNECTIONS")]
    pub max_connections: u32,

    // Only filled when TIMEOUT_SECS parses
    #[env(key = "TIMEOUT_SECS")]
    pub timeout_secs: Option<f64>,

    // Nested record: walked, its fields use their own keys
    pub database: Database,

    #[env(mode)]
    pub mode: Mode,
}

#[derive(Debug, Default, EnvBind)]
struct Database {
    #[env(key = "DATABASE_URL")]
    pub url: String,

    #[env(key = "DATABASE_DEBUG")]
    pub debug: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Set environment variables for demonstration
    std::env::set_var("SERVER_ADDR", "0.0.0.0:3000");
    std::env::set_var("MAX_CONNECTIONS", "lots");
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("DATABASE_DEBUG", "yes");

    let mut config = Config {
        max_connections: 10,
        ..Default::default()
    };
    envbind::load_from_env(&mut config)?;

    println!("Configuration loaded ({}):", config.mode);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Timeout: {:?}", config.timeout_secs);
    println!("  Database URL: {}", config.database.url);
    println!("  Database Debug: {}", config.database.debug);

    Ok(())
}
