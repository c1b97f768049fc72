//! Example demonstrating a record-level custom decoder

use envbind::{DecodeField, EnvBind, Value};

#[derive(Debug, Default, EnvBind)]
#[env(custom_decode)]
struct Config {
    #[env(key = "APP_NAME")]
    pub app_name: String,

    // Accepts "30s", "5m" or plain seconds
    #[env(key = "TIMEOUT")]
    pub timeout_secs: u64,

    #[env(key = "PORT")]
    pub port: u16,
}

impl DecodeField for Config {
    fn decode_field(&self, field: &str, _key: &str, raw: &str) -> anyhow::Result<Option<Value>> {
        match field {
            // Supplies a value even when APP_NAME is not set at all
            "app_name" if raw.is_empty() => Ok(Some(Value::from("unnamed"))),
            "timeout_secs" => {
                let secs = if let Some(mins) = raw.strip_suffix('m') {
                    mins.parse::<u64>()? * 60
                } else if let Some(secs) = raw.strip_suffix('s') {
                    secs.parse::<u64>()?
                } else if raw.is_empty() {
                    return Ok(None);
                } else {
                    raw.parse::<u64>()?
                };
                Ok(Some(Value::U64(secs)))
            }
            // Everything else uses the default conversion
            _ => Ok(None),
        }
    }
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("TIMEOUT", "5m");
    std::env::set_var("PORT", "8080");

    let mut config = Config::default();
    envbind::load_env(&mut config)?;

    println!("Configuration loaded:");
    println!("  App Name: {}", config.app_name);
    println!("  Timeout: {}s", config.timeout_secs);
    println!("  Port: {}", config.port);

    Ok(())
}
