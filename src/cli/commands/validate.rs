//! Validate config command implementation

use crate::config::{load_config, StoreBackend};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a config that loads is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Store Backend: {}", config.store.backend);
        match config.store.backend {
            StoreBackend::Rest => {
                println!("  Store URL: {}", config.store.base_url);
                let token = config
                    .store
                    .auth_token
                    .as_ref()
                    .map(|t| t.expose_secret().masked())
                    .unwrap_or_else(|| "none".to_string());
                println!("  Auth Token: {token}");
                println!("  Request Timeout: {}s", config.store.timeout_seconds);
                println!("  TLS Verify: {}", config.store.tls_verify);
            }
            StoreBackend::Memory => {
                println!(
                    "  Seed File: {}",
                    config.store.seed_file.as_deref().unwrap_or("none")
                );
            }
        }
        println!("  Default Year: {}", config.hospitals.default_year);
        println!("  Locale: {}", config.hospitals.locale);
        println!("  Strict Partitions: {}", config.hospitals.strict_partitions);
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}
