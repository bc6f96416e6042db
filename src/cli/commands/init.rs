//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::config::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing hospital-sync configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set store.base_url to your database URL");
                println!("  2. Put the database secret in .env as HOSPITAL_SYNC_DB_SECRET");
                println!("  3. Validate configuration: hospital-sync validate-config");
                println!("  4. List hospitals: hospital-sync list --year 2024");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Sample configuration with every setting and its default
    fn generate_config() -> String {
        r#"# hospital-sync configuration

[application]
log_level = "info"  # trace | debug | info | warn | error

[store]
backend = "rest"  # rest | memory
base_url = "https://your-project-default-rtdb.firebaseio.com"
# Database secret or ID token, sent as the auth query parameter
# auth_token = "${HOSPITAL_SYNC_DB_SECRET}"
timeout_seconds = 30
connect_timeout_seconds = 10
tls_verify = true
# JSON file loaded into the memory backend at startup
# seed_file = "hospitals.json"

[hospitals]
default_year = "2024"
locale = "ko"  # ko | en
# Check that a record exists before update/delete
strict_partitions = false

[logging]
local_enabled = true
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}
