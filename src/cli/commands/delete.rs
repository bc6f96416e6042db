//! Delete command implementation

use super::fields::parse_year;
use super::session::{exit_code_for, Session};
use crate::domain::{HospitalId, Year};
use clap::Args;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Hospital ID (push IDs usually start with '-')
    #[arg(long, allow_hyphen_values = true)]
    pub id: HospitalId,

    /// Year partition the hospital lives under
    #[arg(short, long, value_parser = parse_year)]
    pub year: Year,
}

impl DeleteArgs {
    /// Execute the delete command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let session = match Session::open(config_path) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        match session.repository.delete_hospital(&self.id, &self.year).await {
            Ok(()) => {
                println!("✅ Hospital {} deleted from {}", self.id, self.year);
                Ok(0)
            }
            Err(e) => {
                let message = session.repository.error().unwrap_or_default();
                println!("❌ {message}");
                println!("   Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
