//! Update command implementation

use super::fields::{parse_year, FieldArgs};
use super::session::{exit_code_for, Session};
use crate::domain::{HospitalId, Year};
use clap::Args;

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Hospital ID (push IDs usually start with '-')
    #[arg(long, allow_hyphen_values = true)]
    pub id: HospitalId,

    /// Year partition the hospital lives under
    #[arg(short, long, value_parser = parse_year)]
    pub year: Year,

    /// Replacement fields; fields not given are removed from the record
    #[command(flatten)]
    pub record: FieldArgs,
}

impl UpdateArgs {
    /// Execute the update command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let fields = match self.record.to_fields() {
            Ok(f) => f,
            Err(e) => {
                println!("❌ Invalid hospital record");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let session = match Session::open(config_path) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        match session
            .repository
            .update_hospital(&self.id, &self.year, fields)
            .await
        {
            Ok(()) => {
                println!("✅ Hospital {} updated in {}", self.id, self.year);
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
