//! Add command implementation

use super::fields::{parse_year, FieldArgs};
use super::session::{exit_code_for, Session};
use crate::domain::Year;
use clap::Args;

/// Arguments for the add command
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Year partition of the new hospital (may also be given as YEAR in --json)
    #[arg(short, long, value_parser = parse_year)]
    pub year: Option<Year>,

    #[command(flatten)]
    pub record: FieldArgs,
}

impl AddArgs {
    /// Execute the add command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let record = match self
            .record
            .to_new_hospital(self.year.as_ref().map(Year::as_str))
        {
            Ok(r) => r,
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

        let year = record.year.clone();
        match session.repository.add_hospital(record).await {
            Ok(id) => {
                println!("✅ Hospital added to {year}");
                println!("   ID: {id}");
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
