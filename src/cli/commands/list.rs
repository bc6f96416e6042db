//! List command implementation
//!
//! Attaches the live listener, waits for the first snapshot and prints it.

use super::fields::parse_year;
use super::session::{exit_code_for, Session};
use crate::domain::{Hospital, Year};
use clap::Args;
use std::time::Duration;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show hospitals of this year
    #[arg(short, long, value_parser = parse_year)]
    pub year: Option<Year>,

    /// Print the hospitals as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Seconds to wait for the first snapshot
    #[arg(long, default_value_t = 30)]
    pub timeout_seconds: u64,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let session = match Session::open(config_path) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };
        let repository = &session.repository;

        if let Err(e) = repository.activate().await {
            println!("❌ {}", repository.error().unwrap_or_default());
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }

        let mut view = repository.view();
        let waited = tokio::time::timeout(
            Duration::from_secs(self.timeout_seconds),
            view.wait_until_idle(),
        )
        .await;
        repository.deactivate();

        if waited.is_err() {
            println!(
                "❌ No snapshot received within {} seconds",
                self.timeout_seconds
            );
            return Ok(4);
        }

        if let Some(message) = repository.error() {
            println!("❌ {message}");
            return Ok(4);
        }

        let mut hospitals = match &self.year {
            Some(year) => repository.hospitals_for_year(year),
            None => repository.hospitals().to_vec(),
        };
        sort_hospitals(&mut hospitals);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&hospitals)?);
        } else {
            print_table(&hospitals);
        }

        Ok(0)
    }
}

/// Order by year, then id (push ids sort by creation time)
pub(super) fn sort_hospitals(hospitals: &mut [Hospital]) {
    hospitals.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.id.cmp(&b.id)));
}

pub(super) fn print_table(hospitals: &[Hospital]) {
    if hospitals.is_empty() {
        println!("No hospitals found.");
        return;
    }

    println!("🏥 {} hospital(s)", hospitals.len());
    println!();
    println!("{:<6} {:<22} Name", "Year", "ID");
    println!("{}", "-".repeat(60));
    for hospital in hospitals {
        println!(
            "{:<6} {:<22} {}",
            hospital.year.as_str(),
            hospital.id.as_str(),
            hospital.name().unwrap_or("-")
        );
    }
    println!();
}
