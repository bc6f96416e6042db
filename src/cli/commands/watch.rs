//! Watch command implementation
//!
//! Keeps the live listener attached and prints the selected year's
//! hospitals after every change until a shutdown signal arrives.

use super::fields::parse_year;
use super::list::{print_table, sort_hospitals};
use super::session::{exit_code_for, Session};
use crate::domain::Year;
use crate::log_hospital_snapshot;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Year to display (defaults to hospitals.default_year)
    #[arg(short, long, value_parser = parse_year)]
    pub year: Option<Year>,
}

impl WatchArgs {
    /// Execute the watch command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let session = match Session::open(config_path) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };
        let repository = &session.repository;

        if let Some(year) = &self.year {
            repository.set_selected_year(year.clone());
        }

        let mut view = repository.view();
        if let Err(e) = repository.activate().await {
            println!("❌ {}", repository.error().unwrap_or_default());
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }

        let year = repository.selected_year();
        tracing::info!(year = %year, backend = %session.config.store.backend, "Watching hospitals");
        println!("👀 Watching hospitals for {year} (Ctrl+C to stop)");
        println!();

        let exit_code = loop {
            tokio::select! {
                changed = view.hospitals.changed() => {
                    if changed.is_err() {
                        break 0;
                    }
                    let total = view.hospitals.borrow_and_update().len();
                    let mut hospitals = repository.hospitals_for_year(&year);
                    sort_hospitals(&mut hospitals);
                    log_hospital_snapshot!(total, hospitals.len(), year);
                    print_table(&hospitals);
                }
                changed = view.error.changed() => {
                    if changed.is_err() {
                        break 0;
                    }
                    let message = view.error.borrow_and_update().clone();
                    if let Some(message) = message {
                        println!("❌ {message}");
                        break 4;
                    }
                }
                changed = shutdown_signal.changed() => {
                    if changed.is_err() || *shutdown_signal.borrow() {
                        break 0;
                    }
                }
            }
        };

        repository.deactivate();
        if exit_code == 0 {
            println!("👋 Stopped watching");
        }
        Ok(exit_code)
    }
}
