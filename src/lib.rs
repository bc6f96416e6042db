// Hospital Sync - Live hospital records grouped by year
// Copyright (c) 2025 Hospital Sync Contributors
// Licensed under the MIT License

//! # hospital-sync
//!
//! Reactive access to hospital records kept in a hosted realtime database,
//! where records live under `hospitals/{year}/{id}`.
//!
//! ## Overview
//!
//! This library provides:
//! - **Watching** the `hospitals` subtree through one live listener
//! - **Flattening** each `year -> id -> fields` snapshot into a list
//! - **Publishing** the list, a loading flag, an error message and the
//!   selected year as observable cells
//! - **Writing** records with add, update (full replacement) and delete
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Repository, reactive state and snapshot flattening
//! - [`adapters`] - Store backends (REST with event streams, in-memory)
//! - [`domain`] - Identifiers, records, messages and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hospital_sync::adapters::memory::MemoryStore;
//! use hospital_sync::core::repository::{HospitalRepository, RepositoryOptions};
//! use hospital_sync::domain::NewHospital;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository =
//!         HospitalRepository::new(Arc::new(MemoryStore::new()), RepositoryOptions::default());
//!     repository.activate().await?;
//!
//!     let id = repository
//!         .add_hospital(NewHospital::from_value(json!({"YEAR": "2024", "name": "A"}))?)
//!         .await?;
//!
//!     let mut view = repository.view();
//!     view.hospitals.wait_for(|list| list.iter().any(|h| h.id == id)).await?;
//!     println!("{} hospitals", repository.hospitals().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library calls return [`domain::HospitalError`]. The repository also puts
//! a fixed, localized message into its error cell whenever an operation
//! fails, so a UI can show it without inspecting the error.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
