//! # Scheduler Core Library
//!
//! Task planning with lazy recurrence: a task carries an optional repeat rule
//! and only moves forward in time when it is marked done.
//!
//! ## Core Modules
//!
//! - [`dates`]: The fixed `YYYYMMDD` format and the dotted search format
//! - [`recurrence`]: Repeat rule parsing and next-date calculation
//! - [`models`]: Task records, typed identifiers and service inputs
//! - [`repository`]: Storage contract and its SQLite implementation
//! - [`service`]: Task lifecycle (create, update, complete, delete, search)
//! - [`db`]: Database connection and migration management
//! - [`error`]: Error types shared across the crate
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mockable::DefaultClock;
//! use scheduler_core::{
//!     db, models::NewTaskData, repository::SqliteRepository, service::TaskService,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let service = TaskService::new(
//!         Arc::new(SqliteRepository::new(pool)),
//!         Arc::new(DefaultClock),
//!     );
//!
//!     let id = service
//!         .create(NewTaskData {
//!             title: "Water the plants".to_string(),
//!             repeat: "d 3".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     service.complete(id).await?;
//!     Ok(())
//! }
//! ```

pub mod dates;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod service;
