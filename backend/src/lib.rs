//! Tabular ingestion service.
//!
//! Loads positional CSV files into the `departments`, `jobs` and `employees`
//! tables, accepts validated JSON batches for the same tables, and runs named
//! SQL templates. See [`ingestion`] for the CSV pipeline and [`records`] for
//! the batch path.

pub mod config;
pub mod db;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod query;
pub mod records;
pub mod services;
pub mod state;
