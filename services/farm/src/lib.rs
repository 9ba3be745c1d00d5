//! farm service library.
//!
//! This crate primarily ships the `farm` binary, but exposes the Postgres
//! store, configuration and audit worker for integration testing and reuse.

pub mod audit;
pub mod config;
pub mod db;
