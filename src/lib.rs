//! Todo Server Library
//!
//! Tasks, categories and completion reports over SQLite, served as typed
//! procedure calls over HTTP.

pub mod cli;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod logging;
pub mod procedures;
pub mod report;
pub mod server;
pub mod types;
