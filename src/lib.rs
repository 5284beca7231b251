pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod utils;

pub use client::{ApiResponse, ConsoleClient, Credentials};
pub use config::Config;
pub use db::PurgeReport;
pub use error::{ConsoleError, RollbackOutcome};
pub use jitsu_console_schema as schema;
