//! Configuration module for pocket-ledger
//!
//! - XDG-style path resolution with an environment override
//! - User settings persisted as JSON

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
