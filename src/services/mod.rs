//! Service layer for pocket-ledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, referential integrity, and cross-entity operations.

pub mod account;
pub mod analytics;
pub mod balance;
pub mod category;
pub mod integrity;
pub mod operation;
pub mod transfer;

pub use account::AccountService;
pub use analytics::{AnalyticsService, CategoryTotal, PeriodReport};
pub use balance::BalanceEngine;
pub use category::CategoryService;
pub use integrity::IntegrityGuard;
pub use operation::{CreateOperationInput, OperationService};
pub use transfer::TransferService;
