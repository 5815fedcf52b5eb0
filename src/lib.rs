//! pocket-ledger - a small ledger of accounts, categories and operations
//!
//! Entities live in volatile in-memory stores. The whole ledger moves in and
//! out through snapshots encoded as JSON, CSV or YAML, and an imported
//! snapshot can either replace the ledger or be merged into it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, categories, operations, money)
//! - `storage`: In-memory entity stores and atomic file helpers
//! - `services`: Business logic, integrity checks, balances and analytics
//! - `snapshot`: Snapshot codecs and the reconciler
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `ledger` binary
//!
//! # Example
//!
//! ```rust
//! use pocket_ledger::models::{Money, OperationKind};
//! use pocket_ledger::services::{
//!     AccountService, BalanceEngine, CategoryService, CreateOperationInput, OperationService,
//! };
//! use pocket_ledger::storage::Storage;
//!
//! let storage = Storage::new();
//! let wallet = AccountService::new(&storage).create("Wallet")?;
//! let food = CategoryService::new(&storage).create(OperationKind::Expense, "Food")?;
//!
//! OperationService::new(&storage).create(CreateOperationInput {
//!     kind: OperationKind::Expense,
//!     account_id: wallet.id,
//!     category_id: food.id,
//!     amount: Money::from_cents(5000),
//!     date: chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
//!     description: None,
//! })?;
//!
//! let balance = BalanceEngine::new(&storage).recalculate(wallet.id)?;
//! assert_eq!(balance, Money::from_cents(-5000));
//! # Ok::<(), pocket_ledger::LedgerError>(())
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod snapshot;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
