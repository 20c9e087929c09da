//! # Vitals
//!
//! A local personal health tracker. Records live in a single SQLite file;
//! every statistic, the health score and reports are derived from them on
//! demand by [`vitals_core`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────┐
//! │   CLI    │──▶│ HealthLedger │──▶│ SqliteStore  │
//! │ (vitals) │   │ (core crate) │   │  (records)   │
//! └──────────┘   └──────┬───────┘   └──────────────┘
//!                       │
//!          ┌────────────┼────────────┐
//!          ▼            ▼            ▼
//!     normalize       stats     score/report
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! vitals init
//! vitals workout add Running 30
//! vitals food add "Oatmeal" 300
//! vitals stats
//! vitals report weekly
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite `KvStore` backend and ledger opening |
//! | [`record`] | Write commands |
//! | [`stats`] | Dashboard, score and workout list |
//! | [`export`] | Report export |

pub mod config;
pub mod db;
pub mod export;
pub mod migrate;
pub mod record;
pub mod sqlite_store;
pub mod stats;
