//! # Vitals Core
//!
//! The record store and derived-metrics engine behind the `vitals` CLI:
//! record models, lenient normalization of legacy history, the key-value
//! store abstraction, statistics, the health score and report building.
//!
//! This crate contains no sqlx, filesystem I/O or other native-only
//! dependencies. Storage is reached only through [`store::KvStore`], and
//! the current time only through [`dates::Clock`].
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | canonical record shapes and storage keys |
//! | [`dates`] | calendar-date parsing and the injected clock |
//! | [`normalize`] | weight/sleep reshaping, dedup by date |
//! | [`store`] | `KvStore` trait and the in-memory backend |
//! | [`records`] | typed collections over a `KvStore` |
//! | [`stats`] | windowed and whole-history aggregates |
//! | [`score`] | the 0–100 health score |
//! | [`report`] | report snapshot and text rendering |
//! | [`knowledge`] | symptom table and workout templates |
//! | [`ledger`] | the session object tying it all together |

pub mod dates;
pub mod error;
pub mod knowledge;
pub mod ledger;
pub mod models;
pub mod normalize;
pub mod records;
pub mod report;
pub mod score;
pub mod stats;
pub mod store;

pub use error::{LedgerError, LedgerResult};
pub use ledger::HealthLedger;
