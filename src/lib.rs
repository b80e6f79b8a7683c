//! A personal savings tracker.
//!
//! Transactions and settings live in a small key-value store under `$SAVINGS_HOME/storage`. The
//! [`aggregate`] and [`target`] modules derive totals, the weekly balance chart and progress
//! towards a daily savings target set in USD. The exchange rate comes from an HTTP API and is
//! cached for a day.

pub mod aggregate;
mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
mod fs;
pub mod ledger;
pub mod model;
pub mod rate;
pub mod settings;
pub mod storage;
pub mod target;
pub mod tracker;
mod utils;


pub use api::{ExchangeRateApi, Mode, OfflineRate, RateProvider, OFFLINE_ENV};
pub use config::Config;
pub use error::{Error, Result, ValidationError};
