#![doc(test(attr(deny(warnings))))]

//! Account Master keeps a single-user receipts and expenditure ledger, summarizes it for a
//! date window with brought-forward and carried-forward balances, paginates it into
//! ledger sheets and exports spreadsheet and print documents.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod export;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("account master tracing initialized");
    });
}
