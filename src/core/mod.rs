//! Ledger services, time source and filesystem layout helpers.

pub mod services;
pub mod time;
pub mod utils;
