//! Valet
//!
//! Valet is an in-memory parking reservation and slot ledger engine written in Rust.

pub mod billing;
pub mod bookings;
pub mod desk;
pub mod fixtures;
pub mod ledger;
pub mod locations;
pub mod prelude;
pub mod report;
pub mod search;
pub mod services;
pub mod slots;
pub mod utils;
