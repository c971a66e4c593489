//! Utils

use std::time::Duration;

use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};

use crate::{
    ledger::{LedgerError, ParkingLedger},
    locations::LocationKey,
    slots::{SlotKey, SlotStatus},
};

/// Arguments for the ledger examples
#[derive(Debug, Parser)]
pub struct ExampleLedgerArgs {
    /// Fixture set to use for locations & bookings
    #[clap(short, long, default_value = "demo")]
    pub fixture: String,

    /// User id to book under
    #[clap(short, long, default_value = "demo-user")]
    pub user: String,

    /// Length of the booked window in hours
    #[clap(long, default_value_t = 2)]
    pub hours: i64,
}

/// Find the first available slot of a location, if any.
///
/// # Errors
///
/// Returns an error if the location is not in the ledger.
pub fn first_available_slot(
    ledger: &ParkingLedger,
    location: LocationKey,
) -> Result<Option<SlotKey>, LedgerError> {
    Ok(ledger
        .slots_for_location(location)?
        .into_iter()
        .find(|(_, slot)| slot.status() == SlotStatus::Available)
        .map(|(key, _)| key))
}

/// Format an elapsed duration for example output.
pub fn format_elapsed(duration: Duration) -> String {
    if duration < Duration::from_millis(1) {
        return "< 1ms".to_string();
    }

    format!("{}", duration.human(Truncate::Nano))
}
