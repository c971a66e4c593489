//! Slot Manager Example
//!
//! The dealer side of the ledger: takes a slot out of service and back,
//! reprices it, releases a booked slot, and prints the summary table
//! before and after.
//!
//! Use `-f` to load a fixture set by name
//! Use `-u` to book the walkthrough booking under a different user id

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use jiff::{Timestamp, ToSpan};
use rusty_money::Money;

use valet::{
    bookings::{BookingRequest, PaymentStatus},
    fixtures::Fixture,
    report::LedgerSummary,
    utils::{ExampleLedgerArgs, first_available_slot},
};

#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleLedgerArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut ledger = fixture.into_ledger()?;

    let now = Timestamp::now();

    let (location_key, location_name) = ledger
        .locations()
        .next()
        .map(|(key, location)| (key, location.name().to_owned()))
        .context("no locations in the catalog")?;

    println!("Managing {location_name}\n");

    let summary = LedgerSummary::compute(&ledger, now)?;
    summary.write_to(io::stdout().lock())?;

    // Take a slot out of service and bring it back.
    let slot_key = first_available_slot(&ledger, location_key)?
        .context("no available slot to manage")?;

    let status = ledger.toggle_slot(location_key, slot_key)?;
    let number = ledger.slot(location_key, slot_key)?.number();

    println!("\nSlot {number} is now {status}");

    let status = ledger.toggle_slot(location_key, slot_key)?;

    println!("Slot {number} is now {status}");

    // Reprice it.
    let new_price = Money::from_minor(650, ledger.currency());

    ledger.set_slot_price(location_key, slot_key, new_price)?;

    println!("Slot {number} repriced to {new_price}/hour");

    // Book it, then release it the explicit way.
    ledger.create_booking(
        BookingRequest {
            user_id: args.user.clone(),
            location: location_key,
            slot: slot_key,
            starts: now + 2.hours(),
            ends: now + (2 + args.hours).hours(),
            vehicle_number: None,
        },
        PaymentStatus::Paid,
        now,
    )?;

    println!("Slot {number} booked for {}", args.user);

    ledger.release_slot(location_key, slot_key)?;

    println!("Slot {number} released back to available\n");

    let summary = LedgerSummary::compute(&ledger, now)?;
    summary.write_to(io::stdout().lock())?;

    Ok(())
}
