//! Booking Flow Example
//!
//! Loads the demo catalog, geocodes the customer's address, searches for
//! the nearest location, quotes a parking window, books it through the
//! desk's simulated card payment, and prints the booking plus the ledger
//! summary.
//!
//! Use `-f` to load a fixture set by name
//! Use `-u` to book under a different user id
//! Use `--hours` to change the booked window length

use std::{io, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use jiff::{Timestamp, ToSpan};

use valet::{
    bookings::BookingRequest,
    desk::BookingDesk,
    fixtures::Fixture,
    locations::StreetAddress,
    report::LedgerSummary,
    search::{LocationQuery, SortBy, search_locations},
    services::{GeocodingService, JitteredGeocoder, SimulatedCardPayment, UniformRandomDistance},
    utils::{ExampleLedgerArgs, first_available_slot, format_elapsed},
};

#[expect(clippy::print_stdout, reason = "Example code")]
#[tokio::main]
async fn main() -> Result<()> {
    let args = ExampleLedgerArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut ledger = fixture.into_ledger()?;

    // Where the customer is coming from; resolved through the (simulated)
    // geocoder just like a freshly entered address would be.
    let customer_address = StreetAddress {
        line: "1 City Hall Park".to_owned(),
        city: "New York".to_owned(),
        state: "NY".to_owned(),
        zip_code: "10007".to_owned(),
        country: "USA".to_owned(),
    };

    let origin = JitteredGeocoder::default()
        .geocode(&customer_address)
        .await?;

    println!(
        "Searching near {} ({:.4}, {:.4})",
        customer_address.line, origin.latitude, origin.longitude,
    );

    let query = LocationQuery {
        text: None,
        active_only: true,
        sort_by: Some(SortBy::Distance),
    };

    let (location_key, location_name, distance_km) = {
        let hits = search_locations(&ledger, &query, origin, &UniformRandomDistance);

        let nearest = hits.first().context("no active locations in the catalog")?;

        println!("Found {} location(s):", hits.len());

        for hit in &hits {
            println!(
                "  {:<28} {:>5.1} km  {} available",
                hit.location.name(),
                hit.distance_km,
                hit.location.available_slots(),
            );
        }

        (
            nearest.key,
            nearest.location.name().to_owned(),
            nearest.distance_km,
        )
    };

    println!("\nBooking at {location_name} ({distance_km:.1} km away)");

    let slot_key = first_available_slot(&ledger, location_key)?
        .context("no available slot at the nearest location")?;

    let now = Timestamp::now();
    let starts = now + 1.hour();
    let ends = starts + args.hours.hours();

    let amount = ledger.quote(location_key, slot_key, starts, ends)?;

    println!("Quoted {amount} for {} hour(s)", args.hours);

    let desk = BookingDesk::new(SimulatedCardPayment::new());
    let charge_started = Instant::now();

    let booking_key = desk
        .book_slot(
            &mut ledger,
            BookingRequest {
                user_id: args.user.clone(),
                location: location_key,
                slot: slot_key,
                starts,
                ends,
                vehicle_number: None,
            },
            now,
        )
        .await?;

    let booking = ledger.booking(booking_key)?;

    println!(
        "Booked slot {} for {} ({} settled in {})",
        booking.slot_number(),
        booking.user_id(),
        booking.total_amount(),
        format_elapsed(charge_started.elapsed()),
    );

    println!();

    let summary = LedgerSummary::compute(&ledger, now)?;

    let stdout = io::stdout();
    let handle = stdout.lock();

    summary.write_to(handle)?;

    Ok(())
}
