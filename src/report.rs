//! Ledger reports
//!
//! The dealer dashboard numbers: slot counts by status, occupancy,
//! today's bookings and settled revenue, computed across every location
//! in a ledger at one instant and renderable as a console table.

use std::io;

use decimal_percentage::Percentage;
use jiff::{Timestamp, tz::TimeZone};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    bookings::{BookingStatus, PaymentStatus},
    ledger::{LedgerError, ParkingLedger},
    slots::SlotStatus,
};

/// Errors that can occur when building or rendering a summary.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Wrapper for ledger lookup errors.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Dashboard numbers for one ledger at one instant.
#[derive(Debug)]
pub struct LedgerSummary {
    total_slots: u32,
    available_slots: u32,
    booked_slots: u32,
    disabled_slots: u32,
    occupancy: Percentage,
    active_bookings: usize,
    bookings_today: usize,
    total_revenue: Money<'static, Currency>,
}

impl LedgerSummary {
    /// Computes the summary across every location and booking.
    ///
    /// Occupancy is booked slots over total slots. Revenue sums the
    /// total amount of every booking whose payment status is paid,
    /// whatever its lifecycle status. A booking counts as "today" when
    /// its start falls on the same UTC calendar day as `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if a lookup or money sum fails.
    pub fn compute(ledger: &ParkingLedger, now: Timestamp) -> Result<Self, ReportError> {
        let mut total_slots = 0u32;
        let mut available_slots = 0u32;
        let mut booked_slots = 0u32;
        let mut disabled_slots = 0u32;

        for (key, location) in ledger.locations() {
            total_slots += location.total_slots();
            available_slots += location.available_slots();

            for (_, slot) in ledger.slots_for_location(key)? {
                match slot.status() {
                    SlotStatus::Booked => booked_slots += 1,
                    SlotStatus::Disabled => disabled_slots += 1,
                    SlotStatus::Available => {}
                }
            }
        }

        let occupancy = if total_slots == 0 {
            Percentage::from(0.0)
        } else {
            let booked_dec = Decimal::from_u32(booked_slots).unwrap_or(Decimal::ZERO);
            let total_dec = Decimal::from_u32(total_slots).unwrap_or(Decimal::ZERO);

            Percentage::from(booked_dec / total_dec)
        };

        let today = now.to_zoned(TimeZone::UTC).date();

        let mut active_bookings = 0usize;
        let mut bookings_today = 0usize;

        for (_, booking) in ledger.bookings() {
            if booking.status_at(now) == BookingStatus::Active {
                active_bookings += 1;
            }

            if booking.starts().to_zoned(TimeZone::UTC).date() == today {
                bookings_today += 1;
            }
        }

        let total_revenue = ledger
            .bookings()
            .filter(|(_, booking)| booking.payment_status() == PaymentStatus::Paid)
            .try_fold(
                Money::from_minor(0, ledger.currency()),
                |acc, (_, booking)| acc.add(*booking.total_amount()),
            )?;

        Ok(Self {
            total_slots,
            available_slots,
            booked_slots,
            disabled_slots,
            occupancy,
            active_bookings,
            bookings_today,
            total_revenue,
        })
    }

    /// Total slots across all locations.
    #[must_use]
    pub fn total_slots(&self) -> u32 {
        self.total_slots
    }

    /// Slots currently available.
    #[must_use]
    pub fn available_slots(&self) -> u32 {
        self.available_slots
    }

    /// Slots currently booked.
    #[must_use]
    pub fn booked_slots(&self) -> u32 {
        self.booked_slots
    }

    /// Slots currently disabled.
    #[must_use]
    pub fn disabled_slots(&self) -> u32 {
        self.disabled_slots
    }

    /// Fraction of all slots that are booked.
    #[must_use]
    pub fn occupancy(&self) -> Percentage {
        self.occupancy
    }

    /// Bookings reading as active at the summary instant.
    #[must_use]
    pub fn active_bookings(&self) -> usize {
        self.active_bookings
    }

    /// Bookings starting on the summary instant's UTC calendar day.
    #[must_use]
    pub fn bookings_today(&self) -> usize {
        self.bookings_today
    }

    /// Sum of all paid bookings' totals.
    #[must_use]
    pub fn total_revenue(&self) -> &Money<'static, Currency> {
        &self.total_revenue
    }

    /// Prints the summary to the console.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary cannot be printed.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let occupancy_points = percent_points_from_fractional_percentage(self.occupancy);

        let mut builder = Builder::default();

        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Total slots".to_string(), self.total_slots.to_string()]);
        builder.push_record(["Available".to_string(), self.available_slots.to_string()]);
        builder.push_record(["Booked".to_string(), self.booked_slots.to_string()]);
        builder.push_record(["Disabled".to_string(), self.disabled_slots.to_string()]);
        builder.push_record(["Occupancy".to_string(), format!("{occupancy_points:.1}%")]);
        builder.push_record([
            "Active bookings".to_string(),
            self.active_bookings.to_string(),
        ]);
        builder.push_record([
            "Bookings today".to_string(),
            self.bookings_today.to_string(),
        ]);
        builder.push_record([
            "Revenue (paid)".to_string(),
            self.total_revenue.to_string(),
        ]);

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..2), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| ReportError::IO)
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.1), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::from_i64(100).unwrap_or(Decimal::ZERO)).round_dp(1)
}
