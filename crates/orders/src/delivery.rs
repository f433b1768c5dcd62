//! Delivery-date eligibility.
//!
//! The earliest legal delivery date depends only on today's date and the
//! destination region.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use medimart_core::{DomainError, DomainResult};

/// Destination region.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    Bihar,
    /// Anywhere outside Bihar.
    Other,
}

impl Region {
    /// Minimum lead time in days.
    pub fn lead_time_days(&self) -> u64 {
        match self {
            Region::Bihar => 7,
            Region::Other => 14,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Bihar => "Bihar",
            Region::Other => "Outside Bihar",
        }
    }
}

pub fn minimum_delivery_date(region: Region, today: NaiveDate) -> DomainResult<NaiveDate> {
    today
        .checked_add_days(Days::new(region.lead_time_days()))
        .ok_or_else(|| DomainError::validation("delivery date out of range"))
}

/// Accept `requested` iff it is on or after the region's minimum date.
pub fn validate_requested_date(
    region: Region,
    requested: NaiveDate,
    today: NaiveDate,
) -> DomainResult<()> {
    let minimum = minimum_delivery_date(region, today)?;
    if requested < minimum {
        return Err(DomainError::validation(format!(
            "{}: delivery needs at least {} days; earliest date is {minimum}",
            region.label(),
            region.lead_time_days()
        )));
    }
    Ok(())
}

/// Checkout-form delivery choice: a region plus an optional chosen date.
///
/// Switching region discards the chosen date, which must then be picked again
/// against the new minimum.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySchedule {
    region: Region,
    requested_date: Option<NaiveDate>,
}

impl DeliverySchedule {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            requested_date: None,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn requested_date(&self) -> Option<NaiveDate> {
        self.requested_date
    }

    pub fn minimum_date(&self, today: NaiveDate) -> DomainResult<NaiveDate> {
        minimum_delivery_date(self.region, today)
    }

    pub fn select_region(&mut self, region: Region) {
        if region != self.region {
            self.region = region;
            self.requested_date = None;
        }
    }

    /// Pick a date; rejected (and not stored) when it is before the minimum.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> DomainResult<()> {
        validate_requested_date(self.region, date, today)?;
        self.requested_date = Some(date);
        Ok(())
    }
}
