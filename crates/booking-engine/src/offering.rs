//! Bookable service types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferingStatus {
    Active,
    Inactive,
}

/// A service with a fixed duration. Only active offerings can be booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub status: OfferingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Offering {
    pub fn is_bookable(&self) -> bool {
        self.status == OfferingStatus::Active
    }

    /// Fails with [`BookingError::OfferingInactive`] unless the offering is active.
    pub fn ensure_bookable(&self) -> Result<()> {
        if self.is_bookable() {
            Ok(())
        } else {
            Err(BookingError::OfferingInactive(self.id.clone()))
        }
    }

    /// Duration is positive; price, when present, is a non-negative number.
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(BookingError::InvalidOffering(format!(
                "offering {} has a zero duration",
                self.id
            )));
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(BookingError::InvalidOffering(format!(
                    "offering {} has invalid price {price}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}
