// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking models: the raw dialog form, the validated request, and the
//! bookings listed by the gateway.

use crate::error::ValidationError;
use crate::models::TimeSlot;
use serde::{Deserialize, Serialize};

/// A confirmed reservation as listed by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    #[serde(rename = "boxName")]
    pub box_name: String,
    /// Start time as sent by the gateway ("HH:MM")
    #[serde(rename = "timeStart")]
    pub start_time: String,
    #[serde(rename = "timeHrs", default)]
    pub duration_hours: u32,
    #[serde(rename = "timeMins", default)]
    pub duration_minutes: u32,
    #[serde(rename = "peopleAmount")]
    pub party_size: u32,
}

/// Validated create-booking request, serialized with the gateway's field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRequest {
    #[serde(rename = "email")]
    pub user_identity: String,
    #[serde(rename = "boxName")]
    pub box_name: String,
    #[serde(rename = "peopleAmount")]
    pub party_size: u32,
    #[serde(rename = "timeStart")]
    pub start_time: TimeSlot,
    #[serde(rename = "timeHrs")]
    pub duration_hours: u32,
    #[serde(rename = "timeMins")]
    pub duration_minutes: u32,
}

/// Raw booking dialog input, exactly as typed.
///
/// Kept intact when a submission fails so the user can retry without
/// re-entering anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub start_time: String,
    pub party_size: String,
    pub duration_hours: String,
    pub duration_minutes: String,
}

impl BookingForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate the form for `box_name` on behalf of `user_identity`.
    ///
    /// Checks run in the order the dialog presents its fields: start time,
    /// people, duration.
    pub fn validate(
        &self,
        user_identity: &str,
        box_name: &str,
    ) -> Result<BookingRequest, ValidationError> {
        if box_name.trim().is_empty() {
            return Err(ValidationError::MissingBox);
        }

        let start_time =
            TimeSlot::parse(&self.start_time).ok_or(ValidationError::MissingStartTime)?;

        let party_size = parse_whole(&self.party_size)
            .filter(|n| *n >= 1)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(ValidationError::InvalidPartySize)?;

        let duration_hours = parse_whole(&self.duration_hours)
            .filter(|n| *n >= 0)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(ValidationError::InvalidDuration)?;

        // Minutes may be left blank, which means zero.
        let duration_minutes = if self.duration_minutes.trim().is_empty() {
            0
        } else {
            parse_whole(&self.duration_minutes)
                .filter(|n| *n >= 0)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(ValidationError::InvalidDuration)?
        };

        if duration_hours == 0 && duration_minutes == 0 {
            return Err(ValidationError::InvalidDuration);
        }

        Ok(BookingRequest {
            user_identity: user_identity.to_string(),
            box_name: box_name.to_string(),
            party_size,
            start_time,
            duration_hours,
            duration_minutes,
        })
    }
}

fn parse_whole(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}
