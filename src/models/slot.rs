// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookable start times.

use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;

/// Opening hour of the facility (first slot start).
const OPENING_HOUR: u32 = 8;
/// Closing hour; the last slot starts half an hour before it.
const CLOSING_HOUR: u32 = 22;
const SLOT_MINUTES: u32 = 30;

/// A 30-minute-aligned start time between 08:00 and 21:30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// Every allowed slot, in order.
    pub fn all() -> Vec<TimeSlot> {
        (OPENING_HOUR..CLOSING_HOUR)
            .flat_map(|hour| {
                (0..60)
                    .step_by(SLOT_MINUTES as usize)
                    .filter_map(move |minute| NaiveTime::from_hms_opt(hour, minute, 0))
            })
            .map(TimeSlot)
            .collect()
    }

    /// Parse an "HH:MM" selection. Returns `None` unless it names an allowed slot.
    pub fn parse(value: &str) -> Option<TimeSlot> {
        let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()?;
        TimeSlot::from_time(time)
    }

    pub fn from_time(time: NaiveTime) -> Option<TimeSlot> {
        let allowed = time.second() == 0
            && time.minute() % SLOT_MINUTES == 0
            && (OPENING_HOUR..CLOSING_HOUR).contains(&time.hour());
        allowed.then_some(TimeSlot(time))
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
