// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod booking;
pub mod card;
pub mod slot;
pub mod sport_box;

pub use booking::{Booking, BookingForm, BookingRequest};
pub use card::{CardForm, CardSummary, NewCard};
pub use slot::TimeSlot;
pub use sport_box::SportBox;
