// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reloading of the box and booking listings.

use crate::controller::session::expire_session;
use crate::services::{BookingApi, CredentialStore};
use crate::state::{AppState, Tone};

/// Which listings were replaced by a refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub boxes_loaded: bool,
    pub bookings_loaded: bool,
}

/// Fetch boxes and bookings concurrently and apply each result on its own.
///
/// A failure of one listing leaves the other (and anything that triggered
/// the refresh) untouched; it only adds a banner for the part that failed.
pub async fn refresh_listings<A: BookingApi + ?Sized>(
    api: &A,
    credentials: &dyn CredentialStore,
    state: &mut AppState,
) -> RefreshReport {
    let Some(credential) = state.session.credential().cloned() else {
        return RefreshReport::default();
    };

    let (boxes, bookings) = tokio::join!(
        api.list_boxes(&credential),
        api.list_bookings(&credential)
    );

    let mut report = RefreshReport::default();
    let mut expired = false;

    match boxes {
        Ok(boxes) => {
            tracing::debug!(count = boxes.len(), "Boxes loaded");
            state.boxes = boxes;
            report.boxes_loaded = true;
        }
        Err(err) if err.is_session_expired() => expired = true,
        Err(err) => {
            tracing::error!(error = %err, "Failed to load boxes");
            state.push_banner(Tone::Error, "Failed to load boxes");
        }
    }

    match bookings {
        Ok(bookings) => {
            tracing::debug!(count = bookings.len(), "Bookings loaded");
            state.bookings = bookings;
            report.bookings_loaded = true;
        }
        Err(err) if err.is_session_expired() => expired = true,
        Err(err) => {
            tracing::error!(error = %err, "Failed to load bookings");
            state.push_banner(Tone::Error, "Failed to load bookings");
        }
    }

    if expired {
        expire_session(credentials, state);
        return RefreshReport::default();
    }

    report
}
