// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Controllers: user actions in, view-state changes out.

pub mod booking_flow;
pub mod payments;
pub mod refresh;
pub mod session;

pub use booking_flow::BookingFlowController;
pub use payments::PaymentsController;
pub use refresh::{refresh_listings, RefreshReport};
pub use session::{expire_session, SessionController};

use crate::services::{BookingApi, CredentialStore};
use crate::state::AppState;

/// Load everything the main view shows after login: boxes and bookings
/// (concurrently), then the card panel. Each part reports its own failure.
pub async fn load_main_content<A: BookingApi + ?Sized>(
    api: &A,
    credentials: &dyn CredentialStore,
    state: &mut AppState,
) {
    refresh_listings(api, credentials, state).await;
    if state.session.is_authenticated() {
        // Failures are already reflected in the card panel.
        let _ = payments::load_cards(api, credentials, state).await;
    }
}
