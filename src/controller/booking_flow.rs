// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking submission and cancellation.
//!
//! One submission attempt moves through:
//!
//! ```text
//! Idle -> Validating -> Rejected
//!                    -> PreconditionChecking -> PreconditionFailed
//!                                            -> Submitting -> Succeeded
//!                                                          -> Failed
//! ```
//!
//! Only `Succeeded` refreshes the listings. Nothing is retried automatically:
//! after `Failed` the dialog and its input stay as they were and the user
//! submits again. A submission already in flight is never cancelled; edits
//! made meanwhile apply to the next attempt.

use crate::controller::refresh::refresh_listings;
use crate::controller::session::expire_session;
use crate::error::{ClientError, Result};
use crate::services::{BookingApi, CancelReceipt, CredentialStore};
use crate::state::{AppState, FormKind, SubmissionPhase, Tone};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const NO_PAYMENT_METHOD: &str = "Please add a payment method before booking";
const BOOKING_FALLBACK: &str = "Failed to create booking. Please try again.";

/// Held for the duration of one submission, with the view state it updates.
///
/// `loading` is set while held. Dropping the guard clears both it and the
/// flag, also when the submit future is dropped mid-request.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    state: &'a mut AppState,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, state: &'a mut AppState) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        state.loading = true;
        Some(InFlight { flag, state })
    }
}

impl Deref for InFlight<'_> {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        self.state
    }
}

impl DerefMut for InFlight<'_> {
    fn deref_mut(&mut self) -> &mut AppState {
        self.state
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.loading = false;
        self.flag.store(false, Ordering::Release);
    }
}

fn enter(state: &mut AppState, phase: SubmissionPhase) {
    tracing::debug!(from = ?state.booking_dialog.phase, to = ?phase, "Booking submission");
    state.booking_dialog.phase = phase;
}

/// Booking flow controller.
pub struct BookingFlowController<A: ?Sized> {
    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
    in_flight: AtomicBool,
}

impl<A: BookingApi + ?Sized> BookingFlowController<A> {
    pub fn new(api: Arc<A>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            credentials,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Open the booking dialog for `box_name` with an empty form.
    pub fn open_dialog(&self, state: &mut AppState, box_name: &str) {
        if let Some(sport_box) = state.boxes.iter().find(|b| b.name == box_name) {
            if !sport_box.available {
                tracing::debug!(box_name, "Opening dialog for a box listed as booked");
            }
        }

        let dialog = &mut state.booking_dialog;
        dialog.open = true;
        dialog.box_name = box_name.to_string();
        dialog.form.reset();
        dialog.phase = SubmissionPhase::Idle;
        state.clear_inline(FormKind::Booking);
    }

    /// Close the dialog. The form keeps its input until the dialog is reopened.
    pub fn close_dialog(&self, state: &mut AppState) {
        state.booking_dialog.open = false;
    }

    /// Run one submission attempt for the open dialog.
    ///
    /// Returns the terminal phase. Fails only when the user is not logged in
    /// or another submission is still in flight; neither sends a request.
    pub async fn submit(&self, state: &mut AppState) -> Result<SubmissionPhase> {
        let mut guard = InFlight::acquire(&self.in_flight, state).ok_or_else(|| {
            tracing::debug!("Ignoring submit while another booking is in flight");
            ClientError::SubmissionInFlight
        })?;
        let state: &mut AppState = &mut guard;

        let credential = state
            .session
            .credential()
            .cloned()
            .ok_or(ClientError::NotAuthenticated)?;

        state.clear_inline(FormKind::Booking);
        enter(state, SubmissionPhase::Idle);

        // 1. Local validation
        enter(state, SubmissionPhase::Validating);
        let request = match state
            .booking_dialog
            .form
            .validate(&credential.email, &state.booking_dialog.box_name)
        {
            Ok(request) => request,
            Err(err) => {
                state.set_inline(FormKind::Booking, Tone::Error, err.to_string());
                enter(state, SubmissionPhase::Rejected);
                return Ok(SubmissionPhase::Rejected);
            }
        };

        // 2. A payment method must be on file
        enter(state, SubmissionPhase::PreconditionChecking);
        let has_card = match self.api.list_cards(&credential).await {
            Ok(cards) => !cards.is_empty(),
            Err(err) if err.is_session_expired() => {
                expire_session(self.credentials.as_ref(), state);
                // The reset closed the dialog; record how the attempt ended.
                enter(state, SubmissionPhase::PreconditionFailed);
                return Ok(SubmissionPhase::PreconditionFailed);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Could not check payment methods");
                false
            }
        };
        if !has_card {
            state.set_inline(FormKind::Booking, Tone::Error, NO_PAYMENT_METHOD);
            enter(state, SubmissionPhase::PreconditionFailed);
            return Ok(SubmissionPhase::PreconditionFailed);
        }

        // 3. Submit
        enter(state, SubmissionPhase::Submitting);
        let receipt = match self.api.create_booking(&credential, &request).await {
            Ok(receipt) => receipt,
            Err(err) if err.is_session_expired() => {
                expire_session(self.credentials.as_ref(), state);
                enter(state, SubmissionPhase::Failed);
                return Ok(SubmissionPhase::Failed);
            }
            Err(err) => {
                tracing::warn!(box_name = %request.box_name, error = %err, "Booking failed");
                state.push_banner(
                    Tone::Error,
                    format!("Booking Error: {}", err.display_message(BOOKING_FALLBACK)),
                );
                enter(state, SubmissionPhase::Failed);
                return Ok(SubmissionPhase::Failed);
            }
        };

        // 4. Reflect the confirmed booking
        tracing::info!(
            box_name = %request.box_name,
            booking_id = ?receipt.booking_id,
            "Booking confirmed"
        );
        state.push_banner(
            Tone::Success,
            format!(
                "Booking successful! Reservation ID: {}",
                receipt.booking_id.as_deref().unwrap_or("N/A")
            ),
        );
        if let Some(balance) = receipt.new_balance {
            state.balance = Some(balance);
        }
        state.booking_dialog.open = false;
        state.booking_dialog.form.reset();
        enter(state, SubmissionPhase::Succeeded);

        refresh_listings(self.api.as_ref(), self.credentials.as_ref(), state).await;
        Ok(SubmissionPhase::Succeeded)
    }

    /// Cancel a booking and refresh the listings.
    pub async fn cancel(&self, state: &mut AppState, booking_id: i64) -> Result<CancelReceipt> {
        let credential = state
            .session
            .credential()
            .cloned()
            .ok_or(ClientError::NotAuthenticated)?;

        match self.api.cancel_booking(&credential, booking_id).await {
            Ok(receipt) => {
                tracing::info!(booking_id, refunded = ?receipt.refunded_amount, "Booking cancelled");
                if let Some(balance) = receipt.new_balance {
                    state.balance = Some(balance);
                }
                state.push_banner(Tone::Success, format!("Booking #{booking_id} cancelled"));
                refresh_listings(self.api.as_ref(), self.credentials.as_ref(), state).await;
                Ok(receipt)
            }
            Err(err) if err.is_session_expired() => {
                expire_session(self.credentials.as_ref(), state);
                Err(err)
            }
            Err(err) => {
                tracing::error!(booking_id, error = %err, "Cancel failed");
                state.push_banner(
                    Tone::Error,
                    format!(
                        "Failed to cancel booking: {}",
                        err.display_message("Network error occurred")
                    ),
                );
                Err(err)
            }
        }
    }
}
