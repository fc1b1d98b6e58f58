// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The boundary to the booking gateway.
//!
//! Every endpoint answers with exactly one normalized type here. Whatever
//! shape the gateway actually sent (`status` vs `success`, a bare card object
//! vs an array) is resolved by the implementation and never leaks upward.

use crate::error::Result;
use crate::models::{Booking, BookingRequest, CardSummary, NewCard, SportBox};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Bearer credential plus the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub email: String,
    pub token: String,
}

/// Login or registration input.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Result of a successful create-booking call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingReceipt {
    /// Reservation ID, when the gateway returned one
    pub booking_id: Option<String>,
    /// Wallet balance after payment
    pub new_balance: Option<f64>,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CancelReceipt {
    pub refunded_amount: Option<f64>,
    pub new_balance: Option<f64>,
}

/// Result of a successful wallet top-up.
#[derive(Debug, Clone, PartialEq)]
pub struct FundsReceipt {
    pub new_balance: f64,
}

/// Operations the booking gateway exposes.
///
/// Calls taking a [`Credential`] are authenticated; they fail with
/// [`crate::error::ClientError::SessionExpired`] when the gateway rejects it.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Log in and return the issued credential.
    async fn login(&self, request: &LoginRequest, app_id: i64) -> Result<Credential>;

    async fn register(&self, request: &LoginRequest) -> Result<()>;

    async fn list_boxes(&self, credential: &Credential) -> Result<Vec<SportBox>>;

    async fn list_bookings(&self, credential: &Credential) -> Result<Vec<Booking>>;

    async fn create_booking(
        &self,
        credential: &Credential,
        request: &BookingRequest,
    ) -> Result<BookingReceipt>;

    async fn cancel_booking(&self, credential: &Credential, booking_id: i64)
        -> Result<CancelReceipt>;

    /// Cards on file for the credential's user. No card on file is an empty
    /// list, not an error.
    async fn list_cards(&self, credential: &Credential) -> Result<Vec<CardSummary>>;

    async fn add_card(&self, credential: &Credential, card: &NewCard) -> Result<()>;

    async fn add_funds(&self, credential: &Credential, amount: u64) -> Result<FundsReceipt>;
}
