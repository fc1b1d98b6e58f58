// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - the boundary to the booking gateway.

pub mod booking_api;
pub mod credentials;
pub mod http;
pub(crate) mod wire;

pub use booking_api::{
    BookingApi, BookingReceipt, CancelReceipt, Credential, FundsReceipt, LoginRequest,
};
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use http::HttpBookingApi;
