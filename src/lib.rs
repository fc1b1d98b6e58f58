// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Sport-Box client: book sports boxes through the sport-box gateway.
//!
//! This crate provides the client side of the booking service: the gateway
//! boundary, the booking flow with its payment-method precondition, session
//! handling, and the view state a front end renders.

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

use config::Config;
use controller::{BookingFlowController, PaymentsController, SessionController};
use services::{BookingApi, CredentialStore};
use std::sync::Arc;

pub use state::AppState;

/// The controllers wired to one gateway and one credential store.
pub struct Client<A: ?Sized> {
    pub session: SessionController<A>,
    pub booking: BookingFlowController<A>,
    pub payments: PaymentsController<A>,
}

impl<A: BookingApi + ?Sized> Client<A> {
    pub fn new(config: &Config, api: Arc<A>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            session: SessionController::new(api.clone(), credentials.clone(), config.app_id),
            booking: BookingFlowController::new(api.clone(), credentials.clone()),
            payments: PaymentsController::new(api, credentials),
        }
    }
}
