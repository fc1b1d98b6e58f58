// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, registration, logout and session hydration.
//!
//! An expired session is the only error that resets global state. It is
//! detected by the HTTP layer (401, or a 403 the card listing confirms) and
//! handled here by [`expire_session`].

use crate::controller::{load_main_content, refresh::refresh_listings};
use crate::display::CardsView;
use crate::error::{ClientError, Result, ValidationError};
use crate::services::{BookingApi, CredentialStore, LoginRequest};
use crate::state::{AppState, FormKind, Session, Tone};
use std::sync::Arc;
use validator::Validate;

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Clear the stored credential and revert the view to logged out.
pub fn expire_session(credentials: &dyn CredentialStore, state: &mut AppState) {
    tracing::info!(email = ?state.session.email(), "Session expired, clearing credential");
    if let Err(err) = credentials.clear() {
        tracing::warn!(error = %err, "Failed to clear stored credential");
    }
    state.reset_to_logged_out();
    state.push_banner(Tone::Info, SESSION_EXPIRED_MESSAGE);
}

fn check_login_request(request: &LoginRequest) -> std::result::Result<(), ValidationError> {
    match request.validate() {
        Ok(()) => Ok(()),
        Err(errors) if errors.field_errors().contains_key("email") => {
            Err(ValidationError::InvalidEmail)
        }
        Err(_) => Err(ValidationError::MissingPassword),
    }
}

/// Session controller.
pub struct SessionController<A: ?Sized> {
    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
    app_id: i64,
}

impl<A: BookingApi + ?Sized> SessionController<A> {
    pub fn new(api: Arc<A>, credentials: Arc<dyn CredentialStore>, app_id: i64) -> Self {
        Self {
            api,
            credentials,
            app_id,
        }
    }

    /// Restore the session from the stored credential.
    ///
    /// Returns whether the user ended up logged in. A rejected credential is
    /// cleared; an unreachable gateway leaves it stored for the next attempt.
    pub async fn hydrate(&self, state: &mut AppState) -> Result<bool> {
        let Some(credential) = self.credentials.load()? else {
            tracing::debug!("No stored credential");
            state.session = Session::Anonymous;
            return Ok(false);
        };

        match self.api.list_cards(&credential).await {
            Ok(cards) => {
                tracing::info!(email = %credential.email, "Session restored");
                state.session = Session::Authenticated(credential);
                state.cards = CardsView::from_cards(&cards);
                refresh_listings(self.api.as_ref(), self.credentials.as_ref(), state).await;
                Ok(state.session.is_authenticated())
            }
            Err(ClientError::SessionExpired) => {
                expire_session(self.credentials.as_ref(), state);
                Ok(false)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Could not verify stored session");
                state.session = Session::Anonymous;
                state.push_banner(
                    Tone::Error,
                    err.display_message("Could not reach the booking service"),
                );
                Ok(false)
            }
        }
    }

    pub async fn login(&self, state: &mut AppState, email: &str, password: &str) -> Result<()> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        if let Err(err) = check_login_request(&request) {
            state.set_inline(FormKind::Login, Tone::Error, err.to_string());
            return Err(err.into());
        }

        let credential = match self.api.login(&request, self.app_id).await {
            Ok(credential) => credential,
            Err(err) => {
                tracing::warn!(email = %request.email, error = %err, "Login failed");
                state.set_inline(FormKind::Login, Tone::Error, err.display_message("Login failed"));
                return Err(err);
            }
        };

        self.credentials.save(&credential)?;
        state.clear_inline(FormKind::Login);
        state.session = Session::Authenticated(credential);
        load_main_content(self.api.as_ref(), self.credentials.as_ref(), state).await;
        Ok(())
    }

    pub async fn register(&self, state: &mut AppState, email: &str, password: &str) -> Result<()> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        if let Err(err) = check_login_request(&request) {
            state.set_inline(FormKind::Register, Tone::Error, err.to_string());
            return Err(err.into());
        }

        match self.api.register(&request).await {
            Ok(()) => {
                tracing::info!(email = %request.email, "Registered");
                state.set_inline(
                    FormKind::Register,
                    Tone::Success,
                    "Registration successful! Please login.",
                );
                Ok(())
            }
            Err(err) => {
                state.set_inline(
                    FormKind::Register,
                    Tone::Error,
                    err.display_message("Registration failed"),
                );
                Err(err)
            }
        }
    }

    pub fn logout(&self, state: &mut AppState) -> Result<()> {
        self.credentials.clear()?;
        *state = AppState::default();
        tracing::info!("Logged out");
        Ok(())
    }
}
