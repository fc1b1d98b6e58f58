// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payment cards and wallet top-ups.

use crate::controller::session::expire_session;
use crate::display::{format_amount, CardsView};
use crate::error::{ClientError, Result, ValidationError};
use crate::models::CardForm;
use crate::services::{BookingApi, CredentialStore, FundsReceipt};
use crate::state::{AppState, FormKind, Tone};
use std::sync::Arc;

/// Replace the card panel with the gateway's current card list.
pub async fn load_cards<A: BookingApi + ?Sized>(
    api: &A,
    credentials: &dyn CredentialStore,
    state: &mut AppState,
) -> Result<()> {
    let credential = state
        .session
        .credential()
        .cloned()
        .ok_or(ClientError::NotAuthenticated)?;

    match api.list_cards(&credential).await {
        Ok(cards) => {
            tracing::debug!(count = cards.len(), "Cards loaded");
            state.cards = CardsView::from_cards(&cards);
            Ok(())
        }
        Err(err) if err.is_session_expired() => {
            expire_session(credentials, state);
            Err(err)
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to load payment methods");
            state.cards = CardsView::Error(err.display_message("Failed to load cards"));
            Err(err)
        }
    }
}

/// Payments controller.
pub struct PaymentsController<A: ?Sized> {
    api: Arc<A>,
    credentials: Arc<dyn CredentialStore>,
}

impl<A: BookingApi + ?Sized> PaymentsController<A> {
    pub fn new(api: Arc<A>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { api, credentials }
    }

    pub async fn load_cards(&self, state: &mut AppState) -> Result<()> {
        load_cards(self.api.as_ref(), self.credentials.as_ref(), state).await
    }

    /// Validate and attach a card, then reload the card panel.
    pub async fn add_card(&self, state: &mut AppState, form: &CardForm) -> Result<()> {
        let credential = state
            .session
            .credential()
            .cloned()
            .ok_or(ClientError::NotAuthenticated)?;

        let request = match form.to_request(&credential.email) {
            Ok(request) => request,
            Err(err) => {
                state.set_inline(FormKind::Payment, Tone::Error, err.to_string());
                return Err(err.into());
            }
        };
        state.clear_inline(FormKind::Payment);

        match self.api.add_card(&credential, &request).await {
            Ok(()) => {
                tracing::info!(email = %credential.email, "Card added");
                state.push_banner(Tone::Success, "Card added successfully!");
                // The card is stored; a failed reload is already shown in the panel.
                let _ = self.load_cards(state).await;
                Ok(())
            }
            Err(err) if err.is_session_expired() => {
                expire_session(self.credentials.as_ref(), state);
                Err(err)
            }
            Err(err) => {
                tracing::error!(error = %err, "Add card failed");
                state.push_banner(
                    Tone::Error,
                    format!("Failed to add card: {}", err.display_message("Network error occurred")),
                );
                Err(err)
            }
        }
    }

    /// Top up the wallet by a whole amount.
    pub async fn add_funds(&self, state: &mut AppState, amount: &str) -> Result<FundsReceipt> {
        let credential = state
            .session
            .credential()
            .cloned()
            .ok_or(ClientError::NotAuthenticated)?;

        let amount = match amount.trim().parse::<u64>() {
            Ok(amount) if amount > 0 => amount,
            _ => {
                let err = ValidationError::InvalidAmount;
                state.set_inline(FormKind::Payment, Tone::Error, err.to_string());
                return Err(err.into());
            }
        };
        state.clear_inline(FormKind::Payment);

        match self.api.add_funds(&credential, amount).await {
            Ok(receipt) => {
                tracing::info!(amount, balance = receipt.new_balance, "Funds added");
                state.balance = Some(receipt.new_balance);
                state.push_banner(
                    Tone::Success,
                    format!(
                        "Funds added. New balance: ₽{}",
                        format_amount(receipt.new_balance)
                    ),
                );
                Ok(receipt)
            }
            Err(err) if err.is_session_expired() => {
                expire_session(self.credentials.as_ref(), state);
                Err(err)
            }
            Err(err) => {
                state.push_banner(
                    Tone::Error,
                    format!("Failed to add funds: {}", err.display_message("Network error occurred")),
                );
                Err(err)
            }
        }
    }
}
