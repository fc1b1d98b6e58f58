// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application view state.
//!
//! One explicit object holds everything a front end renders. Controllers take
//! it by `&mut` and mutate it; nothing lives in module-level statics.

use crate::display::CardsView;
use crate::models::{Booking, BookingForm, SportBox};
use crate::services::Credential;

/// Who is using the client right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Credential),
}

impl Session {
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Session::Authenticated(credential) => Some(credential),
            Session::Anonymous => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.credential().map(|c| c.email.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

/// Forms that can carry an inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Login,
    Register,
    Booking,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Error,
}

/// Message shown next to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMessage {
    pub form: FormKind,
    pub tone: Tone,
    pub message: String,
}

/// Dismissible message shown above the main content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub tone: Tone,
    pub message: String,
}

/// Where a single booking submission currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Rejected,
    PreconditionChecking,
    PreconditionFailed,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionPhase::Rejected
                | SubmissionPhase::PreconditionFailed
                | SubmissionPhase::Succeeded
                | SubmissionPhase::Failed
        )
    }
}

/// The booking dialog for one box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDialog {
    pub open: bool,
    pub box_name: String,
    pub form: BookingForm,
    pub phase: SubmissionPhase,
}

/// Everything the front end renders.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: Session,
    pub boxes: Vec<SportBox>,
    pub bookings: Vec<Booking>,
    /// Last wallet balance reported by the gateway
    pub balance: Option<f64>,
    pub cards: CardsView,
    pub booking_dialog: BookingDialog,
    pub banners: Vec<Banner>,
    pub inline: Vec<InlineMessage>,
    /// Set while a booking submission is in flight
    pub loading: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_banner(&mut self, tone: Tone, message: impl Into<String>) {
        self.banners.push(Banner {
            tone,
            message: message.into(),
        });
    }

    pub fn dismiss_banner(&mut self, index: usize) -> Option<Banner> {
        (index < self.banners.len()).then(|| self.banners.remove(index))
    }

    /// Set the message for `form`, replacing any previous one.
    pub fn set_inline(&mut self, form: FormKind, tone: Tone, message: impl Into<String>) {
        self.clear_inline(form);
        self.inline.push(InlineMessage {
            form,
            tone,
            message: message.into(),
        });
    }

    pub fn clear_inline(&mut self, form: FormKind) {
        self.inline.retain(|m| m.form != form);
    }

    pub fn inline_for(&self, form: FormKind) -> Option<&InlineMessage> {
        self.inline.iter().find(|m| m.form == form)
    }

    /// Drop everything tied to the current user. Banners survive so the user
    /// can still read why this happened.
    pub fn reset_to_logged_out(&mut self) {
        let banners = std::mem::take(&mut self.banners);
        *self = Self {
            banners,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_message_replaced_per_form() {
        let mut state = AppState::new();
        state.set_inline(FormKind::Booking, Tone::Error, "first");
        state.set_inline(FormKind::Payment, Tone::Error, "card");
        state.set_inline(FormKind::Booking, Tone::Error, "second");

        assert_eq!(state.inline.len(), 2);
        assert_eq!(state.inline_for(FormKind::Booking).unwrap().message, "second");
    }

    #[test]
    fn test_reset_keeps_banners_only() {
        let mut state = AppState::new();
        state.session = Session::Authenticated(Credential {
            email: "ann@example.com".into(),
            token: "t".into(),
        });
        state.balance = Some(10.0);
        state.push_banner(Tone::Info, "Session expired");

        state.reset_to_logged_out();

        assert!(!state.session.is_authenticated());
        assert_eq!(state.balance, None);
        assert_eq!(state.banners.len(), 1);
    }

    #[test]
    fn test_dismiss_banner_out_of_range() {
        let mut state = AppState::new();
        state.push_banner(Tone::Error, "oops");
        assert!(state.dismiss_banner(3).is_none());
        assert_eq!(state.dismiss_banner(0).unwrap().message, "oops");
        assert!(state.banners.is_empty());
    }
}
