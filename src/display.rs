// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Text presentation of the view state.
//!
//! Card and phone numbers are only ever shown masked.

use crate::models::{Booking, CardSummary, SportBox, TimeSlot};
use crate::state::{AppState, FormKind, Tone};
use std::fmt::Write as _;

const CARD_MASK: &str = "**** **** **** ";
const CARD_MASK_FULL: &str = "**** **** **** ****";
const PHONE_MASK: &str = "*******";
const PHONE_MASK_FULL: &str = "***********";

/// A card as it may be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedCard {
    pub card_number: String,
    pub phone_number: String,
}

/// What the payment-methods panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CardsView {
    #[default]
    NotLoaded,
    Cards(Vec<MaskedCard>),
    /// The gateway listed cards but none had a usable number.
    NoValidCards,
    Empty,
    Error(String),
}

impl CardsView {
    pub fn from_cards(cards: &[CardSummary]) -> Self {
        if cards.is_empty() {
            return CardsView::Empty;
        }

        let masked: Vec<MaskedCard> = cards
            .iter()
            .filter_map(|card| {
                if card.card_number.is_empty() {
                    tracing::warn!("Dropping card entry without a usable card number");
                    return None;
                }
                Some(MaskedCard {
                    card_number: mask_card_number(&card.card_number),
                    phone_number: mask_phone_number(&card.phone_number),
                })
            })
            .collect();

        if masked.is_empty() {
            CardsView::NoValidCards
        } else {
            CardsView::Cards(masked)
        }
    }
}

/// Keep the last four digits of a card number.
pub fn mask_card_number(digits: &str) -> String {
    match last_four(digits) {
        Some(tail) => format!("{CARD_MASK}{tail}"),
        None => CARD_MASK_FULL.to_string(),
    }
}

/// Keep the last four digits of a phone number.
pub fn mask_phone_number(digits: &str) -> String {
    match last_four(digits) {
        Some(tail) => format!("{PHONE_MASK}{tail}"),
        None => PHONE_MASK_FULL.to_string(),
    }
}

fn last_four(digits: &str) -> Option<&str> {
    let start = digits.len().checked_sub(4)?;
    digits.get(start..)
}

/// Price in the gateway's currency, without trailing zeros for whole amounts.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

pub fn render_box(sport_box: &SportBox) -> String {
    format!(
        "{} | ₽{}/hour | {}",
        sport_box.name,
        format_amount(sport_box.price_per_hour),
        if sport_box.available { "Available" } else { "Booked" }
    )
}

pub fn render_booking(booking: &Booking) -> String {
    format!(
        "#{} {} | Time: {} | Duration: {}h {}m | People: {}",
        booking.id,
        booking.box_name,
        booking.start_time,
        booking.duration_hours,
        booking.duration_minutes,
        booking.party_size
    )
}

pub fn render_cards(cards: &CardsView) -> String {
    match cards {
        CardsView::NotLoaded => String::new(),
        CardsView::Cards(cards) => cards
            .iter()
            .map(|card| {
                format!(
                    "Card Number: {}  Phone Number: {}",
                    card.card_number, card.phone_number
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        CardsView::NoValidCards => "No valid cards found. Please add a new card.".to_string(),
        CardsView::Empty => "No payment methods found. Add a card to make bookings.".to_string(),
        CardsView::Error(message) => format!("Error loading cards: {message}"),
    }
}

pub fn render_slots() -> String {
    TimeSlot::all()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn tone_label(tone: Tone) -> &'static str {
    match tone {
        Tone::Success => "ok",
        Tone::Info => "info",
        Tone::Error => "error",
    }
}

fn form_label(form: FormKind) -> &'static str {
    match form {
        FormKind::Login => "login",
        FormKind::Register => "register",
        FormKind::Booking => "booking",
        FormKind::Payment => "payment",
    }
}

/// Render the whole view state as plain text.
pub fn render_state(state: &AppState) -> String {
    let mut out = String::new();

    for banner in &state.banners {
        let _ = writeln!(out, "[{}] {}", tone_label(banner.tone), banner.message);
    }
    for inline in &state.inline {
        let _ = writeln!(
            out,
            "[{} {}] {}",
            form_label(inline.form),
            tone_label(inline.tone),
            inline.message
        );
    }

    let Some(email) = state.session.email() else {
        let _ = writeln!(out, "Not logged in.");
        return out;
    };

    let _ = writeln!(out, "Logged in as {email}");
    if let Some(balance) = state.balance {
        let _ = writeln!(out, "Balance: ₽{}", format_amount(balance));
    }

    if !state.boxes.is_empty() {
        let _ = writeln!(out, "\nBoxes:");
        for sport_box in &state.boxes {
            let _ = writeln!(out, "  {}", render_box(sport_box));
        }
    }

    let _ = writeln!(out, "\nBookings:");
    if state.bookings.is_empty() {
        let _ = writeln!(out, "  No active bookings found.");
    }
    for booking in &state.bookings {
        let _ = writeln!(out, "  {}", render_booking(booking));
    }

    let cards = render_cards(&state.cards);
    if !cards.is_empty() {
        let _ = writeln!(out, "\nPayment methods:");
        for line in cards.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    out
}
