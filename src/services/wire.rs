// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gateway response bodies and their normalization.
//!
//! The gateway grew its response shapes unevenly: some endpoints confirm with
//! `status: "OK"`, some with `success: true`, the reservation ID is spelled
//! `resID` or `reserveID`, and the card listing is either one object or an
//! array. Everything is folded into the types in `booking_api` here.

use crate::error::{ClientError, Result};
use crate::models::card::only_digits;
use crate::models::{Booking, CardSummary, SportBox};
use crate::services::booking_api::{BookingReceipt, CancelReceipt, FundsReceipt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Confirmation fields shared by the mutating endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    /// Fail if the body carries an error or an explicit negative confirmation.
    pub fn check(&self) -> Result<()> {
        if let Some(error) = self.error.as_deref().filter(|e| !e.trim().is_empty()) {
            return Err(ClientError::rejected(error));
        }

        if self.success == Some(false) {
            return Err(ClientError::rejected(
                self.message
                    .clone()
                    .unwrap_or_else(|| "Request was not confirmed".to_string()),
            ));
        }

        if let Some(status) = self.status.as_deref() {
            if !status.eq_ignore_ascii_case("ok") && self.success != Some(true) {
                return Err(ClientError::rejected(
                    self.message.clone().unwrap_or_else(|| status.to_string()),
                ));
            }
        }

        Ok(())
    }

    /// Whether the body positively confirms success, in either spelling.
    pub fn confirmed(&self) -> bool {
        self.success == Some(true)
            || self
                .status
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("ok"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub ack: Ack,
}

#[derive(Debug, Deserialize)]
struct BoxesResponse {
    #[serde(default)]
    boxes: Option<Vec<SportBox>>,
}

#[derive(Debug, Deserialize)]
struct BookingsResponse {
    #[serde(default)]
    bookings: Option<Vec<Booking>>,
}

#[derive(Debug, Deserialize)]
struct BookResponse {
    #[serde(default, rename = "resID", alias = "reserveID")]
    res_id: Option<Value>,
    #[serde(default)]
    balance: Option<f64>,
    #[serde(flatten)]
    ack: Ack,
}

#[derive(Debug, Deserialize)]
struct CancelResponse {
    #[serde(default, rename = "refundedAmount")]
    refunded_amount: Option<f64>,
    #[serde(default)]
    balance: Option<f64>,
    #[serde(flatten)]
    ack: Ack,
}

#[derive(Debug, Deserialize)]
struct FundsResponse {
    #[serde(default)]
    balance: Option<f64>,
    #[serde(flatten)]
    ack: Ack,
}

#[derive(Debug, Deserialize)]
struct CardEntry {
    #[serde(default, rename = "cardNumber")]
    card_number: Option<Value>,
    #[serde(default, rename = "phoneNumber")]
    phone_number: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CardList {
    Many(Vec<CardEntry>),
    One(CardEntry),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode a JSON body, reporting malformed content as a network failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ClientError::Network(format!("Malformed response: {e}")))
}

/// Pull the human-readable message out of an error answer.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error
        .filter(|e| !e.trim().is_empty())
        .or(parsed.message.filter(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| {
            if body.trim_start().starts_with('{') {
                String::new()
            } else {
                body.trim().to_string()
            }
        })
}

pub(crate) fn boxes(body: &str) -> Result<Vec<SportBox>> {
    Ok(decode::<BoxesResponse>(body)?.boxes.unwrap_or_default())
}

pub(crate) fn bookings(body: &str) -> Result<Vec<Booking>> {
    Ok(decode::<BookingsResponse>(body)?.bookings.unwrap_or_default())
}

pub(crate) fn booking_receipt(body: &str) -> Result<BookingReceipt> {
    let response: BookResponse = decode(body)?;
    response.ack.check()?;

    Ok(BookingReceipt {
        booking_id: response.res_id.as_ref().and_then(id_text),
        new_balance: response.balance,
    })
}

pub(crate) fn cancel_receipt(body: &str) -> Result<CancelReceipt> {
    // Plain cancellation answers carry no body at all.
    if body.trim().is_empty() {
        return Ok(CancelReceipt::default());
    }

    let response: CancelResponse = decode(body)?;
    response.ack.check()?;

    Ok(CancelReceipt {
        refunded_amount: response.refunded_amount,
        new_balance: response.balance,
    })
}

pub(crate) fn funds_receipt(body: &str) -> Result<FundsReceipt> {
    let response: FundsResponse = decode(body)?;
    response.ack.check()?;

    let new_balance = response
        .balance
        .ok_or_else(|| ClientError::Network("Malformed response: missing balance".to_string()))?;
    Ok(FundsReceipt { new_balance })
}

/// Normalize any card-listing body into a list.
pub(crate) fn cards(body: &str) -> Result<Vec<CardSummary>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let entries = match decode::<Option<CardList>>(body)? {
        None => Vec::new(),
        Some(CardList::Many(entries)) => entries,
        Some(CardList::One(entry)) => {
            if let Some(error) = entry.error.as_deref().filter(|e| !e.trim().is_empty()) {
                return Err(ClientError::rejected(error));
            }
            vec![entry]
        }
    };

    Ok(entries
        .into_iter()
        .map(|entry| CardSummary {
            card_number: entry.card_number.as_ref().map(digits_of).unwrap_or_default(),
            phone_number: entry.phone_number.as_ref().map(digits_of).unwrap_or_default(),
        })
        .collect())
}

/// Digits of a value sent as either a JSON number or a string.
fn digits_of(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(u) => u.to_string(),
            None => only_digits(&n.to_string()),
        },
        Value::String(s) => only_digits(s),
        _ => String::new(),
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerErrorKind;

    #[test]
    fn test_booking_receipt_status_shape() {
        let receipt =
            booking_receipt(r#"{"status":"OK","resID":17,"balance":500}"#).expect("receipt");
        assert_eq!(receipt.booking_id.as_deref(), Some("17"));
        assert_eq!(receipt.new_balance, Some(500.0));
    }

    #[test]
    fn test_booking_receipt_success_shape() {
        let receipt = booking_receipt(r#"{"success":true,"reserveID":"R-9","balance":120.5}"#)
            .expect("receipt");
        assert_eq!(receipt.booking_id.as_deref(), Some("R-9"));
        assert_eq!(receipt.new_balance, Some(120.5));
    }

    #[test]
    fn test_booking_receipt_without_id_or_balance() {
        let receipt = booking_receipt(r#"{"success":true}"#).expect("receipt");
        assert_eq!(receipt, BookingReceipt::default());
    }

    #[test]
    fn test_booking_error_payload_is_server_error() {
        let err = booking_receipt(r#"{"error":"Box unavailable"}"#).unwrap_err();
        assert_eq!(err.server_kind(), Some(ServerErrorKind::Other));
        assert_eq!(err.display_message("fallback"), "Box unavailable");

        let err = booking_receipt(r#"{"status":"Error","success":false}"#).unwrap_err();
        assert!(matches!(err, ClientError::Server { .. }));
    }

    #[test]
    fn test_cards_accepts_object_array_and_null() {
        let one = cards(r#"{"cardNumber":"4111111111111111","phoneNumber":"5551234567"}"#)
            .expect("object");
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].card_number, "4111111111111111");

        let many = cards(
            r#"[{"cardNumber":4111111111111111,"phoneNumber":5551234567},
                {"cardNumber":"5500-0000-0000-0004","phoneNumber":"+7 (900) 000-11-22"}]"#,
        )
        .expect("array");
        assert_eq!(many.len(), 2);
        assert_eq!(many[0].card_number, "4111111111111111");
        assert_eq!(many[0].phone_number, "5551234567");
        assert_eq!(many[1].card_number, "5500000000000004");
        assert_eq!(many[1].phone_number, "79000001122");

        assert!(cards("null").expect("null").is_empty());
        assert!(cards("[]").expect("empty").is_empty());
        assert!(cards("").expect("blank").is_empty());
    }

    #[test]
    fn test_card_entry_without_digits_is_kept_blank() {
        let list = cards(r#"[{"cardNumber":null,"phoneNumber":true}]"#).expect("array");
        assert_eq!(list, vec![CardSummary::default()]);
    }

    #[test]
    fn test_error_message_prefers_error_then_message() {
        assert_eq!(error_message(r#"{"error":"Card not found"}"#), "Card not found");
        assert_eq!(error_message(r#"{"message":"Bad input"}"#), "Bad input");
        assert_eq!(error_message(r#"{"status":"Error"}"#), "");
        assert_eq!(error_message("upstream timeout"), "upstream timeout");
    }

    #[test]
    fn test_cancel_receipt_empty_body() {
        assert_eq!(cancel_receipt("").unwrap(), CancelReceipt::default());
        let receipt =
            cancel_receipt(r#"{"success":true,"refundedAmount":300,"balance":800}"#).unwrap();
        assert_eq!(receipt.new_balance, Some(800.0));
        assert_eq!(receipt.refunded_amount, Some(300.0));
    }

    #[test]
    fn test_funds_receipt_requires_balance() {
        assert_eq!(
            funds_receipt(r#"{"success":true,"balance":1500}"#)
                .unwrap()
                .new_balance,
            1500.0
        );
        assert!(matches!(
            funds_receipt(r#"{"success":true}"#),
            Err(ClientError::Network(_))
        ));
    }

    #[test]
    fn test_ack_confirmation_spellings() {
        let ack: Ack = serde_json::from_str(r#"{"status":"OK"}"#).unwrap();
        assert!(ack.confirmed());
        let ack: Ack = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(ack.confirmed());
        let ack: Ack = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!ack.confirmed());
        assert!(ack.check().is_ok());
    }
}
