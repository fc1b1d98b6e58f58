// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payment card models.

use crate::error::ValidationError;
use serde::Serialize;
use validator::Validate;

/// A card as listed by the gateway, reduced to digit strings.
///
/// Either field may be empty when the gateway sent something that holds no
/// digits; the display layer drops cards without a card number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSummary {
    pub card_number: String,
    pub phone_number: String,
}

/// Raw add-card dialog input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    pub card_number: String,
    pub cvc: String,
    pub phone_number: String,
}

/// Card input reduced to digits, checked for exact lengths.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CardDigits {
    #[validate(length(equal = 16))]
    pub card_number: String,
    #[validate(length(equal = 3))]
    pub cvc: String,
    #[validate(length(equal = 10))]
    pub phone_number: String,
}

/// Add-card request body. The gateway stores these as integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub email: String,
    pub card_number: u64,
    pub cvc: u64,
    pub phone_number: u64,
}

impl CardForm {
    /// Strip everything but digits and check lengths (card, then CVC, then phone).
    pub fn digits(&self) -> Result<CardDigits, ValidationError> {
        let digits = CardDigits {
            card_number: only_digits(&self.card_number),
            cvc: only_digits(&self.cvc),
            phone_number: only_digits(&self.phone_number),
        };

        if let Err(errors) = digits.validate() {
            let fields = errors.field_errors();
            let err = if fields.contains_key("card_number") {
                ValidationError::CardNumberLength
            } else if fields.contains_key("cvc") {
                ValidationError::CvcLength
            } else {
                ValidationError::PhoneNumberLength
            };
            return Err(err);
        }

        Ok(digits)
    }

    /// Validate and build the request for `email`.
    pub fn to_request(&self, email: &str) -> Result<NewCard, ValidationError> {
        let digits = self.digits()?;
        Ok(NewCard {
            email: email.to_string(),
            card_number: parse_digits(&digits.card_number, ValidationError::CardNumberLength)?,
            cvc: parse_digits(&digits.cvc, ValidationError::CvcLength)?,
            phone_number: parse_digits(&digits.phone_number, ValidationError::PhoneNumberLength)?,
        })
    }
}

/// Keep only ASCII digits.
pub fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn parse_digits(digits: &str, err: ValidationError) -> Result<u64, ValidationError> {
    digits.parse().map_err(|_| err)
}
