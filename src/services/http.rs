// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the sport-box gateway.
//!
//! Handles:
//! - Login and registration
//! - Box and booking listings
//! - Booking creation and cancellation
//! - Card listing, card creation and wallet top-ups
//! - Session rejection detection (401, or a 403 the card listing confirms)

use crate::config::Config;
use crate::error::{ClientError, Result, ServerErrorKind};
use crate::models::{Booking, BookingRequest, CardSummary, NewCard, SportBox};
use crate::services::booking_api::{
    BookingApi, BookingReceipt, CancelReceipt, Credential, FundsReceipt, LoginRequest,
};
use crate::services::wire;
use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Name of the cookie the gateway reads the session token from.
pub const AUTH_COOKIE: &str = "auth_token";

/// Gateway API client.
#[derive(Clone)]
pub struct HttpBookingApi {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "appID")]
    app_id: i64,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct FundsBody<'a> {
    email: &'a str,
    amount: u64,
}

impl HttpBookingApi {
    /// Create a client for the gateway named in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Internal(anyhow::anyhow!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the session credential both ways the gateway accepts it.
    fn authorized(&self, builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        builder
            .bearer_auth(&credential.token)
            .header(COOKIE, format!("{AUTH_COOKIE}={}", credential.token))
    }

    fn cards_url(&self, credential: &Credential) -> String {
        self.url(&format!(
            "/payments/cards?email={}",
            urlencoding::encode(&credential.email)
        ))
    }

    /// Send an authenticated request. A 401 always means the session is gone.
    async fn send(
        &self,
        builder: RequestBuilder,
        credential: &Credential,
    ) -> Result<reqwest::Response> {
        let response = self
            .authorized(builder, credential)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Gateway rejected session credential");
            return Err(ClientError::SessionExpired);
        }
        Ok(response)
    }

    /// Send an authenticated request and return the body of a 2xx answer.
    ///
    /// The gateway answers 403 both for a rejected token and for a refused
    /// operation (such as cancelling another user's booking). A 403 here is
    /// only treated as an expired session if the card listing refuses the
    /// same credential as well.
    async fn send_authorized(
        &self,
        builder: RequestBuilder,
        credential: &Credential,
    ) -> Result<String> {
        let response = self.send(builder, credential).await?;
        if response.status() != StatusCode::FORBIDDEN {
            return self.check_response_text(response).await;
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response: {e}")))?;
        if self.session_rejected(credential).await {
            tracing::warn!("Gateway rejected session credential");
            return Err(ClientError::SessionExpired);
        }

        tracing::info!("Gateway refused the request for a valid session");
        Err(ClientError::server(
            StatusCode::FORBIDDEN.as_u16(),
            wire::error_message(&body),
        ))
    }

    /// Whether the card listing refuses `credential` outright.
    async fn session_rejected(&self, credential: &Credential) -> bool {
        let request = self.authorized(self.http.get(self.cards_url(credential)), credential);
        match request.send().await {
            Ok(response) => matches!(
                response.status(),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            ),
            Err(e) => {
                tracing::debug!(error = %e, "Session check failed, keeping session");
                false
            }
        }
    }

    /// Check response status and return the body text if successful.
    async fn check_response_text(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response: {e}")))?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::debug!(%status, "Gateway returned error status");
        Err(ClientError::server(status.as_u16(), wire::error_message(&body)))
    }
}

/// Token from an `auth_token=...` Set-Cookie header, if the gateway set one.
fn token_from_cookies(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?.trim();
            let value = pair.strip_prefix(AUTH_COOKIE)?.strip_prefix('=')?;
            (!value.is_empty()).then(|| value.to_string())
        })
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn login(&self, request: &LoginRequest, app_id: i64) -> Result<Credential> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginBody {
                email: &request.email,
                password: &request.password,
                app_id,
            })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let cookie_token = token_from_cookies(&response);
        let body = self.check_response_text(response).await?;
        let login: wire::LoginResponse = wire::decode(&body)?;
        login.ack.check()?;
        if !login.ack.confirmed() {
            return Err(ClientError::rejected("Unexpected login response"));
        }

        let token = login
            .token
            .filter(|t| !t.is_empty())
            .or(cookie_token)
            .ok_or_else(|| ClientError::rejected("Login response did not include a session token"))?;

        tracing::info!(email = %request.email, "Logged in");
        Ok(Credential {
            email: request.email.clone(),
            token,
        })
    }

    async fn register(&self, request: &LoginRequest) -> Result<()> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&RegisterBody {
                email: &request.email,
                password: &request.password,
            })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let body = self.check_response_text(response).await?;
        let ack: wire::Ack = wire::decode(&body)?;
        ack.check()?;
        if !ack.confirmed() {
            return Err(ClientError::rejected("Unexpected registration response"));
        }
        Ok(())
    }

    async fn list_boxes(&self, credential: &Credential) -> Result<Vec<SportBox>> {
        let body = self
            .send_authorized(self.http.get(self.url("/boxes")), credential)
            .await?;
        wire::boxes(&body)
    }

    async fn list_bookings(&self, credential: &Credential) -> Result<Vec<Booking>> {
        let body = self
            .send_authorized(self.http.get(self.url("/bookings")), credential)
            .await?;
        wire::bookings(&body)
    }

    async fn create_booking(
        &self,
        credential: &Credential,
        request: &BookingRequest,
    ) -> Result<BookingReceipt> {
        tracing::info!(
            box_name = %request.box_name,
            start = %request.start_time,
            hours = request.duration_hours,
            minutes = request.duration_minutes,
            people = request.party_size,
            "Submitting booking"
        );

        let body = self
            .send_authorized(self.http.post(self.url("/book")).json(request), credential)
            .await?;
        wire::booking_receipt(&body)
    }

    async fn cancel_booking(
        &self,
        credential: &Credential,
        booking_id: i64,
    ) -> Result<CancelReceipt> {
        let builder = self
            .http
            .delete(self.url(&format!("/bookings/{booking_id}")))
            .json(&EmailBody {
                email: &credential.email,
            });

        let body = self.send_authorized(builder, credential).await?;
        wire::cancel_receipt(&body)
    }

    async fn list_cards(&self, credential: &Credential) -> Result<Vec<CardSummary>> {
        // This listing is the session check itself: 403 here is a rejected token.
        let response = self
            .send(self.http.get(self.cards_url(credential)), credential)
            .await?;
        if response.status() == StatusCode::FORBIDDEN {
            tracing::warn!("Gateway rejected session credential");
            return Err(ClientError::SessionExpired);
        }

        match self.check_response_text(response).await {
            Ok(body) => wire::cards(&body),
            // The gateway answers 404 when no card is on file.
            Err(err) if err.server_kind() == Some(ServerErrorKind::NotFound) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    async fn add_card(&self, credential: &Credential, card: &NewCard) -> Result<()> {
        let body = self
            .send_authorized(
                self.http.post(self.url("/payments/add-card")).json(card),
                credential,
            )
            .await?;

        if body.trim().is_empty() {
            return Ok(());
        }
        let ack: wire::Ack = wire::decode(&body)?;
        ack.check()
    }

    async fn add_funds(&self, credential: &Credential, amount: u64) -> Result<FundsReceipt> {
        let builder = self
            .http
            .post(self.url("/payments/add-funds"))
            .json(&FundsBody {
                email: &credential.email,
                amount,
            });

        let body = self.send_authorized(builder, credential).await?;
        wire::funds_receipt(&body)
    }
}
