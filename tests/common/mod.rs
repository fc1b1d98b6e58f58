// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use sport_box_client::config::Config;
use sport_box_client::error::{ClientError, Result};
use sport_box_client::models::{Booking, BookingRequest, CardSummary, NewCard, SportBox};
use sport_box_client::services::{
    BookingApi, BookingReceipt, CancelReceipt, Credential, CredentialStore, FundsReceipt,
    LoginRequest, MemoryCredentialStore,
};
use sport_box_client::state::Session;
use sport_box_client::{AppState, Client};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::Notify;

// ─── Fake gateway boundary ───────────────────────────────────

/// Scripted answer of the fake API.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Reply<T> {
    Ok(T),
    Server(u16, &'static str),
    Network,
    Expired,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Server(status, message) => Err(ClientError::server(*status, *message)),
            Reply::Network => Err(ClientError::Network("connection refused".to_string())),
            Reply::Expired => Err(ClientError::SessionExpired),
        }
    }
}

/// In-memory `BookingApi` that records every call.
#[allow(dead_code)]
pub struct FakeBookingApi {
    pub login: Reply<Credential>,
    pub register: Reply<()>,
    pub boxes: Reply<Vec<SportBox>>,
    pub bookings: Reply<Vec<Booking>>,
    pub cards: Reply<Vec<CardSummary>>,
    pub book: Reply<BookingReceipt>,
    pub cancel: Reply<CancelReceipt>,
    pub add_card: Reply<()>,
    pub funds: Reply<FundsReceipt>,
    /// When set, `create_booking` waits for a notification before answering.
    pub book_gate: Option<Arc<Notify>>,
    pub(crate) calls: Mutex<Vec<&'static str>>,
    pub(crate) booking_requests: Mutex<Vec<BookingRequest>>,
    pub(crate) cancelled: Mutex<Vec<i64>>,
    pub(crate) added_cards: Mutex<Vec<NewCard>>,
}

impl Default for FakeBookingApi {
    fn default() -> Self {
        Self {
            login: Reply::Ok(test_credential()),
            register: Reply::Ok(()),
            boxes: Reply::Ok(sample_boxes()),
            bookings: Reply::Ok(sample_bookings()),
            cards: Reply::Ok(vec![CardSummary {
                card_number: "4111111111111111".to_string(),
                phone_number: "5551234567".to_string(),
            }]),
            book: Reply::Ok(BookingReceipt {
                booking_id: Some("17".to_string()),
                new_balance: Some(500.0),
            }),
            cancel: Reply::Ok(CancelReceipt::default()),
            add_card: Reply::Ok(()),
            funds: Reply::Ok(FundsReceipt {
                new_balance: 1500.0,
            }),
            book_gate: None,
            calls: Mutex::new(Vec::new()),
            booking_requests: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            added_cards: Mutex::new(Vec::new()),
        }
    }
}

#[allow(dead_code)]
impl FakeBookingApi {
    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn booking_requests(&self) -> Vec<BookingRequest> {
        self.booking_requests.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<i64> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn added_cards(&self) -> Vec<NewCard> {
        self.added_cards.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingApi for FakeBookingApi {
    async fn login(&self, _request: &LoginRequest, _app_id: i64) -> Result<Credential> {
        self.record("login");
        self.login.get()
    }

    async fn register(&self, _request: &LoginRequest) -> Result<()> {
        self.record("register");
        self.register.get()
    }

    async fn list_boxes(&self, _credential: &Credential) -> Result<Vec<SportBox>> {
        self.record("list_boxes");
        self.boxes.get()
    }

    async fn list_bookings(&self, _credential: &Credential) -> Result<Vec<Booking>> {
        self.record("list_bookings");
        self.bookings.get()
    }

    async fn create_booking(
        &self,
        _credential: &Credential,
        request: &BookingRequest,
    ) -> Result<BookingReceipt> {
        self.record("create_booking");
        self.booking_requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.book_gate {
            gate.notified().await;
        }
        self.book.get()
    }

    async fn cancel_booking(
        &self,
        _credential: &Credential,
        booking_id: i64,
    ) -> Result<CancelReceipt> {
        self.record("cancel_booking");
        self.cancelled.lock().unwrap().push(booking_id);
        self.cancel.get()
    }

    async fn list_cards(&self, _credential: &Credential) -> Result<Vec<CardSummary>> {
        self.record("list_cards");
        self.cards.get()
    }

    async fn add_card(&self, _credential: &Credential, card: &NewCard) -> Result<()> {
        self.record("add_card");
        self.added_cards.lock().unwrap().push(card.clone());
        self.add_card.get()
    }

    async fn add_funds(&self, _credential: &Credential, _amount: u64) -> Result<FundsReceipt> {
        self.record("add_funds");
        self.funds.get()
    }
}

// ─── Fixtures ────────────────────────────────────────────────

#[allow(dead_code)]
pub fn test_credential() -> Credential {
    Credential {
        email: "ann@example.com".to_string(),
        token: "token-123".to_string(),
    }
}

#[allow(dead_code)]
pub fn sample_boxes() -> Vec<SportBox> {
    vec![
        SportBox {
            name: "LeninaBox".to_string(),
            price_per_hour: 600.0,
            available: true,
        },
        SportBox {
            name: "LunacharskogoBox".to_string(),
            price_per_hour: 600.0,
            available: false,
        },
    ]
}

#[allow(dead_code)]
pub fn sample_bookings() -> Vec<Booking> {
    vec![Booking {
        id: 42,
        box_name: "LeninaBox".to_string(),
        start_time: "14:00".to_string(),
        duration_hours: 2,
        duration_minutes: 0,
        party_size: 4,
    }]
}

/// A client over `api` with a stored, already-authenticated credential.
#[allow(dead_code)]
pub fn logged_in<A: BookingApi + 'static>(
    api: Arc<A>,
) -> (Client<A>, AppState, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::with_credential(test_credential()));
    let config = Config::test_default("http://unused.invalid/api");
    let client = Client::new(&config, api, store.clone() as Arc<dyn CredentialStore>);

    let mut state = AppState::new();
    state.session = Session::Authenticated(test_credential());
    (client, state, store)
}

/// Open the dialog for `box_name` and fill the form.
#[allow(dead_code)]
pub fn fill_booking<A: BookingApi + ?Sized>(
    client: &Client<A>,
    state: &mut AppState,
    box_name: &str,
    start: &str,
    people: &str,
    hours: &str,
    minutes: &str,
) {
    client.booking.open_dialog(state, box_name);
    let form = &mut state.booking_dialog.form;
    form.start_time = start.to_string();
    form.party_size = people.to_string();
    form.duration_hours = hours.to_string();
    form.duration_minutes = minutes.to_string();
}

// ─── Mock HTTP gateway ───────────────────────────────────────

/// Canned answer for one method + path.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub set_cookie: Option<String>,
}

#[allow(dead_code)]
impl MockResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            set_cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_string());
        self
    }
}

/// One request as the mock gateway saw it.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct GatewayState {
    routes: Arc<HashMap<(String, String), MockResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running mock of the gateway on a local port.
#[allow(dead_code)]
pub struct MockGateway {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn config(&self) -> Config {
        Config::test_default(&self.base_url)
    }
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn answer(State(state): State<GatewayState>, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let authorization = header_text(request.headers(), header::AUTHORIZATION);
    let cookie = header_text(request.headers(), header::COOKIE);
    let body = to_bytes(request.into_body(), usize::MAX)
        .await
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query,
        authorization,
        cookie,
        body,
    });

    let reply = state
        .routes
        .get(&(method, path))
        .cloned()
        .unwrap_or_else(|| MockResponse::json(404, r#"{"error":"not found"}"#));

    let mut response = (
        StatusCode::from_u16(reply.status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response();
    if let Some(cookie) = reply.set_cookie {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    }
    response
}

/// Start a mock gateway answering `routes` (method, path under `/api`, reply).
#[allow(dead_code)]
pub async fn spawn_gateway(routes: Vec<(&str, &str, MockResponse)>) -> MockGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let routes: HashMap<(String, String), MockResponse> = routes
        .into_iter()
        .map(|(method, path, reply)| ((method.to_string(), format!("/api{path}")), reply))
        .collect();

    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = GatewayState {
        routes: Arc::new(routes),
        requests: requests.clone(),
    };

    let app = Router::new().fallback(answer).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockGateway {
        base_url: format!("http://{addr}/api"),
        requests,
    }
}
