// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sport-Box terminal client
//!
//! Books sports boxes through the sport-box gateway: log in, attach a card,
//! top up the wallet, book and cancel time slots.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sport_box_client::{
    config::Config,
    display::{render_slots, render_state},
    models::CardForm,
    services::{FileCredentialStore, HttpBookingApi},
    state::SubmissionPhase,
    AppState, Client,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sport-box", about = "Book sports boxes from the terminal")]
struct Args {
    /// Gateway base URL (overrides SPORT_BOX_API_URL)
    #[arg(long)]
    api_url: Option<String>,
    /// Credential file (overrides SPORT_BOX_CREDENTIALS)
    #[arg(long)]
    credentials: Option<PathBuf>,
    /// Emit logs as JSON (also enabled by LOG_FORMAT=json)
    #[arg(long)]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show boxes, bookings, balance and cards
    Status,
    /// List bookable start times
    Slots,
    /// Book a box
    Book {
        #[arg(long = "box")]
        box_name: String,
        /// Start time, "HH:MM"
        #[arg(long)]
        start: String,
        #[arg(long)]
        people: String,
        #[arg(long)]
        hours: String,
        #[arg(long, default_value = "0")]
        minutes: String,
    },
    /// Cancel a booking by ID
    Cancel { id: i64 },
    /// Attach a payment card
    AddCard {
        #[arg(long)]
        card_number: String,
        #[arg(long)]
        cvc: String,
        #[arg(long)]
        phone: String,
    },
    /// Top up the wallet
    AddFunds { amount: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let json_logs = args.json_logs
        || std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    init_logging(json_logs);

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = args.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(path) = args.credentials {
        config.credentials_path = path;
    }
    tracing::debug!(api = %config.api_base_url, "Starting sport-box client");

    if let Command::Slots = args.command {
        println!("{}", render_slots());
        return Ok(ExitCode::SUCCESS);
    }

    let api = Arc::new(HttpBookingApi::new(&config)?);
    let credentials = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
    let client = Client::new(&config, api, credentials);
    let mut state = AppState::new();

    let ok = run(&client, &mut state, args.command).await?;

    print!("{}", render_state(&state));
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Execute one command against the view state. Returns whether it succeeded.
async fn run(
    client: &Client<HttpBookingApi>,
    state: &mut AppState,
    command: Command,
) -> anyhow::Result<bool> {
    let ok = match command {
        Command::Login { email, password } => {
            client.session.login(state, &email, &password).await.is_ok()
        }
        Command::Register { email, password } => {
            client.session.register(state, &email, &password).await.is_ok()
        }
        Command::Logout => {
            client.session.logout(state)?;
            true
        }
        Command::Slots => true,
        Command::Status => client.session.hydrate(state).await?,
        Command::Book {
            box_name,
            start,
            people,
            hours,
            minutes,
        } => {
            if !client.session.hydrate(state).await? {
                return Ok(false);
            }
            client.booking.open_dialog(state, &box_name);
            let form = &mut state.booking_dialog.form;
            form.start_time = start;
            form.party_size = people;
            form.duration_hours = hours;
            form.duration_minutes = minutes;

            let phase = client.booking.submit(state).await?;
            phase == SubmissionPhase::Succeeded
        }
        Command::Cancel { id } => {
            client.session.hydrate(state).await? && client.booking.cancel(state, id).await.is_ok()
        }
        Command::AddCard {
            card_number,
            cvc,
            phone,
        } => {
            let form = CardForm {
                card_number,
                cvc,
                phone_number: phone,
            };
            client.session.hydrate(state).await?
                && client.payments.add_card(state, &form).await.is_ok()
        }
        Command::AddFunds { amount } => {
            client.session.hydrate(state).await?
                && client.payments.add_funds(state, &amount).await.is_ok()
        }
    };
    Ok(ok)
}

/// Initialize logging to stderr, human-readable or JSON.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sport_box_client=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
