// Copyright (c) 2025 - Cowboy AI, Inc.
//! Gundi Validator
//!
//! Reads newline-delimited JSON from stdin and validates each document.
//! Valid documents are written to stdout in their normalised form
//! (timestamps in UTC, discriminators and `event_type` filled in); problems
//! are logged to stderr and make the process exit non-zero.
//!
//! Run with: cargo run --bin gundi-validate --features cli < documents.jsonl
//!
//! Environment:
//! 1. GUNDI_EVENT_TYPE - decode envelopes of this event type (default: decode entities)
//! 2. GUNDI_ACCEPTED_SCHEMA_VERSIONS - extra accepted versions (`IntegrationUpdated=v1|v2`)
//! 3. RUST_LOG - log filter (default: info)

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use gundi_core::{DecodeConfig, Entity, EventDecoder, EventType};
use serde_json::Value;
use tracing::{debug, info, warn};

/// What each input line is decoded as
#[derive(Debug, Clone, Copy)]
enum Target {
    Entity,
    Envelope(EventType),
}

/// Configuration for the validator
#[derive(Debug)]
struct ValidatorConfig {
    target: Target,
    decode: DecodeConfig,
}

impl ValidatorConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let target = match std::env::var("GUNDI_EVENT_TYPE") {
            Ok(name) => Target::Envelope(
                name.parse()
                    .with_context(|| format!("GUNDI_EVENT_TYPE={} is not a known event type", name))?,
            ),
            Err(_) => Target::Entity,
        };

        let decode = DecodeConfig::from_env().context("Invalid GUNDI_ACCEPTED_SCHEMA_VERSIONS")?;

        Ok(Self { target, decode })
    }
}

fn validate_line(decoder: &EventDecoder, target: Target, line: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(line).context("not valid JSON")?;
    let normalised = match target {
        Target::Entity => Entity::decode(value)?.encode()?,
        Target::Envelope(event_type) => decoder.decode_as(event_type, value)?.to_json()?,
    };
    Ok(normalised)
}

fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ValidatorConfig::from_env()?;
    match config.target {
        Target::Entity => info!("🔍 Validating entities"),
        Target::Envelope(event_type) => info!("🔍 Validating {} envelopes", event_type),
    }

    let target = config.target;
    let decoder = EventDecoder::new(config.decode);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    let mut valid = 0u64;
    let mut invalid = 0u64;

    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match validate_line(&decoder, target, &line) {
            Ok(normalised) => {
                valid += 1;
                debug!("✅ Line {} is valid", index + 1);
                serde_json::to_writer(&mut stdout, &normalised)?;
                writeln!(stdout)?;
            }
            Err(e) => {
                invalid += 1;
                warn!("❌ Line {}: {:#}", index + 1, e);
            }
        }
    }

    info!("📊 {} valid, {} invalid", valid, invalid);
    Ok(if invalid == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
