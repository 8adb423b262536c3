//! Send interception and the conditional-transform pipeline.
//!
//! # Responsibilities
//! - Install the prettify interceptor on a [`Responder`]
//! - Decide per send whether to format (query trigger / always-on)
//! - Run the formatting engine with isolated failure handling
//! - Reconcile `content-length` with the formatted body
//!
//! # Design Decisions
//! - The interceptor restores the original send behavior before any other
//!   logic, so delivery happens exactly once per logical response
//! - Activation compares query values as strings after percent decoding;
//!   repeated parameters join with `,` before the comparison
//! - A transform failure is a one-shot event resolved by the fallback
//!   policy; nothing is retried

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::header::CONTENT_LENGTH;
use axum::http::HeaderValue;
use tracing::debug;

use crate::config::{FormatOverride, PrettifyConfig};
use crate::engine::{EngineError, FormatEngine};
use crate::payload::Payload;
use crate::responder::{Responder, SendInterceptor};

/// Errors raised from an intercepted send.
///
/// Both kinds are suppressed when `fallback_on_error` is set; otherwise they
/// propagate out of [`Responder::send`] synchronously.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The payload is a deferred producer, which is not materialized content
    /// and can never be formatted.
    #[error("cannot format a deferred body producer")]
    UnsupportedBody,

    /// The formatting engine rejected the normalized text.
    #[error("format engine failed: {0}")]
    Engine(#[from] EngineError),
}

/// Result of one transform attempt. Consumed immediately; never stored.
#[derive(Debug)]
pub enum Outcome {
    /// Activation did not apply; deliver the original body.
    Skipped,
    /// The engine produced a formatted body.
    Succeeded(String),
    /// Normalization or the engine failed.
    Failed(Error),
}

/// Parsed query parameters, percent-decoded, repeats joined with `,`.
pub type QueryParams = HashMap<String, String>;

/// Parse a raw query string into [`QueryParams`].
///
/// `?pretty=a&pretty=b` yields `pretty => "a,b"`, mirroring coercive
/// array-to-string comparison; a repeated trigger therefore does not
/// activate unless the configured value contains the comma itself.
pub fn parse_query(query: &str) -> QueryParams {
    let mut params = QueryParams::new();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(name.into_owned())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Wrap the responder's send behavior with the prettify interceptor.
///
/// Installation never fails and changes nothing until a send occurs; the
/// caller's handler chain proceeds unimpeded.
pub fn install(
    responder: &mut Responder,
    config: Arc<PrettifyConfig>,
    engine: Arc<dyn FormatEngine>,
    query: QueryParams,
) {
    install_with(responder, config, engine, query, None);
}

/// [`install`] with per-send format overrides, which take precedence over
/// the configured options for this response only.
pub fn install_with(
    responder: &mut Responder,
    config: Arc<PrettifyConfig>,
    engine: Arc<dyn FormatEngine>,
    query: QueryParams,
    overrides: Option<FormatOverride>,
) {
    let original = responder.set_interceptor(None);
    responder.set_interceptor(Some(Box::new(PrettifyInterceptor {
        original,
        config,
        engine,
        query,
        overrides,
    })));
}

/// The interceptor bound by [`install`]. One-shot: it restores the original
/// send behavior as its first action.
pub struct PrettifyInterceptor {
    original: Option<Box<dyn SendInterceptor>>,
    config: Arc<PrettifyConfig>,
    engine: Arc<dyn FormatEngine>,
    query: QueryParams,
    overrides: Option<FormatOverride>,
}

impl PrettifyInterceptor {
    /// Whether this request activates formatting.
    fn activated(&self) -> bool {
        if self.config.always_on {
            return true;
        }
        let trigger = &self.config.query;
        trigger.enabled
            && self
                .query
                .get(&trigger.name)
                .is_some_and(|value| *value == trigger.value)
    }

    /// Normalize the payload and run the engine.
    fn evaluate(&self, payload: &Payload) -> Outcome {
        if !self.activated() {
            return Outcome::Skipped;
        }

        let source = match payload {
            // Deferred producers are not materialized content.
            Payload::Producer(_) => return Outcome::Failed(Error::UnsupportedBody),
            // Canonical compact form first, then the engine re-indents.
            Payload::Structured(value) => value.to_string(),
            Payload::Text(text) => text.clone(),
            // Guarded by the passthrough check in on_send.
            Payload::Binary(_) | Payload::Stream(_) => return Outcome::Skipped,
        };

        let opts = self.config.format.merge(self.overrides.as_ref());
        match self.engine.format(&source, &opts) {
            Ok(formatted) => Outcome::Succeeded(formatted),
            Err(err) => Outcome::Failed(Error::Engine(err)),
        }
    }
}

impl SendInterceptor for PrettifyInterceptor {
    fn on_send(&mut self, responder: &mut Responder, payload: Payload) -> Result<(), Error> {
        // Restore the original send behavior before anything else; every
        // delivery below, and any repeated send, bypasses this interceptor.
        responder.set_interceptor(self.original.take());

        // Binary and streaming payloads are never inspected.
        if payload.is_passthrough() {
            return responder.send(payload);
        }

        match self.evaluate(&payload) {
            Outcome::Skipped => responder.send(payload),
            Outcome::Succeeded(formatted) => {
                if self.config.override_content_length {
                    responder
                        .headers_mut()
                        .insert(CONTENT_LENGTH, HeaderValue::from(formatted.len()));
                }
                responder.send(Payload::Text(formatted))
            }
            Outcome::Failed(err) if self.config.fallback_on_error => {
                debug!(
                    engine = self.engine.name(),
                    kind = payload.kind(),
                    error = %err,
                    "prettify failed, delivering original body"
                );
                responder.send(payload)
            }
            Outcome::Failed(err) => Err(err),
        }
    }
}
