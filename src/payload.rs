//! Response body classification.
//!
//! # Responsibilities
//! - Classify an outgoing body into exactly one tag before any transform runs
//! - Convert classified payloads back into wire bodies for delivery
//!
//! # Design Decisions
//! - Classification happens once, at the interception boundary
//! - Binary and streaming payloads are never inspected past the tag
//! - A deferred producer is opaque content; it materializes only at delivery

use std::fmt;

use axum::body::Body;
use bytes::Bytes;
use serde_json::Value;

/// A response body, classified for the transform pipeline.
pub enum Payload {
    /// Materialized non-text content. Always passed through unchanged.
    Binary(Bytes),
    /// Streaming content. Never buffered or inspected.
    Stream(Body),
    /// Structured data, serialized to compact JSON before formatting.
    Structured(Value),
    /// Textual content.
    Text(String),
    /// A deferred body closure, run only at final delivery. Never valid
    /// input to a formatting engine.
    Producer(BodyProducer),
}

impl Payload {
    /// Classify a fully buffered wire body: UTF-8 text or opaque binary.
    pub fn classify(bytes: Bytes) -> Payload {
        match String::from_utf8(Vec::from(bytes)) {
            Ok(text) => Payload::Text(text),
            Err(err) => Payload::Binary(Bytes::from(err.into_bytes())),
        }
    }

    /// Payloads that skip the transform pipeline entirely.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Payload::Binary(_) | Payload::Stream(_))
    }

    /// Classification tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Binary(_) => "binary",
            Payload::Stream(_) => "stream",
            Payload::Structured(_) => "structured",
            Payload::Text(_) => "text",
            Payload::Producer(_) => "producer",
        }
    }

    /// Convert into a wire body for delivery.
    pub fn into_body(self) -> Body {
        match self {
            Payload::Binary(bytes) => Body::from(bytes),
            Payload::Stream(body) => body,
            Payload::Structured(value) => Body::from(value.to_string()),
            Payload::Text(text) => Body::from(text),
            Payload::Producer(producer) => Body::from(producer.produce()),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Binary(bytes) => f.debug_tuple("Binary").field(&bytes.len()).finish(),
            Payload::Stream(_) => f.write_str("Stream"),
            Payload::Structured(value) => f.debug_tuple("Structured").field(value).finish(),
            Payload::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Payload::Producer(_) => f.write_str("Producer"),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Structured(value)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Binary(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(Bytes::from(bytes))
    }
}

/// A deferred body closure, materialized once at delivery time.
pub struct BodyProducer(Box<dyn FnOnce() -> Bytes + Send + 'static>);

impl BodyProducer {
    /// Wrap a closure that produces the body bytes on demand.
    pub fn new(producer: impl FnOnce() -> Bytes + Send + 'static) -> Self {
        Self(Box::new(producer))
    }

    /// Run the closure and materialize the bytes.
    pub fn produce(self) -> Bytes {
        (self.0)()
    }
}

impl fmt::Debug for BodyProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyProducer")
    }
}
