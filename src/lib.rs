//! Conditional response pretty-printing middleware for axum/tower.
//!
//! Intercepts an outgoing response body before delivery and, when activated
//! by a query parameter (default `?pretty=true`) or an always-on flag,
//! re-emits it in indented form through a pluggable formatting engine.
//! Binary and streaming bodies always pass through untouched; formatting
//! failures fall back to the original body unless configured otherwise.
//!
//! # Example
//!
//! ```ignore
//! use axum::{routing::get, Json, Router};
//! use axum_prettify::PrettifyLayer;
//!
//! let app: Router = Router::new()
//!     .route("/", get(|| async { Json(serde_json::json!({"ok": true})) }))
//!     .layer(PrettifyLayer::default());
//! ```

pub mod config;
pub mod engine;
pub mod intercept;
pub mod layer;
pub mod payload;
pub mod responder;

pub use config::{FormatMode, FormatOptions, FormatOverride, PrettifyConfig, QueryTrigger};
pub use engine::{EngineError, FormatEngine, JsonEngine};
pub use intercept::{install, install_with, parse_query, Error, Outcome};
pub use layer::{PrettifyLayer, PrettifyService};
pub use payload::{BodyProducer, Payload};
pub use responder::{Responder, SendInterceptor};
