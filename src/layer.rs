//! Tower integration.
//!
//! [`PrettifyLayer`] wraps any inner service producing axum responses. On the
//! response path it buffers eligible bodies, classifies them, and drives the
//! interception pipeline; streaming and oversized bodies pass through
//! untouched.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body::Body as _;
use tower::{Layer, Service};
use tracing::{debug, error};

use crate::config::{FormatOverride, PrettifyConfig};
use crate::engine::{FormatEngine, JsonEngine};
use crate::intercept::{install_with, parse_query, QueryParams};
use crate::payload::Payload;
use crate::responder::Responder;

/// Layer that applies conditional response formatting.
#[derive(Clone)]
pub struct PrettifyLayer {
    config: Arc<PrettifyConfig>,
    engine: Arc<dyn FormatEngine>,
}

impl PrettifyLayer {
    /// Create a layer with the bundled JSON engine.
    pub fn new(config: PrettifyConfig) -> Self {
        Self::with_engine(config, Arc::new(JsonEngine))
    }

    /// Create a layer with a custom formatting engine.
    pub fn with_engine(config: PrettifyConfig, engine: Arc<dyn FormatEngine>) -> Self {
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}

impl Default for PrettifyLayer {
    fn default() -> Self {
        Self::new(PrettifyConfig::default())
    }
}

impl<S> Layer<S> for PrettifyLayer {
    type Service = PrettifyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PrettifyService {
            inner,
            config: self.config.clone(),
            engine: self.engine.clone(),
        }
    }
}

/// Service produced by [`PrettifyLayer`].
#[derive(Clone)]
pub struct PrettifyService<S> {
    inner: S,
    config: Arc<PrettifyConfig>,
    engine: Arc<dyn FormatEngine>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for PrettifyService<S>
where
    S: Service<Request<ReqBody>, Response = Response>,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        // The query string is read before the request moves downstream; the
        // decision itself is taken on the response path.
        let query = parse_query(request.uri().query().unwrap_or(""));
        let config = self.config.clone();
        let engine = self.engine.clone();
        let future = self.inner.call(request);

        Box::pin(async move {
            let response = future.await?;
            Ok(apply(response, config, engine, query).await)
        })
    }
}

/// Run one response through the interception pipeline.
async fn apply(
    response: Response,
    config: Arc<PrettifyConfig>,
    engine: Arc<dyn FormatEngine>,
    query: QueryParams,
) -> Response {
    let (mut parts, body) = response.into_parts();

    // Streaming bodies have no exact size and are never buffered.
    let Some(size) = body.size_hint().exact() else {
        return Response::from_parts(parts, body);
    };
    if size as usize > config.max_buffer_size {
        debug!(
            size,
            limit = config.max_buffer_size,
            "body exceeds buffer limit, passing through"
        );
        return Response::from_parts(parts, body);
    }

    let bytes = match to_bytes(body, config.max_buffer_size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!(error = %err, "failed to buffer response body");
            return internal_error();
        }
    };

    // Handlers may attach per-response format overrides via extensions.
    let overrides = parts.extensions.remove::<FormatOverride>();

    let mut responder = Responder::new(std::mem::take(&mut parts.headers));
    install_with(&mut responder, config, engine, query, overrides);

    match responder.send(Payload::classify(bytes)) {
        Ok(()) => {
            let (headers, delivered) = responder.into_parts();
            parts.headers = headers;
            let body = delivered.map(Payload::into_body).unwrap_or_else(Body::empty);
            Response::from_parts(parts, body)
        }
        Err(err) => {
            // Fallback is disabled and the transform failed; surface it on
            // the framework's error path.
            error!(error = %err, "response formatting failed");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    let mut response = Response::new(Body::from("internal server error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
