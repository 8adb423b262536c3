//! Response abstraction with a pluggable send capability.
//!
//! # Responsibilities
//! - Own the mutable response header map
//! - Dispatch `send` to the bound interceptor, or deliver directly
//! - Record the delivered payload for the host adapter to pick up
//!
//! # Design Decisions
//! - Interception is explicit decoration, not hidden method patching: the
//!   interceptor slot is taken before the hook runs, so any recursive send
//!   from inside a hook reaches whatever the hook restored (usually the
//!   original delivery)
//! - An empty slot means intrinsic delivery: the payload is recorded and the
//!   host adapter turns it into a wire response

use axum::http::HeaderMap;

use crate::intercept::Error;
use crate::payload::Payload;

/// A send interceptor bound to a [`Responder`].
///
/// Invoked at most once; the responder removes the interceptor from its slot
/// before calling `on_send`, so the hook is consumed by its first use.
pub trait SendInterceptor: Send {
    /// Handle a send call. Implementations decide what to deliver and do so
    /// by calling [`Responder::send`] again (which now reaches whatever they
    /// restored into the slot).
    fn on_send(&mut self, responder: &mut Responder, payload: Payload) -> Result<(), Error>;
}

/// An outgoing response: headers plus a send slot.
///
/// Exclusively owned by one request/response pair; never shared.
pub struct Responder {
    headers: HeaderMap,
    interceptor: Option<Box<dyn SendInterceptor>>,
    delivered: Option<Payload>,
    deliveries: u32,
}

impl Responder {
    /// Create a responder around an existing header map.
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers,
            interceptor: None,
            delivered: None,
            deliveries: 0,
        }
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Replace the bound interceptor, returning the displaced one.
    ///
    /// An installer passes `Some(..)` to wrap the current send behavior; an
    /// interceptor passes the displaced value back to restore it.
    pub fn set_interceptor(
        &mut self,
        interceptor: Option<Box<dyn SendInterceptor>>,
    ) -> Option<Box<dyn SendInterceptor>> {
        std::mem::replace(&mut self.interceptor, interceptor)
    }

    /// Send a body.
    ///
    /// If an interceptor is bound it is removed from the slot and given
    /// control; otherwise the payload is delivered directly. Each logical
    /// response reaches delivery exactly once because the interceptor is
    /// unbound before it runs.
    pub fn send(&mut self, payload: Payload) -> Result<(), Error> {
        match self.interceptor.take() {
            Some(mut interceptor) => interceptor.on_send(self, payload),
            None => {
                self.deliveries += 1;
                self.delivered = Some(payload);
                Ok(())
            }
        }
    }

    /// Number of payloads that reached delivery.
    pub fn deliveries(&self) -> u32 {
        self.deliveries
    }

    /// Tear down into headers and the delivered payload.
    pub fn into_parts(self) -> (HeaderMap, Option<Payload>) {
        (self.headers, self.delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Interceptor that uppercases text bodies, then restores delivery.
    struct Uppercase {
        original: Option<Box<dyn SendInterceptor>>,
    }

    impl SendInterceptor for Uppercase {
        fn on_send(&mut self, responder: &mut Responder, payload: Payload) -> Result<(), Error> {
            responder.set_interceptor(self.original.take());
            match payload {
                Payload::Text(text) => responder.send(Payload::Text(text.to_uppercase())),
                other => responder.send(other),
            }
        }
    }

    #[test]
    fn test_intrinsic_delivery() {
        let mut responder = Responder::new(HeaderMap::new());
        responder.send(Payload::from("plain")).unwrap();
        assert_eq!(responder.deliveries(), 1);
        let (_, delivered) = responder.into_parts();
        assert!(matches!(delivered, Some(Payload::Text(ref t)) if t == "plain"));
    }

    #[test]
    fn test_interceptor_runs_once() {
        let mut responder = Responder::new(HeaderMap::new());
        responder.set_interceptor(Some(Box::new(Uppercase { original: None })));

        responder.send(Payload::from("first")).unwrap();
        // The hook is consumed; a second send goes straight to delivery.
        responder.send(Payload::from("second")).unwrap();

        assert_eq!(responder.deliveries(), 2);
        let (_, delivered) = responder.into_parts();
        assert!(matches!(delivered, Some(Payload::Text(ref t)) if t == "second"));
    }

    #[test]
    fn test_nested_interceptors_restore_in_order() {
        let mut responder = Responder::new(HeaderMap::new());
        let inner = responder.set_interceptor(Some(Box::new(Uppercase { original: None })));
        assert!(inner.is_none());
        let displaced = responder.set_interceptor(None);
        let outer = Uppercase {
            original: displaced,
        };
        responder.set_interceptor(Some(Box::new(outer)));

        responder.send(Payload::from("abc")).unwrap();
        assert_eq!(responder.deliveries(), 1);
        let (_, delivered) = responder.into_parts();
        assert!(matches!(delivered, Some(Payload::Text(ref t)) if t == "ABC"));
    }
}
