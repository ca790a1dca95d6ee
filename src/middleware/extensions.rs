use crate::core::engine::CspEngine;
use crate::security::nonce::RequestNonce;
use actix_web::dev::ServiceRequest;
use actix_web::HttpMessage;
use std::borrow::Cow;

pub trait CspExtensions {
    fn csp_nonce(&self) -> Option<String>;
    fn request_id(&self) -> Option<String>;
}

impl<T> CspExtensions for T
where
    T: HttpMessage,
{
    fn csp_nonce(&self) -> Option<String> {
        self.extensions()
            .get::<RequestNonce>()
            .map(|nonce| nonce.0.clone())
    }

    fn request_id(&self) -> Option<String> {
        self.extensions()
            .get::<Cow<'static, str>>()
            .map(|id| id.clone().into_owned())
    }
}

// Both middlewares may run for one request; whichever arrives first creates
// the nonce and the other reuses it, so wrap order does not matter.
pub(crate) fn ensure_request_nonce(req: &ServiceRequest, engine: &CspEngine) -> RequestNonce {
    if let Some(existing) = req.extensions().get::<RequestNonce>() {
        return existing.clone();
    }
    let nonce = RequestNonce(engine.generate_nonce());
    req.extensions_mut().insert(nonce.clone());
    nonce
}
