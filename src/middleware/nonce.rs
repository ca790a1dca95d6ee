use crate::core::engine::CspEngine;
use crate::middleware::extensions::ensure_request_nonce;
use crate::monitoring::stats::CspStats;
use actix_web::{
    body::{BodySize, BoxBody, EitherBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    Error,
};
use bytes::{Bytes, BytesMut};
use futures::future::{ready, LocalBoxFuture, Ready};
use regex::Regex;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

#[derive(Clone)]
pub struct NonceMiddleware {
    engine: CspEngine,
}

impl NonceMiddleware {
    #[inline]
    pub fn new(engine: CspEngine) -> Self {
        Self { engine }
    }

    #[inline]
    pub fn engine(&self) -> CspEngine {
        self.engine.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for NonceMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = NonceMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(NonceMiddlewareService {
            service: Rc::new(service),
            engine: self.engine.clone(),
        }))
    }
}

pub struct NonceMiddlewareService<S> {
    service: Rc<S>,
    engine: CspEngine,
}

impl<S, B> Service<ServiceRequest> for NonceMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let engine = self.engine.clone();

        Box::pin(async move {
            let enabled = engine.snapshot().policy().global().enable_nonces;
            let nonce = if enabled {
                Some(ensure_request_nonce(&req, &engine).0)
            } else {
                None
            };

            let res = service.call(req).await?;

            let Some(nonce) = nonce else {
                return Ok(res.map_into_left_body());
            };
            if !is_html(&res) {
                return Ok(res.map_into_left_body());
            }

            let stats = Arc::clone(engine.stats());
            // Buffering invalidates any length the handler set.
            Ok(res.map_body(move |head, body| {
                head.headers_mut().remove(CONTENT_LENGTH);
                EitherBody::right(BoxBody::new(CaptureBody::new(body.boxed(), nonce, stats)))
            }))
        })
    }
}

fn is_html<B>(res: &ServiceResponse<B>) -> bool {
    res.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.get(..9))
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text/html"))
}

enum CaptureState {
    Buffering,
    Flushing,
    Done,
}

// Buffers the whole response, then emits it as one chunk with nonces stamped
// onto <script> tags. Chunked transfer from the handler is absorbed here.
pub struct CaptureBody {
    inner: BoxBody,
    buffer: BytesMut,
    nonce: String,
    stats: Arc<CspStats>,
    state: CaptureState,
}

impl CaptureBody {
    pub(crate) fn new(inner: BoxBody, nonce: String, stats: Arc<CspStats>) -> Self {
        Self {
            inner,
            buffer: BytesMut::new(),
            nonce,
            stats,
            state: CaptureState::Buffering,
        }
    }
}

impl MessageBody for CaptureBody {
    type Error = Box<dyn StdError>;

    fn size(&self) -> BodySize {
        BodySize::Stream
    }

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Bytes, Self::Error>>> {
        let this = self.get_mut();
        loop {
            match this.state {
                CaptureState::Buffering => {
                    match std::task::ready!(this.inner.as_pin_mut().poll_next(cx)) {
                        Some(Ok(chunk)) => this.buffer.extend_from_slice(&chunk),
                        Some(Err(err)) => {
                            this.state = CaptureState::Done;
                            return Poll::Ready(Some(Err(err)));
                        }
                        None => this.state = CaptureState::Flushing,
                    }
                }
                CaptureState::Flushing => {
                    this.state = CaptureState::Done;
                    let buffered = std::mem::take(&mut this.buffer).freeze();
                    let original_len = buffered.len();
                    let rewritten = rewrite_script_tags(buffered, &this.nonce);
                    // Injection only ever adds bytes.
                    if rewritten.len() != original_len {
                        this.stats.increment_body_rewrite_count();
                    }
                    return Poll::Ready(Some(Ok(rewritten)));
                }
                CaptureState::Done => return Poll::Ready(None),
            }
        }
    }
}

impl Drop for CaptureBody {
    fn drop(&mut self) {
        if !matches!(self.state, CaptureState::Done) && !self.buffer.is_empty() {
            log::debug!(
                "discarding {} buffered bytes from an unfinished response",
                self.buffer.len()
            );
        }
    }
}

static SCRIPT_TAG: OnceLock<Regex> = OnceLock::new();

fn script_tag_pattern() -> &'static Regex {
    SCRIPT_TAG.get_or_init(|| Regex::new(r"(?is)<script.*?>.*?</script>").unwrap())
}

pub fn rewrite_script_tags(body: Bytes, nonce: &str) -> Bytes {
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(_) => {
            log::warn!("response body is not valid UTF-8, skipping nonce rewrite");
            return body;
        }
    };

    let injected = script_tag_pattern().replace_all(text, |caps: &regex::Captures<'_>| {
        let tag = &caps[0];
        // Only an opening tag with attributes is stamped; bare <script> stays.
        if tag.as_bytes().get(7) == Some(&b' ') {
            let (open, rest) = tag.split_at(8);
            format!("{open}nonce=\"{nonce}\" {rest}")
        } else {
            tag.to_owned()
        }
    });

    match injected {
        Cow::Borrowed(_) => body,
        Cow::Owned(rewritten) => Bytes::from(rewritten),
    }
}
