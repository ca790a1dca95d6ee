use crate::core::engine::CspEngine;
use crate::core::policy::Policy;
use crate::middleware::extensions::ensure_request_nonce;
use crate::middleware::nonce::NonceMiddleware;
use crate::monitoring::perf::PerformanceTimer;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web::Data,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::borrow::Cow;
use std::rc::Rc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CspMiddleware {
    engine: CspEngine,
}

impl CspMiddleware {
    #[inline]
    pub fn new(engine: CspEngine) -> Self {
        Self { engine }
    }

    #[inline]
    pub fn engine(&self) -> CspEngine {
        self.engine.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CspMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspMiddlewareService {
            service: Rc::new(service),
            engine: self.engine.clone(),
        }))
    }
}

pub struct CspMiddlewareService<S> {
    service: Rc<S>,
    engine: CspEngine,
}

impl<S, B> Service<ServiceRequest> for CspMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let engine = self.engine.clone();

        Box::pin(async move {
            let request_id = Uuid::new_v4()
                .hyphenated()
                .encode_lower(&mut Uuid::encode_buffer())
                .to_owned();
            req.extensions_mut()
                .insert(Cow::<'static, str>::Owned(request_id));

            // One snapshot per request; a policy swap mid-flight does not mix
            // versions between nonce decision and header emission.
            let snapshot = engine.snapshot();
            let nonce = if snapshot.policy().global().enable_nonces {
                Some(ensure_request_nonce(&req, &engine))
            } else {
                None
            };

            engine.stats().increment_request_count();

            let mut res = service.call(req).await?;

            let timer = PerformanceTimer::new();
            let compiled = engine.compiled(&snapshot);
            let headers = res.headers_mut();
            for header in compiled.materialize(nonce.as_ref().map(|n| n.as_str())) {
                match header.header_value() {
                    Ok(value) => {
                        headers.insert(header.kind().header_name(), value);
                        engine.stats().increment_header_emit_count();
                    }
                    Err(err) => log::warn!("skipping {} header: {err}", header.kind().name()),
                }
            }
            engine
                .stats()
                .add_header_generation_time(timer.elapsed().as_nanos() as usize);

            Ok(res)
        })
    }
}

#[inline]
pub fn csp_middleware(policy: Policy) -> CspMiddleware {
    CspMiddleware::new(CspEngine::new(policy))
}

pub fn csp_with_nonce_rewrite(policy: Policy) -> (CspMiddleware, NonceMiddleware) {
    let engine = CspEngine::new(policy);
    (
        CspMiddleware::new(engine.clone()),
        NonceMiddleware::new(engine),
    )
}

pub fn configure_csp(engine: CspEngine) -> impl FnOnce(&mut actix_web::web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(Data::new(engine.clone()));
        cfg.app_data(Data::new(CspMiddleware::new(engine)));
    }
}
