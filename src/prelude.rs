pub use crate::core::{
    CspEngine, CspEngineBuilder, DirectiveFlag, DirectiveName, DirectiveSpec, Policy,
    PolicyBuilder, SandboxToken, SourceExpr,
};
pub use crate::middleware::{
    configure_csp, csp_middleware, csp_with_nonce_rewrite, CspExtensions, CspMiddleware,
    NonceMiddleware,
};
pub use crate::monitoring::CspStats;
pub use crate::security::{NonceGenerator, RequestNonce};
