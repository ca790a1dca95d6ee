pub mod cache;
pub mod compile;
pub mod constants;
pub mod core;
pub mod error;
pub mod hooks;
pub mod middleware;
pub mod monitoring;
pub mod prelude;
pub mod security;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::cache::HeaderCache;
pub use crate::compile::{
    compile, compile_directive, compile_with_nonce, CompiledHeader, HeaderKind, HeaderSet,
    NonceSplice,
};
pub use crate::core::{
    loose_bool, normalize_domains, parse_source_token, policy_from_json, policy_from_json_str,
    policy_to_json, CspEngine, CspEngineBuilder, DirectiveFlag, DirectiveName, DirectiveSpec,
    Policy, PolicyBuilder, PolicySnapshot, PolicyVersion, SandboxToken, SourceExpr,
};
pub use crate::error::CspError;
pub use crate::hooks::{DirectiveTokens, TransformRegistry};
pub use crate::middleware::{
    configure_csp, csp_middleware, csp_with_nonce_rewrite, rewrite_script_tags, CspExtensions,
    CspMiddleware, NonceMiddleware,
};
pub use crate::monitoring::{CspStats, PerformanceTimer, StatsSnapshot};
pub use crate::security::{NonceGenerator, RequestNonce};
