pub mod csp;
pub mod extensions;
pub mod nonce;

pub use csp::{CspMiddleware, CspMiddlewareService};
pub use extensions::CspExtensions;
pub use nonce::{rewrite_script_tags, NonceMiddleware, NonceMiddlewareService};

pub use csp::{configure_csp, csp_middleware, csp_with_nonce_rewrite};
