pub(crate) const HEADER_CSP: &str = "content-security-policy";
pub(crate) const HEADER_CSP_REPORT_ONLY: &str = "content-security-policy-report-only";
pub(crate) const HEADER_REPORT_TO: &str = "report-to";
pub(crate) const HEADER_NEL: &str = "nel";

pub(crate) const DEFAULT_SRC: &str = "default-src";
pub(crate) const CONNECT_SRC: &str = "connect-src";
pub(crate) const FONT_SRC: &str = "font-src";
pub(crate) const FRAME_SRC: &str = "frame-src";
pub(crate) const IMG_SRC: &str = "img-src";
pub(crate) const MANIFEST_SRC: &str = "manifest-src";
pub(crate) const MEDIA_SRC: &str = "media-src";
pub(crate) const OBJECT_SRC: &str = "object-src";
pub(crate) const PREFETCH_SRC: &str = "prefetch-src";
pub(crate) const SCRIPT_SRC: &str = "script-src";
pub(crate) const SCRIPT_SRC_ATTR: &str = "script-src-attr";
pub(crate) const SCRIPT_SRC_ELEM: &str = "script-src-elem";
pub(crate) const STYLE_SRC: &str = "style-src";
pub(crate) const STYLE_SRC_ATTR: &str = "style-src-attr";
pub(crate) const STYLE_SRC_ELEM: &str = "style-src-elem";
pub(crate) const WORKER_SRC: &str = "worker-src";

pub(crate) const BASE_URI: &str = "base-uri";
pub(crate) const SANDBOX: &str = "sandbox";
pub(crate) const FORM_ACTION: &str = "form-action";
pub(crate) const FRAME_ANCESTORS: &str = "frame-ancestors";
pub(crate) const NAVIGATE_TO: &str = "navigate-to";
pub(crate) const REPORT_URI: &str = "report-uri";
pub(crate) const REPORT_TO: &str = "report-to";

pub(crate) const UPGRADE_INSECURE_REQUESTS: &str = "upgrade-insecure-requests";
pub(crate) const TRUSTED_TYPES_REQUIRE: &str = "require-trusted-types-for 'script'";
pub(crate) const TRUSTED_TYPES: &str = "trusted-types";
pub(crate) const TRUSTED_TYPES_BASELINE: &str = "dompurify default";
pub(crate) const TRUSTED_TYPES_GTM: &str = "goog#html";

pub(crate) const NONE_SOURCE: &str = "'none'";
pub(crate) const SELF_SOURCE: &str = "'self'";
pub(crate) const DATA_SOURCE: &str = "data:";
pub(crate) const STRICT_DYNAMIC_SOURCE: &str = "'strict-dynamic'";
pub(crate) const REPORT_SAMPLE_SOURCE: &str = "'report-sample'";
pub(crate) const UNSAFE_INLINE_SOURCE: &str = "'unsafe-inline'";
pub(crate) const UNSAFE_EVAL_SOURCE: &str = "'unsafe-eval'";
pub(crate) const UNSAFE_HASHES_SOURCE: &str = "'unsafe-hashes'";
pub(crate) const NONCE_PREFIX: &str = "'nonce-";
pub(crate) const SUFFIX_QUOTE: &str = "'";
pub(crate) const SEMICOLON_SPACE: &str = "; ";

pub(crate) const NONCE_BYTE_LENGTH: usize = 16;
pub(crate) const NONCE_BUFFER_POOL_SIZE: usize = 32;
pub(crate) const DEFAULT_CACHE_TTL_SECS: u64 = 180;
pub(crate) const DEFAULT_HEADER_CACHE_ENTRIES: usize = 64;
