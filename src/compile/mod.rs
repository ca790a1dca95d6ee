pub mod directive;
pub mod header;

pub use directive::compile_directive;
pub use header::{compile, compile_with_nonce, CompiledHeader, HeaderKind, HeaderSet, NonceSplice};
