pub mod directives;
pub mod engine;
pub mod interchange;
pub mod policy;
pub mod source;

pub use directives::{DirectiveFlag, DirectiveName, DirectiveSpec, SandboxToken};
pub use engine::{CspEngine, CspEngineBuilder};
pub use interchange::{loose_bool, policy_from_json, policy_from_json_str, policy_to_json};
pub use policy::{
    DocumentSettings, GlobalSettings, NavigationSettings, Policy, PolicyBuilder, PolicySnapshot,
    PolicyVersion,
};
pub use source::{normalize_domains, parse_source_token, SourceExpr};
