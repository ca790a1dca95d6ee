use crate::core::directives::{DirectiveName, DirectiveSpec, SandboxToken};
use crate::core::interchange::policy_to_json;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use indexmap::IndexMap;
use ring::digest::{digest, SHA256};
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalSettings {
    pub report_only: bool,
    pub report_uri: Option<Cow<'static, str>>,
    pub report_to: Option<Cow<'static, str>>,
    pub net_error: Option<Cow<'static, str>>,
    pub https_only: bool,
    pub trusted_only: bool,
    pub allow_gtm: bool,
    pub enable_nonces: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSettings {
    pub base_uri: Option<Cow<'static, str>>,
    pub sandbox: Option<SandboxToken>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationSettings {
    pub form_action: Option<Cow<'static, str>>,
    pub frame_ancestors: Option<Cow<'static, str>>,
    pub navigate_to: Option<Cow<'static, str>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    global: GlobalSettings,
    document: DocumentSettings,
    navigation: NavigationSettings,
    directives: IndexMap<DirectiveName, DirectiveSpec>,
}

impl Policy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    #[inline]
    pub fn global(&self) -> &GlobalSettings {
        &self.global
    }

    #[inline]
    pub fn global_mut(&mut self) -> &mut GlobalSettings {
        &mut self.global
    }

    #[inline]
    pub fn document(&self) -> &DocumentSettings {
        &self.document
    }

    #[inline]
    pub fn document_mut(&mut self) -> &mut DocumentSettings {
        &mut self.document
    }

    #[inline]
    pub fn navigation(&self) -> &NavigationSettings {
        &self.navigation
    }

    #[inline]
    pub fn navigation_mut(&mut self) -> &mut NavigationSettings {
        &mut self.navigation
    }

    #[inline]
    pub fn set_directive(&mut self, name: DirectiveName, spec: DirectiveSpec) {
        self.directives.insert(name, spec);
    }

    #[inline]
    pub fn remove_directive(&mut self, name: DirectiveName) -> Option<DirectiveSpec> {
        self.directives.shift_remove(&name)
    }

    #[inline]
    pub fn directive(&self, name: DirectiveName) -> Option<&DirectiveSpec> {
        self.directives.get(&name)
    }

    #[inline]
    pub fn directives(&self) -> impl Iterator<Item = (DirectiveName, &DirectiveSpec)> {
        self.directives.iter().map(|(name, spec)| (*name, spec))
    }

    #[inline]
    pub fn directive_count(&self) -> usize {
        self.directives.len()
    }
}

#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    pub fn report_only(mut self, enabled: bool) -> Self {
        self.policy.global.report_only = enabled;
        self
    }

    pub fn report_uri(mut self, uri: impl Into<Cow<'static, str>>) -> Self {
        self.policy.global.report_uri = Some(uri.into());
        self
    }

    pub fn report_to(mut self, group: impl Into<Cow<'static, str>>) -> Self {
        self.policy.global.report_to = Some(group.into());
        self
    }

    pub fn net_error(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.policy.global.net_error = Some(value.into());
        self
    }

    pub fn https_only(mut self, enabled: bool) -> Self {
        self.policy.global.https_only = enabled;
        self
    }

    pub fn trusted_types(mut self, enabled: bool) -> Self {
        self.policy.global.trusted_only = enabled;
        self
    }

    pub fn allow_gtm(mut self, enabled: bool) -> Self {
        self.policy.global.allow_gtm = enabled;
        self
    }

    pub fn enable_nonces(mut self, enabled: bool) -> Self {
        self.policy.global.enable_nonces = enabled;
        self
    }

    pub fn base_uri(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.policy.document.base_uri = Some(value.into());
        self
    }

    pub fn sandbox(mut self, token: SandboxToken) -> Self {
        self.policy.document.sandbox = Some(token);
        self
    }

    pub fn form_action(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.policy.navigation.form_action = Some(value.into());
        self
    }

    pub fn frame_ancestors(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.policy.navigation.frame_ancestors = Some(value.into());
        self
    }

    pub fn navigate_to(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.policy.navigation.navigate_to = Some(value.into());
        self
    }

    pub fn directive(mut self, name: DirectiveName, spec: DirectiveSpec) -> Self {
        self.policy.directives.insert(name, spec);
        self
    }

    #[inline]
    pub fn build(self) -> Policy {
        self.policy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PolicyVersion(String);

impl PolicyVersion {
    pub fn compute(policy: &Policy) -> Self {
        // serde_json maps sort by key, so equal policies serialize identically.
        let canonical = policy_to_json(policy).to_string();
        let fingerprint = digest(&SHA256, canonical.as_bytes());
        PolicyVersion(BASE64.encode(fingerprint.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct PolicySnapshot {
    policy: Policy,
    version: PolicyVersion,
}

impl PolicySnapshot {
    pub fn new(policy: Policy) -> Self {
        let version = PolicyVersion::compute(&policy);
        Self { policy, version }
    }

    #[inline]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    #[inline]
    pub fn version(&self) -> &PolicyVersion {
        &self.version
    }
}

impl From<Policy> for PolicySnapshot {
    fn from(policy: Policy) -> Self {
        Self::new(policy)
    }
}
