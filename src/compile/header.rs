use crate::compile::directive::compile_directive;
use crate::constants::{
    BASE_URI, FORM_ACTION, FRAME_ANCESTORS, HEADER_CSP, HEADER_CSP_REPORT_ONLY, HEADER_NEL,
    HEADER_REPORT_TO, NAVIGATE_TO, NONCE_PREFIX, REPORT_TO, REPORT_URI, SANDBOX, SCRIPT_SRC,
    SEMICOLON_SPACE, SUFFIX_QUOTE, TRUSTED_TYPES, TRUSTED_TYPES_BASELINE, TRUSTED_TYPES_GTM,
    TRUSTED_TYPES_REQUIRE, UPGRADE_INSECURE_REQUESTS,
};
use crate::core::directives::DirectiveName;
use crate::core::policy::Policy;
use crate::error::CspError;
use crate::hooks::TransformRegistry;
use actix_web::http::header::{HeaderName, HeaderValue};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    Csp,
    CspReportOnly,
    ReportTo,
    Nel,
}

impl HeaderKind {
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            HeaderKind::Csp => HEADER_CSP,
            HeaderKind::CspReportOnly => HEADER_CSP_REPORT_ONLY,
            HeaderKind::ReportTo => HEADER_REPORT_TO,
            HeaderKind::Nel => HEADER_NEL,
        }
    }

    #[inline]
    pub fn header_name(&self) -> HeaderName {
        HeaderName::from_static(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledHeader {
    kind: HeaderKind,
    value: String,
}

impl CompiledHeader {
    #[inline]
    pub fn new(kind: HeaderKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    #[inline]
    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn header_value(&self) -> Result<HeaderValue, CspError> {
        HeaderValue::from_str(&self.value)
            .map_err(|_| CspError::InvalidHeaderValue(self.kind.name().to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceSplice {
    offset: usize,
    standalone: bool,
}

impl NonceSplice {
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn is_standalone(&self) -> bool {
        self.standalone
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderSet {
    headers: SmallVec<[CompiledHeader; 3]>,
    splice: Option<NonceSplice>,
}

impl HeaderSet {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    #[inline]
    pub fn headers(&self) -> &[CompiledHeader] {
        &self.headers
    }

    #[inline]
    pub fn splice(&self) -> Option<NonceSplice> {
        self.splice
    }

    pub fn materialize(&self, nonce: Option<&str>) -> SmallVec<[CompiledHeader; 3]> {
        let mut out = SmallVec::new();
        for header in &self.headers {
            let mut header = header.clone();
            if matches!(header.kind, HeaderKind::Csp | HeaderKind::CspReportOnly) {
                if let (Some(nonce), Some(splice)) = (nonce, self.splice) {
                    splice_nonce(&mut header.value, splice, nonce);
                }
            }
            if !header.value.is_empty() {
                out.push(header);
            }
        }
        out
    }
}

#[derive(Default)]
struct ClauseBuffer {
    value: String,
}

impl ClauseBuffer {
    // Clauses arrive with or without trailing separators; the buffer owns
    // separator placement so the value never carries doubles or a dangling one.
    fn push(&mut self, clause: &str) {
        let clause = clause.trim_end_matches([';', ' ']);
        if clause.is_empty() {
            return;
        }
        if !self.value.is_empty() {
            self.value.push_str(SEMICOLON_SPACE);
        }
        self.value.push_str(clause);
    }

    #[inline]
    fn len(&self) -> usize {
        self.value.len()
    }

    #[inline]
    fn into_value(self) -> String {
        self.value
    }
}

fn splice_nonce(value: &mut String, splice: NonceSplice, nonce: &str) {
    let at = splice.offset.min(value.len());
    if splice.standalone {
        let clause = format!("{SCRIPT_SRC} {NONCE_PREFIX}{nonce}{SUFFIX_QUOTE}");
        if value.is_empty() {
            value.push_str(&clause);
        } else if at == 0 {
            value.insert_str(0, &format!("{clause}{SEMICOLON_SPACE}"));
        } else {
            value.insert_str(at, &format!("{SEMICOLON_SPACE}{clause}"));
        }
    } else {
        value.insert_str(at, &format!(" {NONCE_PREFIX}{nonce}{SUFFIX_QUOTE}"));
    }
}

fn script_src_clause_end(value: &str) -> Option<usize> {
    let mut search = 0;
    while let Some(found) = value[search..].find(SCRIPT_SRC) {
        let start = search + found;
        let at_clause_start = start == 0 || value[..start].ends_with(SEMICOLON_SPACE);
        let follows = value[start + SCRIPT_SRC.len()..].chars().next();
        if at_clause_start && follows == Some(' ') {
            let end = value[start..]
                .find(';')
                .map(|i| start + i)
                .unwrap_or(value.len());
            return Some(end);
        }
        search = start + SCRIPT_SRC.len();
    }
    None
}

fn relocate_splice(value: &str, splice: NonceSplice) -> NonceSplice {
    match script_src_clause_end(value) {
        Some(end) => NonceSplice {
            offset: end,
            standalone: false,
        },
        None => {
            if !splice.standalone {
                log::debug!(
                    "script-src clause missing after header transforms, \
                     nonce falls back to a standalone clause"
                );
            }
            NonceSplice {
                offset: value.len(),
                standalone: true,
            }
        }
    }
}

pub fn compile(policy: &Policy, hooks: &TransformRegistry) -> HeaderSet {
    let global = policy.global();
    let mut buffer = ClauseBuffer::default();
    let mut splice = None;

    let document = policy.document();
    if let Some(base_uri) = document.base_uri.as_deref() {
        buffer.push(&format!("{BASE_URI} {base_uri}"));
    }
    if let Some(token) = document.sandbox {
        // Browsers reject sandbox in report-only delivery, so the clause is
        // withheld whenever the flag is set.
        if !global.report_only {
            buffer.push(&format!("{SANDBOX} {token}"));
        }
    }

    let navigation = policy.navigation();
    if let Some(value) = navigation.form_action.as_deref() {
        buffer.push(&format!("{FORM_ACTION} {value}"));
    }
    if let Some(value) = navigation.frame_ancestors.as_deref() {
        buffer.push(&format!("{FRAME_ANCESTORS} {value}"));
    }
    if let Some(value) = navigation.navigate_to.as_deref() {
        buffer.push(&format!("{NAVIGATE_TO} {value}"));
    }

    if global.https_only && !global.report_only {
        buffer.push(UPGRADE_INSECURE_REQUESTS);
    }
    if global.trusted_only {
        buffer.push(TRUSTED_TYPES_REQUIRE);
        let mut trusted = format!("{TRUSTED_TYPES} {TRUSTED_TYPES_BASELINE}");
        if global.allow_gtm {
            trusted.push(' ');
            trusted.push_str(TRUSTED_TYPES_GTM);
        }
        buffer.push(&trusted);
    }

    for name in DirectiveName::ALL {
        let Some(spec) = policy.directive(name) else {
            continue;
        };
        let clause = compile_directive(name, spec, &[], hooks);
        let wants_splice =
            name == DirectiveName::ScriptSrc && global.enable_nonces && !spec.is_none();
        if clause.is_empty() {
            if wants_splice {
                splice = Some(NonceSplice {
                    offset: buffer.len(),
                    standalone: true,
                });
            }
            continue;
        }
        buffer.push(&clause);
        if wants_splice {
            splice = Some(NonceSplice {
                offset: buffer.len(),
                standalone: false,
            });
        }
    }

    if global.report_only {
        if let Some(uri) = global.report_uri.as_deref() {
            buffer.push(&format!("{REPORT_URI} {uri}"));
        }
    }
    if let Some(raw) = global.report_to.as_deref() {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(doc) => match doc.get("group").and_then(serde_json::Value::as_str) {
                Some(group) => buffer.push(&format!("{REPORT_TO} {group}")),
                None => log::debug!("report-to JSON has no group field"),
            },
            Err(err) => log::debug!("skipping malformed report-to JSON: {err}"),
        }
    }

    let mut value = buffer.into_value();
    if hooks.has_header_transforms() {
        let original = value.clone();
        hooks.apply_header(&mut value);
        if value != original {
            splice = splice.map(|s| relocate_splice(&value, s));
        }
    }

    let kind = if global.report_only && global.report_uri.is_some() {
        HeaderKind::CspReportOnly
    } else {
        HeaderKind::Csp
    };

    let mut headers = SmallVec::new();
    // The policy entry survives with an empty value when a standalone splice
    // still has a clause to contribute at materialization.
    if !value.is_empty() || splice.is_some() {
        headers.push(CompiledHeader::new(kind, value));
    }
    if let Some(raw) = global.report_to.as_deref() {
        headers.push(CompiledHeader::new(HeaderKind::ReportTo, raw.to_owned()));
    }
    if let Some(raw) = global.net_error.as_deref() {
        headers.push(CompiledHeader::new(HeaderKind::Nel, raw.to_owned()));
    }

    HeaderSet { headers, splice }
}

pub fn compile_with_nonce(
    policy: &Policy,
    hooks: &TransformRegistry,
    nonce: &str,
) -> SmallVec<[CompiledHeader; 3]> {
    compile(policy, hooks).materialize(Some(nonce))
}
