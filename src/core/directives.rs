use crate::constants;
use crate::core::source::{normalize_domains, SourceExpr};
use crate::error::CspError;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveName {
    DefaultSrc,
    ConnectSrc,
    FontSrc,
    FrameSrc,
    ImgSrc,
    ManifestSrc,
    MediaSrc,
    ObjectSrc,
    PrefetchSrc,
    ScriptSrc,
    ScriptSrcAttr,
    ScriptSrcElem,
    StyleSrc,
    StyleSrcAttr,
    StyleSrcElem,
    WorkerSrc,
}

impl DirectiveName {
    // Render order. Compilation always walks this array, never map order.
    pub const ALL: [DirectiveName; 16] = [
        DirectiveName::DefaultSrc,
        DirectiveName::ConnectSrc,
        DirectiveName::FontSrc,
        DirectiveName::FrameSrc,
        DirectiveName::ImgSrc,
        DirectiveName::ManifestSrc,
        DirectiveName::MediaSrc,
        DirectiveName::ObjectSrc,
        DirectiveName::PrefetchSrc,
        DirectiveName::ScriptSrc,
        DirectiveName::ScriptSrcAttr,
        DirectiveName::ScriptSrcElem,
        DirectiveName::StyleSrc,
        DirectiveName::StyleSrcAttr,
        DirectiveName::StyleSrcElem,
        DirectiveName::WorkerSrc,
    ];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DirectiveName::DefaultSrc => constants::DEFAULT_SRC,
            DirectiveName::ConnectSrc => constants::CONNECT_SRC,
            DirectiveName::FontSrc => constants::FONT_SRC,
            DirectiveName::FrameSrc => constants::FRAME_SRC,
            DirectiveName::ImgSrc => constants::IMG_SRC,
            DirectiveName::ManifestSrc => constants::MANIFEST_SRC,
            DirectiveName::MediaSrc => constants::MEDIA_SRC,
            DirectiveName::ObjectSrc => constants::OBJECT_SRC,
            DirectiveName::PrefetchSrc => constants::PREFETCH_SRC,
            DirectiveName::ScriptSrc => constants::SCRIPT_SRC,
            DirectiveName::ScriptSrcAttr => constants::SCRIPT_SRC_ATTR,
            DirectiveName::ScriptSrcElem => constants::SCRIPT_SRC_ELEM,
            DirectiveName::StyleSrc => constants::STYLE_SRC,
            DirectiveName::StyleSrcAttr => constants::STYLE_SRC_ATTR,
            DirectiveName::StyleSrcElem => constants::STYLE_SRC_ELEM,
            DirectiveName::WorkerSrc => constants::WORKER_SRC,
        }
    }
}

impl fmt::Display for DirectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DirectiveName {
    type Error = CspError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        DirectiveName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CspError::UnknownDirective(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveFlag {
    Self_,
    StrictDynamic,
    ReportSample,
    UnsafeInline,
    UnsafeEval,
    UnsafeHashes,
}

impl DirectiveFlag {
    // Render order within a directive clause.
    pub const ALL: [DirectiveFlag; 6] = [
        DirectiveFlag::Self_,
        DirectiveFlag::StrictDynamic,
        DirectiveFlag::ReportSample,
        DirectiveFlag::UnsafeInline,
        DirectiveFlag::UnsafeEval,
        DirectiveFlag::UnsafeHashes,
    ];

    #[inline(always)]
    pub const fn keyword(&self) -> &'static str {
        match self {
            DirectiveFlag::Self_ => constants::SELF_SOURCE,
            DirectiveFlag::StrictDynamic => constants::STRICT_DYNAMIC_SOURCE,
            DirectiveFlag::ReportSample => constants::REPORT_SAMPLE_SOURCE,
            DirectiveFlag::UnsafeInline => constants::UNSAFE_INLINE_SOURCE,
            DirectiveFlag::UnsafeEval => constants::UNSAFE_EVAL_SOURCE,
            DirectiveFlag::UnsafeHashes => constants::UNSAFE_HASHES_SOURCE,
        }
    }

    #[inline(always)]
    pub const fn key(&self) -> &'static str {
        match self {
            DirectiveFlag::Self_ => "self",
            DirectiveFlag::StrictDynamic => "strict-dynamic",
            DirectiveFlag::ReportSample => "report-sample",
            DirectiveFlag::UnsafeInline => "unsafe-inline",
            DirectiveFlag::UnsafeEval => "unsafe-eval",
            DirectiveFlag::UnsafeHashes => "unsafe-hashes",
        }
    }
}

impl fmt::Display for DirectiveFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSpec {
    none: bool,
    flags: FxHashSet<DirectiveFlag>,
    domains: SmallVec<[SourceExpr; 4]>,
}

impl DirectiveSpec {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn none(mut self, none: bool) -> Self {
        self.none = none;
        self
    }

    #[inline]
    pub fn allow(mut self, flag: DirectiveFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn domain(mut self, source: SourceExpr) -> Self {
        if source.is_none() {
            self.domains.clear();
            self.domains.push(source);
        } else if !self.domains.is_empty() && self.domains[0].is_none() {
            self.domains.clear();
            self.domains.push(source);
        } else if !self.domains.contains(&source) {
            self.domains.push(source);
        }
        self
    }

    pub fn domains(mut self, raw: &str) -> Self {
        self.domains = normalize_domains(raw);
        self
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.none
    }

    #[inline]
    pub fn has_flag(&self, flag: DirectiveFlag) -> bool {
        self.flags.contains(&flag)
    }

    #[inline]
    pub fn domain_list(&self) -> &[SourceExpr] {
        &self.domains
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.none && self.flags.is_empty() && self.domains.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SandboxToken {
    AllowDownloads,
    AllowDownloadsWithoutUserActivation,
    AllowForms,
    AllowModals,
    AllowOrientationLock,
    AllowPointerLock,
    AllowPopups,
    AllowPopupsToEscapeSandbox,
    AllowPresentation,
    AllowSameOrigin,
    AllowScripts,
    AllowStorageAccessByUserActivation,
    AllowTopNavigation,
    AllowTopNavigationByUserActivation,
    AllowTopNavigationToCustomProtocols,
}

impl SandboxToken {
    pub const ALL: [SandboxToken; 15] = [
        SandboxToken::AllowDownloads,
        SandboxToken::AllowDownloadsWithoutUserActivation,
        SandboxToken::AllowForms,
        SandboxToken::AllowModals,
        SandboxToken::AllowOrientationLock,
        SandboxToken::AllowPointerLock,
        SandboxToken::AllowPopups,
        SandboxToken::AllowPopupsToEscapeSandbox,
        SandboxToken::AllowPresentation,
        SandboxToken::AllowSameOrigin,
        SandboxToken::AllowScripts,
        SandboxToken::AllowStorageAccessByUserActivation,
        SandboxToken::AllowTopNavigation,
        SandboxToken::AllowTopNavigationByUserActivation,
        SandboxToken::AllowTopNavigationToCustomProtocols,
    ];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SandboxToken::AllowDownloads => "allow-downloads",
            SandboxToken::AllowDownloadsWithoutUserActivation => {
                "allow-downloads-without-user-activation"
            }
            SandboxToken::AllowForms => "allow-forms",
            SandboxToken::AllowModals => "allow-modals",
            SandboxToken::AllowOrientationLock => "allow-orientation-lock",
            SandboxToken::AllowPointerLock => "allow-pointer-lock",
            SandboxToken::AllowPopups => "allow-popups",
            SandboxToken::AllowPopupsToEscapeSandbox => "allow-popups-to-escape-sandbox",
            SandboxToken::AllowPresentation => "allow-presentation",
            SandboxToken::AllowSameOrigin => "allow-same-origin",
            SandboxToken::AllowScripts => "allow-scripts",
            SandboxToken::AllowStorageAccessByUserActivation => {
                "allow-storage-access-by-user-activation"
            }
            SandboxToken::AllowTopNavigation => "allow-top-navigation",
            SandboxToken::AllowTopNavigationByUserActivation => {
                "allow-top-navigation-by-user-activation"
            }
            SandboxToken::AllowTopNavigationToCustomProtocols => {
                "allow-top-navigation-to-custom-protocols"
            }
        }
    }
}

impl fmt::Display for SandboxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SandboxToken {
    type Error = CspError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        SandboxToken::ALL
            .into_iter()
            .find(|token| token.as_str() == s)
            .ok_or_else(|| CspError::UnknownSandboxToken(s.to_string()))
    }
}
