use crate::constants::{DATA_SOURCE, NONE_SOURCE, SELF_SOURCE};
use smallvec::SmallVec;
use std::{borrow::Cow, fmt};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceExpr {
    None,
    Self_,
    Data,
    Url(Cow<'static, str>),
}

impl SourceExpr {
    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        matches!(self, SourceExpr::None)
    }

    #[inline(always)]
    pub const fn is_self(&self) -> bool {
        matches!(self, SourceExpr::Self_)
    }

    #[inline]
    pub fn url(&self) -> Option<&str> {
        match self {
            SourceExpr::Url(url) => Some(url),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_static_str(&self) -> Option<&'static str> {
        match self {
            SourceExpr::None => Some(NONE_SOURCE),
            SourceExpr::Self_ => Some(SELF_SOURCE),
            SourceExpr::Data => Some(DATA_SOURCE),
            SourceExpr::Url(_) => None,
        }
    }
}

impl fmt::Display for SourceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceExpr::None => f.write_str(NONE_SOURCE),
            SourceExpr::Self_ => f.write_str(SELF_SOURCE),
            SourceExpr::Data => f.write_str(DATA_SOURCE),
            SourceExpr::Url(url) => f.write_str(url),
        }
    }
}

pub fn parse_source_token(token: &str) -> Option<SourceExpr> {
    match token {
        "none" | "'none'" => Some(SourceExpr::None),
        "self" | "'self'" => Some(SourceExpr::Self_),
        "data" | "data:" => Some(SourceExpr::Data),
        _ => parse_https_url(token).map(|url| SourceExpr::Url(Cow::Owned(url))),
    }
}

fn parse_https_url(token: &str) -> Option<String> {
    let url = Url::parse(token)
        .or_else(|_| Url::parse(&format!("https://{}", token)))
        .ok()?;

    if url.scheme() != "https" {
        return None;
    }

    let mut rendered = url.to_string();
    // A bare origin round-trips through Url with a trailing slash; strip it so
    // normalization is idempotent. Real paths are kept as written.
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        rendered.truncate(rendered.len() - 1);
    }
    Some(rendered)
}

pub fn normalize_domains(raw: &str) -> SmallVec<[SourceExpr; 4]> {
    let mut sources = SmallVec::new();

    for token in raw.split_whitespace() {
        match parse_source_token(token) {
            // 'none' wins over everything else in the list
            Some(SourceExpr::None) => {
                sources.clear();
                sources.push(SourceExpr::None);
                return sources;
            }
            Some(expr) => {
                if !sources.contains(&expr) {
                    sources.push(expr);
                }
            }
            None => {
                log::debug!("dropping source token {:?}: not an https url", token);
            }
        }
    }

    sources
}
