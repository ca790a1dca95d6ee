use crate::core::directives::{DirectiveFlag, DirectiveName, DirectiveSpec, SandboxToken};
use crate::core::policy::Policy;
use crate::error::CspError;
use serde_json::{Map, Value};
use std::borrow::Cow;

pub fn loose_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "on" | "1" => Some(true),
            "false" | "no" | "n" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_flag(field: &str, value: &Value) -> bool {
    match loose_bool(value) {
        Some(flag) => flag,
        None => {
            log::debug!("treating unrecognized {field} value {value} as false");
            false
        }
    }
}

fn coerce_string(field: &str, value: &Value) -> Option<Cow<'static, str>> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(Cow::Owned(s.trim().to_owned())),
        Value::String(_) | Value::Null => None,
        other => {
            log::debug!("ignoring non-string {field} value {other}");
            None
        }
    }
}

fn section_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, CspError> {
    match root.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_object()
            .map(Some)
            .ok_or_else(|| CspError::MalformedDocument(format!("{key} is not an object"))),
    }
}

pub fn policy_from_json_str(raw: &str) -> Result<Policy, CspError> {
    let doc: Value = serde_json::from_str(raw)?;
    policy_from_json(&doc)
}

pub fn policy_from_json(doc: &Value) -> Result<Policy, CspError> {
    let root = doc
        .as_object()
        .ok_or_else(|| CspError::MalformedDocument("top-level value is not an object".into()))?;

    let mut policy = Policy::new();

    if let Some(fields) = section_object(root, "global")? {
        let global = policy.global_mut();
        for (key, value) in fields {
            match key.as_str() {
                "report_only" => global.report_only = coerce_flag(key, value),
                "report_uri" => global.report_uri = coerce_string(key, value),
                "report_to" => global.report_to = coerce_string(key, value),
                "net_error" => global.net_error = coerce_string(key, value),
                "https_only" => global.https_only = coerce_flag(key, value),
                "trusted_only" => global.trusted_only = coerce_flag(key, value),
                "allow_gtm" => global.allow_gtm = coerce_flag(key, value),
                "enable_nonces" => global.enable_nonces = coerce_flag(key, value),
                _ => log::debug!("ignoring unknown global field {key}"),
            }
        }
    }

    if let Some(fields) = section_object(root, "document")? {
        let document = policy.document_mut();
        for (key, value) in fields {
            match key.as_str() {
                "base_uri" => document.base_uri = coerce_string(key, value),
                "sandbox" => {
                    document.sandbox = coerce_string(key, value).and_then(|raw| {
                        match SandboxToken::try_from(raw.as_ref()) {
                            Ok(token) => Some(token),
                            Err(_) => {
                                log::debug!("ignoring unknown sandbox token {raw}");
                                None
                            }
                        }
                    });
                }
                _ => log::debug!("ignoring unknown document field {key}"),
            }
        }
    }

    if let Some(fields) = section_object(root, "navigation")? {
        let navigation = policy.navigation_mut();
        for (key, value) in fields {
            match key.as_str() {
                "form_action" => navigation.form_action = coerce_string(key, value),
                "frame_ancestors" => navigation.frame_ancestors = coerce_string(key, value),
                "navigate_to" => navigation.navigate_to = coerce_string(key, value),
                _ => log::debug!("ignoring unknown navigation field {key}"),
            }
        }
    }

    for name in DirectiveName::ALL {
        let Some(fields) = section_object(root, name.as_str())? else {
            continue;
        };
        let mut spec = DirectiveSpec::new();
        for (key, value) in fields {
            if key == "none" {
                spec = spec.none(coerce_flag(key, value));
                continue;
            }
            if key == "domains" {
                match value.as_str() {
                    Some(raw) => spec = spec.domains(raw),
                    None => log::debug!("ignoring non-string {name} domains value"),
                }
                continue;
            }
            match DirectiveFlag::ALL.into_iter().find(|flag| flag.key() == key) {
                Some(flag) => {
                    if coerce_flag(key, value) {
                        spec = spec.allow(flag);
                    }
                }
                None => log::debug!("ignoring unknown {name} field {key}"),
            }
        }
        policy.set_directive(name, spec);
    }

    for key in root.keys() {
        if key != "global"
            && key != "document"
            && key != "navigation"
            && DirectiveName::try_from(key.as_str()).is_err()
        {
            log::debug!("ignoring unknown policy section {key}");
        }
    }

    Ok(policy)
}

fn insert_flag(section: &mut Map<String, Value>, key: &str, value: bool) {
    if value {
        section.insert(key.to_owned(), Value::Bool(true));
    }
}

fn insert_string(section: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        section.insert(key.to_owned(), Value::String(value.to_owned()));
    }
}

pub fn policy_to_json(policy: &Policy) -> Value {
    let mut root = Map::new();

    let global = policy.global();
    let mut section = Map::new();
    insert_flag(&mut section, "report_only", global.report_only);
    insert_string(&mut section, "report_uri", global.report_uri.as_deref());
    insert_string(&mut section, "report_to", global.report_to.as_deref());
    insert_string(&mut section, "net_error", global.net_error.as_deref());
    insert_flag(&mut section, "https_only", global.https_only);
    insert_flag(&mut section, "trusted_only", global.trusted_only);
    insert_flag(&mut section, "allow_gtm", global.allow_gtm);
    insert_flag(&mut section, "enable_nonces", global.enable_nonces);
    if !section.is_empty() {
        root.insert("global".to_owned(), Value::Object(section));
    }

    let document = policy.document();
    let mut section = Map::new();
    insert_string(&mut section, "base_uri", document.base_uri.as_deref());
    insert_string(&mut section, "sandbox", document.sandbox.map(|token| token.as_str()));
    if !section.is_empty() {
        root.insert("document".to_owned(), Value::Object(section));
    }

    let navigation = policy.navigation();
    let mut section = Map::new();
    insert_string(&mut section, "form_action", navigation.form_action.as_deref());
    insert_string(&mut section, "frame_ancestors", navigation.frame_ancestors.as_deref());
    insert_string(&mut section, "navigate_to", navigation.navigate_to.as_deref());
    if !section.is_empty() {
        root.insert("navigation".to_owned(), Value::Object(section));
    }

    for name in DirectiveName::ALL {
        let Some(spec) = policy.directive(name) else {
            continue;
        };
        let mut fields = Map::new();
        if spec.is_none() {
            fields.insert("none".to_owned(), Value::Bool(true));
        } else {
            for flag in DirectiveFlag::ALL {
                if spec.has_flag(flag) {
                    fields.insert(flag.key().to_owned(), Value::Bool(true));
                }
            }
            let domains = spec
                .domain_list()
                .iter()
                .map(|source| source.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            if !domains.is_empty() {
                fields.insert("domains".to_owned(), Value::String(domains));
            }
        }
        if !fields.is_empty() {
            root.insert(name.as_str().to_owned(), Value::Object(fields));
        }
    }

    Value::Object(root)
}
