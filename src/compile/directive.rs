use crate::constants::{NONE_SOURCE, SEMICOLON_SPACE};
use crate::core::directives::{DirectiveFlag, DirectiveName, DirectiveSpec};
use crate::hooks::{DirectiveTokens, TransformRegistry};
use std::borrow::Cow;

pub fn compile_directive(
    name: DirectiveName,
    spec: &DirectiveSpec,
    extra_tokens: &[Cow<'static, str>],
    hooks: &TransformRegistry,
) -> String {
    // 'none' is exclusive: other fields are ignored and transforms never run.
    if spec.is_none() {
        return format!("{} {}", name, NONE_SOURCE);
    }

    let mut tokens = DirectiveTokens::new();

    for flag in DirectiveFlag::ALL {
        if spec.has_flag(flag) {
            tokens.push(Cow::Borrowed(flag.keyword()));
        }
    }

    for source in spec.domain_list() {
        match source.as_static_str() {
            Some(keyword) => tokens.push(Cow::Borrowed(keyword)),
            None => tokens.push(Cow::Owned(source.to_string())),
        }
    }

    tokens.extend(extra_tokens.iter().cloned());

    hooks.apply_directive(name, &mut tokens);

    if tokens.is_empty() {
        return String::new();
    }

    let capacity = name.as_str().len()
        + tokens.iter().map(|t| t.len() + 1).sum::<usize>()
        + SEMICOLON_SPACE.len();
    let mut clause = String::with_capacity(capacity);
    clause.push_str(name.as_str());
    for token in &tokens {
        clause.push(' ');
        clause.push_str(token);
    }
    clause.push_str(SEMICOLON_SPACE);
    clause
}
