//! Rule expansion: turns a naming rule plus upload context into a concrete
//! path or file name.

mod path;
mod token;

pub use path::clean_path;
pub use token::{random_key, resolve, ResolutionContext, Token};

use crate::backend::BackendTraits;

/// Which kind of rule is being expanded. Decides whether `{path}` or
/// `{originname}` is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Directory,
    FileName,
}

/// Expand every `{token}` span in `rule`.
///
/// Text outside spans is copied verbatim. Spans whose token is unknown, or not
/// available for `kind`, are copied verbatim including the braces. A `{` that
/// is never closed is copied as text.
pub fn expand(
    rule: &str,
    ctx: &ResolutionContext<'_>,
    kind: RuleKind,
    traits: &BackendTraits,
) -> String {
    let mut out = String::with_capacity(rule.len() + 16);
    let mut rest = rule;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let span = &rest[open..];

        let Some(close) = span.find('}') else {
            out.push_str(span);
            rest = "";
            break;
        };

        let inner = &span[1..close];
        // "{a{uid}" opens again before closing: the first brace is plain text.
        if let Some(reopen) = inner.rfind('{') {
            out.push_str(&span[..=reopen]);
            rest = &span[reopen + 1..];
            continue;
        }

        match Token::parse(inner).and_then(|token| resolve(token, ctx, kind, traits)) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&span[..=close]),
        }
        rest = &span[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{traits_for, GENERIC_TRAITS};
    use chrono::{Local, TimeZone};
    use stowage_core::StorageBackend;

    fn fixed_ctx<'a>() -> ResolutionContext<'a> {
        let now = Local
            .with_ymd_and_hms(2024, 3, 9, 12, 5, 1)
            .single()
            .expect("noon is never skipped by DST");
        ResolutionContext::new(1).at(now)
    }

    #[test]
    fn test_plain_text_is_copied() {
        let ctx = fixed_ctx();
        assert_eq!(
            expand("uploads/avatars", &ctx, RuleKind::Directory, &GENERIC_TRAITS),
            "uploads/avatars"
        );
        assert_eq!(expand("", &ctx, RuleKind::FileName, &GENERIC_TRAITS), "");
    }

    #[test]
    fn test_time_tokens_share_one_instant() {
        let ctx = fixed_ctx();
        let out = expand(
            "{date}/{datetime}/{date}",
            &ctx,
            RuleKind::Directory,
            &GENERIC_TRAITS,
        );
        assert_eq!(out, "20240309/20240309120501/20240309");
    }

    #[test]
    fn test_composite_rule_length() {
        let ctx = fixed_ctx();
        let out = expand(
            "123{date}ss{datetime}",
            &ctx,
            RuleKind::FileName,
            &GENERIC_TRAITS,
        );
        assert_eq!(out.len(), 27);
        assert!(out.starts_with("12320240309ss"));
    }

    #[test]
    fn test_unknown_tokens_are_left_literal() {
        let ctx = fixed_ctx();
        let out = expand(
            "{uid}-{nope}-{}-{UID}",
            &ctx,
            RuleKind::FileName,
            &GENERIC_TRAITS,
        );
        assert_eq!(out, "1-{nope}-{}-{UID}");
    }

    #[test]
    fn test_unbalanced_braces() {
        let ctx = fixed_ctx();
        assert_eq!(
            expand("a{b{uid}c", &ctx, RuleKind::FileName, &GENERIC_TRAITS),
            "a{b1c"
        );
        assert_eq!(
            expand("x}{uid", &ctx, RuleKind::FileName, &GENERIC_TRAITS),
            "x}{uid"
        );
        assert_eq!(
            expand("{{uid}}", &ctx, RuleKind::FileName, &GENERIC_TRAITS),
            "{1}"
        );
    }

    #[test]
    fn test_random_tokens_draw_independently() {
        let ctx = fixed_ctx();
        let out = expand(
            "{randomkey16}{randomkey16}",
            &ctx,
            RuleKind::FileName,
            &GENERIC_TRAITS,
        );
        assert_eq!(out.len(), 32);
        assert!(out.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(&out[..16], &out[16..]);
    }

    #[test]
    fn test_context_specific_tokens() {
        let ctx = fixed_ctx().with_base_path("docs").with_origin_name("a.txt");
        let traits = traits_for(&StorageBackend::Local);

        assert_eq!(
            expand("{path}{originname}", &ctx, RuleKind::Directory, traits),
            "docs/{originname}"
        );
        assert_eq!(
            expand("{path}{originname}", &ctx, RuleKind::FileName, traits),
            "{path}a.txt"
        );
    }

    #[test]
    fn test_multibyte_text_around_tokens() {
        let ctx = fixed_ctx();
        assert_eq!(
            expand("默认{uid}策略", &ctx, RuleKind::FileName, &GENERIC_TRAITS),
            "默认1策略"
        );
    }
}
