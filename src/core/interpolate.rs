//! Single-pass `{placeholder}` substitution
//!
//! Each `{key}` whose key the lookup knows is replaced once; replacement
//! text is never rescanned and unknown placeholders are left verbatim.

use std::borrow::Cow;

/// Substitute `{key}` placeholders in `template`.
///
/// Keys containing `}` can never match.
///
/// # Examples
///
/// ```
/// use log_dispatch::core::interpolate::interpolate;
///
/// let out = interpolate("Line {n} of {total}", |key| match key {
///     "n" => Some("25".into()),
///     _ => None,
/// });
/// assert_eq!(out, "Line 25 of {total}");
/// ```
pub fn interpolate<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<Cow<'a, str>>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find('}') {
            Some(close) => match lookup(&after_open[..close]) {
                Some(replacement) => {
                    out.push_str(&replacement);
                    rest = &after_open[close + 1..];
                }
                None => {
                    // Retry from the next byte so "{{key}" still resolves
                    out.push('{');
                    rest = after_open;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}
