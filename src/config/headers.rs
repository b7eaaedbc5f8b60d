//! Email header normalization.

use std::collections::HashMap;

use super::defaults::DEFAULT_EMAIL_SUBJECT;
use crate::error::ReceiverError;

/// Canonical form of a header name.
///
/// Matching is ASCII case-insensitive. Each `-`-separated segment is
/// rendered with an upper-case first letter and lower-case rest, so
/// `content-TYPE` becomes `Content-Type`.
///
/// Non-ASCII letters are never folded, so names differing only in them
/// (`İd` and `id`) do not collide.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::with_capacity(segment.len());
                    out.push(first.to_ascii_uppercase());
                    out.push_str(&chars.as_str().to_ascii_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Re-keys `raw` by canonical header name and fills in `Subject`, `To` and
/// `From` when absent.
///
/// # Errors
/// Returns [`ReceiverError::DuplicateHeader`] when two supplied names share a
/// canonical form.
pub fn normalize_headers(
    raw: &HashMap<String, String>,
    to: &str,
    from: &str,
) -> Result<HashMap<String, String>, ReceiverError> {
    let mut headers = HashMap::with_capacity(raw.len() + 3);
    for (name, value) in raw {
        let canonical = canonical_header_name(name);
        if headers.contains_key(&canonical) {
            return Err(ReceiverError::DuplicateHeader { name: canonical });
        }
        headers.insert(canonical, value.clone());
    }

    headers
        .entry("Subject".to_string())
        .or_insert_with(|| DEFAULT_EMAIL_SUBJECT.to_string());
    headers
        .entry("To".to_string())
        .or_insert_with(|| to.to_string());
    headers
        .entry("From".to_string())
        .or_insert_with(|| from.to_string());

    Ok(headers)
}
