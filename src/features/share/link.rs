//! Shareable links carrying a shortcut registry.
//!
//! Payload: registry JSON, percent-encoded like `encodeURIComponent`, then
//! standard base64. It travels as the `shortcuts` query parameter.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::core::Clock;
use crate::error::KeytimeError;
use crate::features::shortcuts::ShortcutRegistry;
use crate::features::tracking::Tracker;
use crate::storage::KeyValueStore;

/// Query parameter holding the payload.
pub const SHARE_PARAM: &str = "shortcuts";

/// Characters `encodeURIComponent` escapes.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode a registry into the base64 payload.
///
/// # Errors
///
/// Returns an error if the registry cannot be serialized.
pub fn encode_payload(registry: &ShortcutRegistry) -> Result<String, KeytimeError> {
    let json = registry.to_json()?;
    let escaped = utf8_percent_encode(&json, COMPONENT).to_string();
    Ok(BASE64_STANDARD.encode(escaped))
}

/// Build a share URL on top of `base_url`.
///
/// # Errors
///
/// Returns an error if the registry cannot be serialized.
pub fn share_url(base_url: &str, registry: &ShortcutRegistry) -> Result<String, KeytimeError> {
    let payload = encode_payload(registry)?;
    let separator = if base_url.contains('?') { '&' } else { '?' };
    Ok(format!(
        "{base_url}{separator}{SHARE_PARAM}={}",
        utf8_percent_encode(&payload, COMPONENT)
    ))
}

fn percent_decode(input: &str) -> Result<String, KeytimeError> {
    percent_decode_str(input)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| KeytimeError::Parse(format!("invalid percent-encoding: {e}")))
}

/// Find the payload in a full URL, a query string or a bare payload.
fn extract_payload(input: &str) -> Result<String, KeytimeError> {
    let input = input.trim();
    let input = input.split_once('#').map_or(input, |(before, _)| before);

    let query = match input.split_once('?') {
        Some((_, query)) => Some(query),
        None if input.starts_with(&format!("{SHARE_PARAM}=")) => Some(input),
        None => None,
    };

    let raw = match query {
        Some(query) => query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == SHARE_PARAM)
            .map(|(_, value)| value)
            .ok_or_else(|| KeytimeError::Parse(format!("link has no `{SHARE_PARAM}` parameter")))?,
        None => input,
    };

    if raw.is_empty() {
        return Err(KeytimeError::Parse("empty share payload".to_string()));
    }
    percent_decode(raw)
}

/// Decode a share link into a registry.
///
/// # Errors
///
/// Returns a `Parse` error naming the step that failed.
pub fn decode_link(input: &str) -> Result<ShortcutRegistry, KeytimeError> {
    let payload = extract_payload(input)?;
    let bytes = BASE64_STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| KeytimeError::Parse(format!("invalid base64 payload: {e}")))?;
    let escaped = String::from_utf8(bytes)
        .map_err(|e| KeytimeError::Parse(format!("payload is not UTF-8: {e}")))?;
    ShortcutRegistry::from_json(&percent_decode(&escaped)?)
}

/// Replace the tracker's shortcuts with those in `link`.
///
/// Failures are logged and ignored, leaving the registry untouched.
/// Returns the number of shortcuts applied.
pub fn apply_share_link<S: KeyValueStore, C: Clock>(tracker: &mut Tracker<S, C>, link: &str) -> Option<usize> {
    let registry = match decode_link(link) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed share link");
            return None;
        },
    };

    let count = registry.len();
    match tracker.replace_shortcuts(registry) {
        Ok(()) => {
            tracing::info!(count, "shortcuts loaded from share link");
            Some(count)
        },
        Err(e) => {
            tracing::warn!(error = %e, "failed to save shared shortcuts");
            None
        },
    }
}
