//! Share links for the shortcut registry.

pub mod link;

pub use link::{apply_share_link, decode_link, encode_payload, share_url, SHARE_PARAM};
