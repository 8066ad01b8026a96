//! This module contains functions for percent decoding the binary query
//! params of announce requests.
//!
//! `BitTorrent` infohashes and peer ids are percent encoded like any other
//! URL parameter, but they are encoded from byte arrays which may not be
//! valid UTF-8.
//!
//! The `info_hash` param needs one extra canonicalization step on top of the
//! percent decoding: real clients URL-encode the raw 20-byte digest, while
//! scripted requests often send the 40-character hex rendering directly. A
//! decoded value that is exactly 40 bytes of hex characters is taken as hex
//! (lowercased); anything else must be the raw 20 bytes. Both forms map to
//! the same swarm.
use hive_tracker_primitives::info_hash::{self, InfoHash};
use hive_tracker_primitives::peer;

/// Percent decodes a percent encoded infohash, accepting both the raw
/// 20-byte form and the 40-character hex form.
///
/// For example, for the infohash `3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0`
/// both of these decode to the same value:
///
/// ```text
/// %3B%24U%04%CF%5F%11%BB%DB%E1%20%1C%EAjk%F4Z%EE%1B%C0
/// 3B245504CF5F11BBDBE1201CEA6A6BF45AEE1BC0
/// ```
///
/// # Errors
///
/// Will return `Err` if the decoded bytes are neither a 40-character hex
/// string nor exactly 20 bytes long.
pub fn percent_decode_info_hash(raw_info_hash: &str) -> Result<InfoHash, info_hash::ConversionError> {
    let bytes = percent_encoding::percent_decode_str(raw_info_hash).collect::<Vec<u8>>();

    if bytes.len() == 40 && bytes.iter().all(u8::is_ascii_hexdigit) {
        let hex = std::str::from_utf8(&bytes).expect("hex digits are valid UTF-8");
        return Ok(hex.parse::<InfoHash>().expect("a 40 character hex string should parse"));
    }

    InfoHash::try_from(bytes)
}

/// Percent decodes a percent encoded peer id. Internally a peer
/// [`Id`](peer::Id) is a 20-byte array.
///
/// # Errors
///
/// Will return `Err` if the decoded bytes do not represent a valid
/// [`peer::Id`].
pub fn percent_decode_peer_id(raw_peer_id: &str) -> Result<peer::Id, peer::IdConversionError> {
    let bytes = percent_encoding::percent_decode_str(raw_peer_id).collect::<Vec<u8>>();
    peer::Id::try_from(bytes)
}
