//! HTTP tracker delivery layer.
//!
//! It exposes the `announce` endpoint described in
//! [BEP 3](https://www.bittorrent.org/beps/bep_0003.html) with the compact
//! responses of [BEP 23](https://www.bittorrent.org/beps/bep_0023.html) and
//! the IPv6 extension of
//! [BEP 7](https://www.bittorrent.org/beps/bep_0007.html).
pub mod percent_encoding;
pub mod server;
pub mod v1;

pub const HTTP_TRACKER_LOG_TARGET: &str = "HTTP TRACKER";
