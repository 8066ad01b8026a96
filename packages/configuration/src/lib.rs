//! Configuration data structures for the `hive-tracker`.
//!
//! The configuration is loaded from environment variables with defaults, so a
//! bare `hive-tracker` starts with a working setup:
//!
//! | Variable                 | Default   | Meaning                                        |
//! |--------------------------|-----------|------------------------------------------------|
//! | `SERVER_PORT`            | `8080`    | HTTP tracker port                              |
//! | `API_PORT`               | `8081`    | Metadata REST API port                         |
//! | `ANNOUNCE_INTERVAL`      | `1800`    | Seconds clients should wait between announces  |
//! | `MIN_ANNOUNCE_INTERVAL`  | `900`     | Clients must not re-announce more often        |
//! | `PEER_TTL`               | `1800s`   | Heartbeat age after which a peer is offline    |
//! | `SWEEP_INTERVAL`         | `300s`    | Period of the expired-peer sweeper             |
//! | `NUMWANT_DEFAULT`        | `50`      | Peers returned when `numwant` is absent        |
//! | `NUMWANT_MAX`            | `50`      | Upper cap for `numwant`                        |
//! | `RATE_LIMIT_WINDOW`      | `1s`      | Per-IP rate counter window                     |
//! | `RATE_LIMIT_MAX`         | `10`      | Announces allowed per IP per window            |
//! | `LOG_THRESHOLD`          | `info`    | `off`, `error`, `warn`, `info`, `debug`, `trace` |
//!
//! Durations accept plain seconds (`300`) or a `s`/`m`/`h` suffix (`5m`).
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::panic::Location;
use std::str::FromStr;
use std::time::Duration;

use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// An environment variable is set but its value cannot be parsed.
    #[error("invalid value {value} for environment variable {var} in {location}")]
    InvalidValue {
        var: &'static str,
        value: String,
        location: &'static Location<'static>,
    },
}

/// The whole tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub core: Core,
    pub http_tracker: HttpTracker,
    pub http_api: HttpApi,
    pub log_threshold: Threshold,
}

/// Core tracker configuration: announce policy, peer lifetime and abuse
/// protection. It's independent of the delivery layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Core {
    /// The intervals handed to clients in every announce response.
    pub announce_policy: AnnouncePolicy,

    /// Maximum heartbeat age after which a peer is considered offline. Expired
    /// peers are never returned from sampling and are eventually removed by
    /// the sweeper.
    pub peer_ttl: Duration,

    /// Period of the background task that evicts expired peers and prunes
    /// empty swarms.
    pub sweep_interval: Duration,

    /// Number of peers returned when the client does not send `numwant`.
    pub numwant_default: u16,

    /// Upper cap applied to the `numwant` request parameter.
    pub numwant_max: u16,

    /// Per-client-IP announce rate limit.
    pub rate_limit: RateLimitPolicy,
}

/// The announce intervals returned to clients.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Constructor, Serialize, Deserialize)]
pub struct AnnouncePolicy {
    /// Interval in seconds that clients should wait between regular announces.
    pub interval: u32,
    /// Minimum announce interval. Clients must not reannounce more frequently
    /// than this.
    pub interval_min: u32,
}

impl Default for AnnouncePolicy {
    fn default() -> Self {
        Self::new(1800, 900)
    }
}

/// Per-client-IP sliding rate counter settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Constructor, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Length of the counting window.
    pub window: Duration,
    /// Announces allowed per IP inside one window.
    pub max_requests: u32,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 10)
    }
}

/// HTTP tracker delivery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpTracker {
    pub bind_address: SocketAddr,
}

/// Metadata REST API delivery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpApi {
    pub bind_address: SocketAddr,
}

/// Logging threshold. `Off` disables the subscriber entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Threshold {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for Threshold {
    type Err = String;

    fn from_str(threshold: &str) -> Result<Self, Self::Err> {
        match threshold.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!("unknown log threshold: {threshold}")),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            core: Core::default(),
            http_tracker: HttpTracker {
                bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
            },
            http_api: HttpApi {
                bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8081),
            },
            log_threshold: Threshold::Info,
        }
    }
}

impl Default for Core {
    fn default() -> Self {
        Self {
            announce_policy: AnnouncePolicy::default(),
            peer_ttl: Duration::from_secs(1800),
            sweep_interval: Duration::from_secs(300),
            numwant_default: 50,
            numwant_max: 50,
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

impl Configuration {
    /// Loads the configuration from the environment, falling back to the
    /// defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Will return an [`Error::InvalidValue`] naming the offending variable
    /// if a set variable cannot be parsed.
    pub fn load_from_env() -> Result<Configuration, Error> {
        let defaults = Core::default();

        let core = Core {
            announce_policy: AnnouncePolicy::new(
                env_parsed("ANNOUNCE_INTERVAL")?.unwrap_or(defaults.announce_policy.interval),
                env_parsed("MIN_ANNOUNCE_INTERVAL")?.unwrap_or(defaults.announce_policy.interval_min),
            ),
            peer_ttl: env_duration("PEER_TTL")?.unwrap_or(defaults.peer_ttl),
            sweep_interval: env_duration("SWEEP_INTERVAL")?.unwrap_or(defaults.sweep_interval),
            numwant_default: env_parsed("NUMWANT_DEFAULT")?.unwrap_or(defaults.numwant_default),
            numwant_max: env_parsed("NUMWANT_MAX")?.unwrap_or(defaults.numwant_max),
            rate_limit: RateLimitPolicy::new(
                env_duration("RATE_LIMIT_WINDOW")?.unwrap_or(defaults.rate_limit.window),
                env_parsed("RATE_LIMIT_MAX")?.unwrap_or(defaults.rate_limit.max_requests),
            ),
        };

        let http_tracker = HttpTracker {
            bind_address: SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                env_parsed("SERVER_PORT")?.unwrap_or(8080),
            ),
        };

        let http_api = HttpApi {
            bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), env_parsed("API_PORT")?.unwrap_or(8081)),
        };

        let log_threshold = env_parsed("LOG_THRESHOLD")?.unwrap_or(Threshold::Info);

        Ok(Configuration {
            core,
            http_tracker,
            http_api,
            log_threshold,
        })
    }
}

fn env_var(var: &'static str) -> Option<String> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn env_parsed<T: FromStr>(var: &'static str) -> Result<Option<T>, Error> {
    match env_var(var) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| Error::InvalidValue {
            var,
            value,
            location: Location::caller(),
        }),
    }
}

fn env_duration(var: &'static str) -> Result<Option<Duration>, Error> {
    match env_var(var) {
        None => Ok(None),
        Some(value) => match parse_duration(&value) {
            Some(duration) => Ok(Some(duration)),
            None => Err(Error::InvalidValue {
                var,
                value,
                location: Location::caller(),
            }),
        },
    }
}

/// Parses `1800`, `1800s`, `30m` or `1h` into a `Duration`.
fn parse_duration(value: &str) -> Option<Duration> {
    let (digits, scale) = match value.as_bytes().last()? {
        b's' => (&value[..value.len() - 1], 1),
        b'm' => (&value[..value.len() - 1], 60),
        b'h' => (&value[..value.len() - 1], 3600),
        _ => (value, 1),
    };

    let seconds = digits.parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds * scale))
}
