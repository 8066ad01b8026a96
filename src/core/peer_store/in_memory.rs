//! In-memory peer store backend.
//!
//! Swarms live in a `RwLock<BTreeMap<..>>` of per-swarm entries, each behind
//! its own `Mutex`, so operations on different swarms never contend and
//! operations on the same swarm are serialized. The swarm map doubles as the
//! active-swarm directory: a key is inserted on the first announce and
//! removed only by [`sweep`](InMemoryPeerStore::sweep) after both role sets
//! drained.
//!
//! Locks are std sync primitives held for single map operations, never across
//! an await point.
use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use hive_tracker_clock::Time;
use hive_tracker_primitives::info_hash::InfoHash;
use hive_tracker_primitives::peer::{Endpoint, Role};
use hive_tracker_primitives::swarm_metadata::SwarmMetadata;
use hive_tracker_primitives::DurationSinceUnixEpoch;
use rand::seq::IteratorRandom;

use super::{Error, PeerStore, SEEDER_SAMPLE_RATIO};
use crate::CurrentClock;

/// Idleness TTL for the per-swarm completed counters.
const STATS_IDLE_TTL: Duration = Duration::from_secs(3600);

/// In-memory [`PeerStore`] implementation.
pub struct InMemoryPeerStore {
    swarms: RwLock<BTreeMap<InfoHash, Arc<Mutex<Swarm>>>>,
    stats: Mutex<HashMap<InfoHash, CompletedCounter>>,
    rate_counters: Mutex<HashMap<IpAddr, RateCounter>>,
    peer_ttl: Duration,
}

impl InMemoryPeerStore {
    #[must_use]
    pub fn new(peer_ttl: Duration) -> Self {
        Self {
            swarms: RwLock::new(BTreeMap::new()),
            stats: Mutex::new(HashMap::new()),
            rate_counters: Mutex::new(HashMap::new()),
            peer_ttl,
        }
    }

    fn get_swarms<'a>(&'a self) -> std::sync::RwLockReadGuard<'a, BTreeMap<InfoHash, Arc<Mutex<Swarm>>>> {
        self.swarms.read().expect("unable to get swarm list")
    }

    fn get_swarms_mut<'a>(&'a self) -> std::sync::RwLockWriteGuard<'a, BTreeMap<InfoHash, Arc<Mutex<Swarm>>>> {
        self.swarms.write().expect("unable to get writable swarm list")
    }

    /// Heartbeats at or before this timestamp are expired.
    fn current_cutoff(&self) -> DurationSinceUnixEpoch {
        CurrentClock::now_sub(&self.peer_ttl).unwrap_or_default()
    }

    fn live_completed(&self, info_hash: &InfoHash) -> u32 {
        let now = CurrentClock::now();
        let stats = self.stats.lock().expect("unable to get stats");

        match stats.get(info_hash) {
            Some(counter) if now.saturating_sub(counter.updated) < STATS_IDLE_TTL => counter.downloads,
            _ => 0,
        }
    }
}

#[async_trait]
impl PeerStore for InMemoryPeerStore {
    async fn upsert_peer(&self, info_hash: &InfoHash, endpoint: &Endpoint, role: Role) -> Result<(), Error> {
        let maybe_swarm = self.get_swarms().get(info_hash).cloned();

        let swarm = if let Some(swarm) = maybe_swarm {
            swarm
        } else {
            let mut swarms = self.get_swarms_mut();
            let swarm = swarms.entry(*info_hash).or_insert(Arc::default());
            swarm.clone()
        };

        swarm
            .lock()
            .expect("it should lock the swarm")
            .upsert(endpoint, role, CurrentClock::now());

        Ok(())
    }

    async fn remove_peer(&self, info_hash: &InfoHash, endpoint: &Endpoint) -> Result<(), Error> {
        if let Some(swarm) = self.get_swarms().get(info_hash) {
            swarm.lock().expect("it should lock the swarm").remove(endpoint);
        }

        Ok(())
    }

    async fn get_swarm_metadata(&self, info_hash: &InfoHash) -> Result<SwarmMetadata, Error> {
        let downloaded = self.live_completed(info_hash);

        let (complete, incomplete) = match self.get_swarms().get(info_hash) {
            Some(swarm) => swarm
                .lock()
                .expect("it should lock the swarm")
                .live_counts(self.current_cutoff()),
            None => (0, 0),
        };

        Ok(SwarmMetadata {
            downloaded,
            complete,
            incomplete,
        })
    }

    async fn sample_peers(&self, info_hash: &InfoHash, role: Role, max: usize) -> Result<Vec<Endpoint>, Error> {
        let maybe_swarm = self.get_swarms().get(info_hash).cloned();

        let Some(swarm) = maybe_swarm else {
            return Ok(vec![]);
        };

        let sample = swarm
            .lock()
            .expect("it should lock the swarm")
            .sample(role, max, self.current_cutoff());

        Ok(sample)
    }

    async fn increment_completed(&self, info_hash: &InfoHash) -> Result<(), Error> {
        let now = CurrentClock::now();
        let mut stats = self.stats.lock().expect("unable to get stats");

        let counter = stats.entry(*info_hash).or_default();

        // A counter idle beyond its TTL has decayed; restart it.
        if now.saturating_sub(counter.updated) >= STATS_IDLE_TTL {
            counter.downloads = 0;
        }

        counter.downloads += 1;
        counter.updated = now;

        Ok(())
    }

    async fn check_rate_limit(&self, client_ip: &IpAddr, window: Duration, max_requests: u32) -> Result<bool, Error> {
        let now = CurrentClock::now();
        let mut counters = self.rate_counters.lock().expect("unable to get rate counters");

        let counter = counters.entry(*client_ip).or_insert(RateCounter {
            window_started: now,
            window,
            requests: 0,
        });

        if now.saturating_sub(counter.window_started) >= counter.window {
            counter.window_started = now;
            counter.requests = 0;
        }

        counter.requests += 1;

        Ok(counter.requests <= max_requests)
    }

    async fn sweep(&self) -> Result<(), Error> {
        let now = CurrentClock::now();
        let cutoff = self.current_cutoff();

        let entries: Vec<(InfoHash, Arc<Mutex<Swarm>>)> =
            self.get_swarms().iter().map(|(k, v)| (*k, v.clone())).collect();

        let mut drained: Vec<InfoHash> = vec![];

        for (info_hash, swarm) in entries {
            let mut swarm = swarm.lock().expect("it should lock the swarm");
            swarm.evict_expired(cutoff);
            if swarm.is_empty() {
                drained.push(info_hash);
            }
        }

        if !drained.is_empty() {
            let mut swarms = self.get_swarms_mut();
            for info_hash in drained {
                // Re-check under the write lock: an announce may have landed
                // since the cardinality check.
                let still_empty = swarms
                    .get(&info_hash)
                    .is_some_and(|swarm| swarm.lock().expect("it should lock the swarm").is_empty());
                if still_empty {
                    swarms.remove(&info_hash);
                }
            }
        }

        self.stats
            .lock()
            .expect("unable to get stats")
            .retain(|_, counter| now.saturating_sub(counter.updated) < STATS_IDLE_TTL);

        self.rate_counters
            .lock()
            .expect("unable to get rate counters")
            .retain(|_, counter| now.saturating_sub(counter.window_started) < counter.window);

        Ok(())
    }
}

/// One swarm: the two disjoint role sets, scored by last heartbeat.
#[derive(Debug, Default)]
struct Swarm {
    seeders: BTreeMap<Endpoint, DurationSinceUnixEpoch>,
    leechers: BTreeMap<Endpoint, DurationSinceUnixEpoch>,
}

impl Swarm {
    /// Inserts into the role set and removes from the opposite set in one
    /// step, so a peer is never observable in both.
    fn upsert(&mut self, endpoint: &Endpoint, role: Role, now: DurationSinceUnixEpoch) {
        self.role_set_mut(role).insert(*endpoint, now);
        self.role_set_mut(role.opposite()).remove(endpoint);
    }

    fn remove(&mut self, endpoint: &Endpoint) {
        self.seeders.remove(endpoint);
        self.leechers.remove(endpoint);
    }

    fn role_set(&self, role: Role) -> &BTreeMap<Endpoint, DurationSinceUnixEpoch> {
        match role {
            Role::Seeder => &self.seeders,
            Role::Leecher => &self.leechers,
        }
    }

    fn role_set_mut(&mut self, role: Role) -> &mut BTreeMap<Endpoint, DurationSinceUnixEpoch> {
        match role {
            Role::Seeder => &mut self.seeders,
            Role::Leecher => &mut self.leechers,
        }
    }

    fn live_peers(&self, role: Role, cutoff: DurationSinceUnixEpoch) -> impl Iterator<Item = &Endpoint> {
        self.role_set(role)
            .iter()
            .filter(move |(_, heartbeat)| **heartbeat > cutoff)
            .map(|(endpoint, _)| endpoint)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn live_counts(&self, cutoff: DurationSinceUnixEpoch) -> (u32, u32) {
        (
            self.live_peers(Role::Seeder, cutoff).count() as u32,
            self.live_peers(Role::Leecher, cutoff).count() as u32,
        )
    }

    /// Random sample under the biasing rule: a seeder requester gets leechers
    /// only; a leecher requester gets a 30/70 seeder/leecher mix, with the
    /// seeder quota at least 1 when `max > 0` and deficits backfilled from
    /// the other side. Never padded beyond what is available.
    fn sample(&self, role: Role, max: usize, cutoff: DurationSinceUnixEpoch) -> Vec<Endpoint> {
        let mut rng = rand::thread_rng();

        match role {
            Role::Seeder => self
                .live_peers(Role::Leecher, cutoff)
                .choose_multiple(&mut rng, max)
                .into_iter()
                .copied()
                .collect(),
            Role::Leecher => {
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let mut seeder_quota = (max as f64 * SEEDER_SAMPLE_RATIO) as usize;
                if seeder_quota < 1 && max > 0 {
                    seeder_quota = 1;
                }
                let leecher_quota = max - seeder_quota;

                let mut seeders = self.live_peers(Role::Seeder, cutoff).choose_multiple(&mut rng, seeder_quota);
                let mut leechers = self
                    .live_peers(Role::Leecher, cutoff)
                    .choose_multiple(&mut rng, leecher_quota);

                if seeders.len() < seeder_quota {
                    let shortfall = seeder_quota - seeders.len();
                    leechers = self
                        .live_peers(Role::Leecher, cutoff)
                        .choose_multiple(&mut rng, leecher_quota + shortfall);
                } else if leechers.len() < leecher_quota {
                    let shortfall = leecher_quota - leechers.len();
                    seeders = self
                        .live_peers(Role::Seeder, cutoff)
                        .choose_multiple(&mut rng, seeder_quota + shortfall);
                }

                let mut sample: Vec<Endpoint> = seeders.into_iter().chain(leechers).copied().collect();
                sample.truncate(max);
                sample
            }
        }
    }

    fn evict_expired(&mut self, cutoff: DurationSinceUnixEpoch) {
        self.seeders.retain(|_, heartbeat| *heartbeat > cutoff);
        self.leechers.retain(|_, heartbeat| *heartbeat > cutoff);
    }

    fn is_empty(&self) -> bool {
        self.seeders.is_empty() && self.leechers.is_empty()
    }
}

#[derive(Debug, Default)]
struct CompletedCounter {
    downloads: u32,
    updated: DurationSinceUnixEpoch,
}

#[derive(Debug)]
struct RateCounter {
    window_started: DurationSinceUnixEpoch,
    window: Duration,
    requests: u32,
}
