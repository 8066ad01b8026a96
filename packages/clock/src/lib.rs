//! Time source for the tracker.
//!
//! Peer heartbeats are scored with a `DurationSinceUnixEpoch` timestamp and
//! expired against a cutoff that lies one peer TTL in the past. Both
//! operations go through the [`Time`] trait, so production code reads the
//! system clock while tests pin a fixed one and move it forward to trigger
//! expiry deterministically.
use std::cell::RefCell;
use std::time::{Duration, SystemTime};

use hive_tracker_primitives::DurationSinceUnixEpoch;

/// A source of "now" for heartbeat scoring and TTL cutoffs.
pub trait Time {
    fn now() -> DurationSinceUnixEpoch;

    /// The timestamp lying `sub_time` in the past: the expiry cutoff for a
    /// TTL. `None` if that instant would fall before the Unix Epoch.
    #[must_use]
    fn now_sub(sub_time: &Duration) -> Option<DurationSinceUnixEpoch> {
        Self::now().checked_sub(*sub_time)
    }
}

/// The production clock. It reads the system time.
pub struct Working;

impl Time for Working {
    fn now() -> DurationSinceUnixEpoch {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("the system clock should be set after the Unix Epoch")
    }
}

/// The test clock. It returns a fixed time until the test moves it.
///
/// The fixed time is thread local and starts at the Unix Epoch, so every
/// test thread owns its own timeline and tests can run in parallel.
pub struct Stopped;

thread_local!(static FIXED_TIME: RefCell<DurationSinceUnixEpoch> = RefCell::new(DurationSinceUnixEpoch::ZERO));

impl Time for Stopped {
    fn now() -> DurationSinceUnixEpoch {
        FIXED_TIME.with(|time| *time.borrow())
    }
}

impl Stopped {
    /// Pins the current thread's clock to `unix_time`.
    pub fn local_set(unix_time: &DurationSinceUnixEpoch) {
        FIXED_TIME.with(|time| {
            *time.borrow_mut() = *unix_time;
        });
    }

    /// Moves the current thread's clock forward by `duration`.
    ///
    /// # Panics
    ///
    /// Will panic if the resulting timestamp would overflow.
    pub fn local_add(duration: &Duration) {
        FIXED_TIME.with(|time| {
            let advanced = time
                .borrow()
                .checked_add(*duration)
                .expect("the fixed time should not overflow");
            *time.borrow_mut() = advanced;
        });
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::{Duration, SystemTime};

    use crate::{Stopped, Time, Working};

    #[test]
    fn the_working_clock_should_read_the_system_time() {
        let before = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap();
        let now = Working::now();
        let after = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap();

        assert!(before <= now);
        assert!(now <= after);
    }

    #[test]
    fn the_stopped_clock_should_start_at_the_unix_epoch_and_stay_put() {
        assert_eq!(Stopped::now(), Duration::ZERO);

        thread::sleep(Duration::from_millis(10));

        assert_eq!(Stopped::now(), Duration::ZERO);
    }

    #[test]
    fn a_test_should_be_able_to_pin_and_advance_the_stopped_clock() {
        Stopped::local_set(&Duration::from_secs(1_669_397_478));
        assert_eq!(Stopped::now(), Duration::from_secs(1_669_397_478));

        Stopped::local_add(&Duration::from_secs(1800));
        assert_eq!(Stopped::now(), Duration::from_secs(1_669_399_278));
    }

    #[test]
    fn each_thread_should_own_its_timeline() {
        Stopped::local_set(&Duration::from_secs(42));

        thread::spawn(|| {
            assert_eq!(Stopped::now(), Duration::ZERO);
            Stopped::local_set(&Duration::from_secs(7));
        })
        .join()
        .unwrap();

        assert_eq!(Stopped::now(), Duration::from_secs(42));
    }

    #[test]
    fn a_ttl_cutoff_should_be_the_timestamp_lying_that_far_in_the_past() {
        Stopped::local_set(&Duration::from_secs(2000));

        assert_eq!(Stopped::now_sub(&Duration::from_secs(1800)), Some(Duration::from_secs(200)));

        // A TTL longer than the clock has run underflows: there is no such
        // instant, so nothing can be older than it.
        assert_eq!(Stopped::now_sub(&Duration::from_secs(3000)), None);
    }
}
