//! Wall-clock time source
//!
//! The only external collaborator of the library. TOTP functions read the
//! current time through [`SystemClock`]; every such function also has an
//! `_at` variant taking an explicit timestamp so tests stay deterministic.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of current Unix time in whole seconds.
///
/// Implementations must be pure reads of time, safe to call from any thread.
pub trait Clock {
    fn now(&self) -> u64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // A clock set before the Unix epoch reads as zero
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}
