//! Process-local request rate limiting.
//!
//! Fixed windows keyed by client address, held in a `DashMap`. Checked
//! before any store or database access so an abusive client fails fast.
//! Counters live in this process only; running several instances needs an
//! external shared counter store instead.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use domains::error::{DomainError, DomainResult};

struct Window {
    started: Instant,
    count: u32,
}

pub struct FixedWindowLimiter {
    name: &'static str,
    max: u32,
    window: Duration,
    hits: DashMap<IpAddr, Window>,
}

impl FixedWindowLimiter {
    pub fn new(name: &'static str, max: u32, window: Duration) -> Self {
        Self {
            name,
            max,
            window,
            hits: DashMap::new(),
        }
    }

    /// Login budget: 5 attempts per address per 15 minutes.
    pub fn for_login() -> Self {
        Self::new("login", 5, Duration::from_secs(15 * 60))
    }

    /// Signup budget: 3 registrations per address per hour.
    pub fn for_signup() -> Self {
        Self::new("signup", 3, Duration::from_secs(60 * 60))
    }

    pub fn check(&self, addr: IpAddr) -> DomainResult<()> {
        self.check_at(addr, Instant::now())
    }

    fn check_at(&self, addr: IpAddr, now: Instant) -> DomainResult<()> {
        let mut entry = self.hits.entry(addr).or_insert(Window { started: now, count: 0 });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        if entry.count > self.max {
            Err(DomainError::RateLimited(format!("{} attempts", self.name)))
        } else {
            Ok(())
        }
    }
}
