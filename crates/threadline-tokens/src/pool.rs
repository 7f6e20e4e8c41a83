// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response token allocation.
//!
//! The pool keeps a shuffled cache of tokens believed to be free and hands
//! them out one at a time. The cache is only an optimization: every candidate
//! is re-checked against the [`TokenLedger`] after it has been taken out of the
//! cache, and rejected candidates are discarded up to `max_attempts` times.
//!
//! Lock discipline: the cache lock is held only to pop a candidate or to merge
//! a refilled chunk. Ledger queries (the refill scan and the final re-check)
//! run without it. A popped candidate is reserved in the same critical section,
//! so no concurrent refill can put it back into the cache while it is being
//! validated or while the persistence writer is still recording it.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use threadline_config::model::TokenConfig;
use threadline_core::{ResponseToken, ThreadlineError, TokenLedger};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::recording;
use crate::space::TokenSpace;

/// Allocation policy knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Days a token stays bound to its conversation.
    pub reuse_window_days: u32,
    /// Rejected candidates tolerated before allocation fails.
    pub max_attempts: u32,
    /// How long an issued token is withheld from refills.
    pub reservation_ttl: Duration,
}

impl PoolSettings {
    pub fn from_config(config: &TokenConfig) -> Self {
        Self {
            reuse_window_days: config.reuse_window_days,
            max_attempts: config.max_attempts,
            reservation_ttl: Duration::from_secs(config.reservation_ttl_secs),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::from_config(&TokenConfig::default())
    }
}

struct PoolState {
    cache: VecDeque<ResponseToken>,
    /// Tokens handed out (or being validated) by this pool, with issue time.
    reservations: HashMap<ResponseToken, Instant>,
    rng: Box<dyn RngCore + Send>,
}

impl PoolState {
    fn prune_reservations(&mut self, ttl: Duration) {
        let now = Instant::now();
        self.reservations
            .retain(|_, issued| now.duration_since(*issued) < ttl);
    }
}

/// Hands out response tokens that are unused at the instant of return.
///
/// One pool is shared (behind an `Arc`) by every inbound handler of a
/// process. Independent pools share nothing, so tests can run several side
/// by side.
pub struct ResponseTokenPool {
    space: TokenSpace,
    settings: PoolSettings,
    ledger: Arc<dyn TokenLedger>,
    state: Mutex<PoolState>,
}

impl ResponseTokenPool {
    /// Create a pool shuffling with an entropy-seeded RNG.
    pub fn new(space: TokenSpace, settings: PoolSettings, ledger: Arc<dyn TokenLedger>) -> Self {
        Self::with_rng(space, settings, ledger, StdRng::from_entropy())
    }

    /// Create a pool with an explicit randomness source.
    pub fn with_rng(
        space: TokenSpace,
        settings: PoolSettings,
        ledger: Arc<dyn TokenLedger>,
        rng: impl RngCore + Send + 'static,
    ) -> Self {
        Self {
            space,
            settings,
            ledger,
            state: Mutex::new(PoolState {
                cache: VecDeque::new(),
                reservations: HashMap::new(),
                rng: Box::new(rng),
            }),
        }
    }

    pub fn from_config(
        config: &TokenConfig,
        ledger: Arc<dyn TokenLedger>,
    ) -> Result<Self, ThreadlineError> {
        Ok(Self::new(
            TokenSpace::from_config(config)?,
            PoolSettings::from_config(config),
            ledger,
        ))
    }

    pub fn space(&self) -> &TokenSpace {
        &self.space
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Allocate a token that the ledger reports inactive.
    ///
    /// Fails with [`ThreadlineError::TokenPoolExhausted`] once `max_attempts`
    /// candidates have been rejected, or when no chunk of the space has a free
    /// token. Ledger errors are returned as-is.
    pub async fn allocate(&self) -> Result<ResponseToken, ThreadlineError> {
        let window = self.settings.reuse_window_days;
        let mut rejected = 0u32;

        loop {
            let candidate = self.take_candidate().await?;

            let active = match self.ledger.is_active(candidate, window).await {
                Ok(active) => active,
                Err(e) => {
                    self.release(candidate).await;
                    return Err(e);
                }
            };

            if !active {
                recording::record_allocated();
                info!(token = %candidate, rejected, "response token allocated");
                return Ok(candidate);
            }

            self.release(candidate).await;
            rejected += 1;
            recording::record_stale_discard();
            warn!(
                token = %candidate,
                ledger = self.ledger.name(),
                "cached response token is already active, discarding"
            );

            if rejected >= self.settings.max_attempts {
                recording::record_exhaustion("attempts");
                error!(attempts = rejected, "response token allocation gave up");
                return Err(ThreadlineError::TokenPoolExhausted { attempts: rejected });
            }
        }
    }

    /// Number of candidates currently cached.
    pub async fn cached(&self) -> usize {
        self.state.lock().await.cache.len()
    }

    /// Number of tokens currently withheld from refills.
    pub async fn reserved(&self) -> usize {
        let mut state = self.state.lock().await;
        state.prune_reservations(self.settings.reservation_ttl);
        state.reservations.len()
    }

    /// Pop and reserve the next cached candidate, refilling when empty.
    async fn take_candidate(&self) -> Result<ResponseToken, ThreadlineError> {
        loop {
            let excluded: HashSet<ResponseToken> = {
                let mut state = self.state.lock().await;
                if let Some(token) = state.cache.pop_front() {
                    state.reservations.insert(token, Instant::now());
                    return Ok(token);
                }
                state.prune_reservations(self.settings.reservation_ttl);
                state.reservations.keys().copied().collect()
            };

            let fresh = self.refill(&excluded).await?;

            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            // Another task may have refilled or issued tokens while we scanned.
            let mut fresh: Vec<ResponseToken> = fresh
                .into_iter()
                .filter(|t| !state.reservations.contains_key(t) && !state.cache.contains(t))
                .collect();
            fresh.shuffle(&mut state.rng);
            state.cache.extend(fresh);
        }
    }

    /// Scan the space chunk by chunk and return the first chunk's free tokens.
    async fn refill(
        &self,
        excluded: &HashSet<ResponseToken>,
    ) -> Result<Vec<ResponseToken>, ThreadlineError> {
        let window = self.settings.reuse_window_days;

        for chunk in self.space.chunks() {
            let candidates: Vec<ResponseToken> = chunk
                .into_iter()
                .filter(|t| !excluded.contains(t))
                .collect();
            let Some(&chunk_start) = candidates.first() else {
                continue;
            };

            let active: HashSet<ResponseToken> = self
                .ledger
                .active_among(&candidates, window)
                .await?
                .into_iter()
                .collect();
            let free: Vec<ResponseToken> = candidates
                .into_iter()
                .filter(|t| !active.contains(t))
                .collect();

            if !free.is_empty() {
                recording::record_refill(free.len());
                debug!(
                    chunk_start = %chunk_start,
                    available = free.len(),
                    "refilled response token cache"
                );
                return Ok(free);
            }
        }

        recording::record_exhaustion("space");
        error!(
            capacity = self.space.capacity(),
            reserved = excluded.len(),
            "no free response token left in the token space"
        );
        Err(ThreadlineError::TokenPoolExhausted { attempts: 0 })
    }

    async fn release(&self, token: ResponseToken) {
        self.state.lock().await.reservations.remove(&token);
    }
}
