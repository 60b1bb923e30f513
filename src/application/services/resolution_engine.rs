//! Concurrent two-tier resolution of short codes.
//!
//! Both tiers are queried at once against a shared deadline. The cache is
//! trusted first: a cache hit returns immediately, while a durable hit is held
//! until the cache has definitively answered (or the deadline fires). A
//! durable hit the cache missed schedules a detached repair write.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::domain::repositories::MappingStore;
use crate::domain::resolution::{LookupOutcome, ResolveError, Tier};
use crate::infrastructure::cache::CacheService;

/// Default shared deadline for one resolution.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum TierReply {
    Found(String),
    Miss,
    Failed(String),
}

#[derive(Debug)]
struct TierAnswer {
    tier: Tier,
    reply: TierReply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CacheState {
    Pending,
    Found(String),
    Missed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DurableState {
    Pending,
    Found(String),
    Missed,
    Failed,
}

#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    CacheHit(String),
    DurableHit { target: String, repair: bool },
    Absent,
    Failed(ResolveError),
}

/// Per-call merge state over the answers received so far.
#[derive(Debug)]
struct MergeState {
    cache: CacheState,
    durable: DurableState,
    last_error: Option<(Tier, String)>,
}

impl MergeState {
    fn new() -> Self {
        Self {
            cache: CacheState::Pending,
            durable: DurableState::Pending,
            last_error: None,
        }
    }

    fn record(&mut self, answer: TierAnswer) {
        match (answer.tier, answer.reply) {
            (Tier::Cache, TierReply::Found(target)) => self.cache = CacheState::Found(target),
            (Tier::Cache, TierReply::Miss) => self.cache = CacheState::Missed,
            (Tier::Cache, TierReply::Failed(reason)) => {
                self.cache = CacheState::Failed;
                self.last_error = Some((Tier::Cache, reason));
            }
            (Tier::Durable, TierReply::Found(target)) => self.durable = DurableState::Found(target),
            (Tier::Durable, TierReply::Miss) => self.durable = DurableState::Missed,
            (Tier::Durable, TierReply::Failed(reason)) => {
                self.durable = DurableState::Failed;
                self.last_error = Some((Tier::Durable, reason));
            }
        }
    }

    /// Returns a verdict once the answers so far settle the outcome.
    ///
    /// A durable hit is never returned while the cache is pending. A cache
    /// miss is not treated as absence: only the durable tier can say a code
    /// does not exist.
    fn verdict(&self) -> Option<Verdict> {
        match (&self.cache, &self.durable) {
            (CacheState::Found(target), _) => Some(Verdict::CacheHit(target.clone())),
            (CacheState::Pending, _) => None,
            (_, DurableState::Found(target)) => Some(Verdict::DurableHit {
                target: target.clone(),
                repair: true,
            }),
            (_, DurableState::Pending) => None,
            (_, DurableState::Missed) => Some(Verdict::Absent),
            (_, DurableState::Failed) => Some(Verdict::Failed(self.unavailable())),
        }
    }

    /// Final verdict when the deadline fires before [`Self::verdict`] settled.
    ///
    /// A held durable hit is accepted without repair: the cache never said it
    /// was missing the entry.
    fn expire(&self, timeout: Duration) -> Verdict {
        match &self.durable {
            DurableState::Found(target) => Verdict::DurableHit {
                target: target.clone(),
                repair: false,
            },
            _ => Verdict::Failed(ResolveError::Timeout(timeout)),
        }
    }

    /// Final verdict when every query task has ended before the deadline.
    ///
    /// A tier still pending here lost its task without answering (a panicking
    /// adapter) and counts as failed.
    fn abandon(&mut self) -> Verdict {
        const REASON: &str = "query task ended without an answer";

        if self.cache == CacheState::Pending {
            self.cache = CacheState::Failed;
            self.last_error = Some((Tier::Cache, REASON.to_string()));
        }
        if self.durable == DurableState::Pending {
            self.durable = DurableState::Failed;
            self.last_error = Some((Tier::Durable, REASON.to_string()));
        }

        self.verdict()
            .unwrap_or_else(|| Verdict::Failed(self.unavailable()))
    }

    fn unavailable(&self) -> ResolveError {
        let (tier, reason) = self
            .last_error
            .clone()
            .unwrap_or((Tier::Durable, "unknown error".to_string()));
        ResolveError::TierUnavailable { tier, reason }
    }
}

/// Races the cache and durable tiers for a short code.
///
/// Stateless per call; safe to share behind an `Arc` across requests.
pub struct ResolutionEngine {
    cache: Arc<dyn CacheService>,
    store: Arc<dyn MappingStore>,
    timeout: Duration,
}

impl ResolutionEngine {
    /// Creates an engine over the two tiers with a default deadline.
    pub fn new(
        cache: Arc<dyn CacheService>,
        store: Arc<dyn MappingStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            timeout,
        }
    }

    /// Default deadline applied by [`Self::resolve`].
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves a short code with the engine's default deadline.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_within`].
    pub async fn resolve(&self, short_code: &str) -> Result<LookupOutcome, ResolveError> {
        self.resolve_within(short_code, self.timeout).await
    }

    /// Resolves a short code against both tiers within `timeout`.
    ///
    /// Spawns exactly two query tasks bounded by the same deadline, plus at
    /// most one detached repair write whose outcome is only logged.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::TierUnavailable`] if no tier could answer definitively
    ///   because of tier failures
    /// - [`ResolveError::Timeout`] if the deadline elapsed without a definitive answer
    pub async fn resolve_within(
        &self,
        short_code: &str,
        timeout: Duration,
    ) -> Result<LookupOutcome, ResolveError> {
        let deadline = Instant::now() + timeout;
        let (tx, mut rx) = mpsc::channel::<TierAnswer>(2);

        let cache = Arc::clone(&self.cache);
        let code = short_code.to_string();
        spawn_query(Tier::Cache, deadline, tx.clone(), async move {
            match cache.get_url(&code).await {
                Ok(Some(target)) => TierReply::Found(target),
                Ok(None) => TierReply::Miss,
                Err(e) => TierReply::Failed(e.to_string()),
            }
        });

        let store = Arc::clone(&self.store);
        let code = short_code.to_string();
        spawn_query(Tier::Durable, deadline, tx, async move {
            match store.get(&code).await {
                Ok(Some(mapping)) => TierReply::Found(mapping.target_url),
                Ok(None) => TierReply::Miss,
                Err(e) => TierReply::Failed(e.to_string()),
            }
        });

        let mut state = MergeState::new();
        let expired = time::sleep_until(deadline);
        tokio::pin!(expired);

        let verdict = loop {
            tokio::select! {
                biased;
                answer = rx.recv() => match answer {
                    Some(answer) => {
                        debug!(short_code, tier = %answer.tier, reply = ?answer.reply, "Tier answered");
                        state.record(answer);
                        if let Some(verdict) = state.verdict() {
                            break verdict;
                        }
                    }
                    // Both query tasks are gone: timed out at the deadline, or ended early.
                    None if Instant::now() >= deadline => break state.expire(timeout),
                    None => break state.abandon(),
                },
                () = &mut expired => break state.expire(timeout),
            }
        };

        self.conclude(short_code, verdict)
    }

    fn conclude(&self, short_code: &str, verdict: Verdict) -> Result<LookupOutcome, ResolveError> {
        match verdict {
            Verdict::CacheHit(target) => {
                record_outcome("cache_hit");
                Ok(LookupOutcome::Found(target))
            }
            Verdict::DurableHit { target, repair } => {
                record_outcome("durable_hit");
                if repair {
                    self.spawn_repair(short_code, &target);
                }
                Ok(LookupOutcome::Found(target))
            }
            Verdict::Absent => {
                record_outcome("not_found");
                Ok(LookupOutcome::NotFound)
            }
            Verdict::Failed(err) => {
                record_outcome(match err {
                    ResolveError::TierUnavailable { .. } => "tier_unavailable",
                    ResolveError::Timeout(_) => "timeout",
                });
                warn!(short_code, error = %err, "Resolution failed");
                Err(err)
            }
        }
    }

    /// Backfills the cache after a durable-only hit. Never awaited.
    fn spawn_repair(&self, short_code: &str, target: &str) {
        let cache = Arc::clone(&self.cache);
        let short_code = short_code.to_string();
        let target = target.to_string();

        tokio::spawn(async move {
            match cache.set_url(&short_code, &target).await {
                Ok(()) => {
                    metrics::counter!("cache_repairs_total", "result" => "ok").increment(1);
                    debug!(short_code = %short_code, "Cache repaired");
                }
                Err(e) => {
                    metrics::counter!("cache_repairs_total", "result" => "error").increment(1);
                    warn!(short_code = %short_code, error = %e, "Cache repair failed");
                }
            }
        });
    }
}

/// Runs one tier query bounded by `deadline` and delivers its answer.
///
/// A query still running at the deadline is dropped without sending.
fn spawn_query<F>(tier: Tier, deadline: Instant, tx: mpsc::Sender<TierAnswer>, query: F)
where
    F: Future<Output = TierReply> + Send + 'static,
{
    tokio::spawn(async move {
        if let Ok(reply) = time::timeout_at(deadline, query).await {
            // The receiver is gone once the caller has its answer.
            let _ = tx.send(TierAnswer { tier, reply }).await;
        }
    });
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("resolve_outcomes_total", "outcome" => outcome).increment(1);
}
