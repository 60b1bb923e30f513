//! Short link creation on top of the resolution engine.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::application::services::resolution_engine::ResolutionEngine;
use crate::config::CollisionPolicy;
use crate::domain::entities::NewMapping;
use crate::domain::repositories::{MappingStore, StoreError};
use crate::domain::resolution::{CreateError, Created, LookupOutcome, ResolveError, Tier};
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::derive_code;

/// Creates and resolves short links across the cache and durable tiers.
///
/// Creation is idempotent: the code is derived from the target URL and looked
/// up before anything is written, so repeating a request returns the same code
/// without a second write.
pub struct LinkService {
    engine: Arc<ResolutionEngine>,
    cache: Arc<dyn CacheService>,
    store: Arc<dyn MappingStore>,
    collision_policy: CollisionPolicy,
}

impl LinkService {
    /// Creates a new link service over the two tiers.
    pub fn new(
        cache: Arc<dyn CacheService>,
        store: Arc<dyn MappingStore>,
        resolve_timeout: Duration,
        collision_policy: CollisionPolicy,
    ) -> Self {
        let engine = Arc::new(ResolutionEngine::new(
            Arc::clone(&cache),
            Arc::clone(&store),
            resolve_timeout,
        ));

        Self {
            engine,
            cache,
            store,
            collision_policy,
        }
    }

    /// Resolves a short code to its target URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when neither tier gave a definitive answer.
    pub async fn resolve(&self, short_code: &str) -> Result<LookupOutcome, ResolveError> {
        self.engine.resolve(short_code).await
    }

    /// Creates (or finds) the short code for `target_url`.
    ///
    /// `target_url` must already be validated. `expires_at` is stored with the
    /// durable row only.
    ///
    /// # Errors
    ///
    /// - [`CreateError::Lookup`] if the existence check was inconclusive; nothing is written
    /// - [`CreateError::Collision`] if the code belongs to another URL and the policy rejects
    /// - [`CreateError::PartialWrite`] if either tier write failed
    pub async fn create(
        &self,
        target_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Created, CreateError> {
        let code = derive_code(target_url);

        match self.engine.resolve(&code).await? {
            LookupOutcome::Found(existing) if existing == target_url => {
                return Ok(Created {
                    code,
                    existing: true,
                });
            }
            LookupOutcome::Found(existing) => {
                return match self.collision_policy {
                    CollisionPolicy::Reject => {
                        warn!(short_code = %code, target_url, existing = %existing, "Short code collision rejected");
                        metrics::counter!("code_collisions_total", "policy" => "reject")
                            .increment(1);
                        Err(CreateError::Collision { code })
                    }
                    CollisionPolicy::Reuse => {
                        warn!(short_code = %code, target_url, existing = %existing, "Short code collision, reusing existing mapping");
                        metrics::counter!("code_collisions_total", "policy" => "reuse")
                            .increment(1);
                        Ok(Created {
                            code,
                            existing: true,
                        })
                    }
                };
            }
            LookupOutcome::NotFound => {}
        }

        let new_mapping = NewMapping {
            short_code: code.clone(),
            target_url: target_url.to_string(),
            expires_at,
        };
        self.write_both(new_mapping).await?;

        info!(short_code = %code, target_url, "Short link created");
        Ok(Created {
            code,
            existing: false,
        })
    }

    /// Writes the mapping to both tiers concurrently and waits for both.
    ///
    /// The first failure observed is reported; the other write still runs to
    /// completion and is not rolled back.
    async fn write_both(&self, new_mapping: NewMapping) -> Result<(), CreateError> {
        let (tx, mut rx) = mpsc::channel::<(Tier, Result<(), String>)>(2);

        let cache = Arc::clone(&self.cache);
        let cache_tx = tx.clone();
        let code = new_mapping.short_code.clone();
        let target = new_mapping.target_url.clone();
        tokio::spawn(async move {
            let result = cache
                .set_url(&code, &target)
                .await
                .map_err(|e| e.to_string());
            let _ = cache_tx.send((Tier::Cache, result)).await;
        });

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let result = store.insert(&new_mapping).await.map_err(|e| match e {
                StoreError::Duplicate(_) => "short code already exists".to_string(),
                other => other.to_string(),
            });
            let _ = tx.send((Tier::Durable, result)).await;
        });

        let mut first_error: Option<(Tier, String)> = None;
        let mut reported = Vec::with_capacity(2);

        // Ends once both write tasks have dropped their senders.
        while let Some((tier, result)) = rx.recv().await {
            reported.push(tier);
            if let Err(reason) = result {
                warn!(tier = %tier, error = %reason, "Tier write failed");
                metrics::counter!("tier_write_failures_total", "tier" => tier.as_str())
                    .increment(1);
                first_error.get_or_insert((tier, reason));
            }
        }

        for tier in [Tier::Cache, Tier::Durable] {
            if !reported.contains(&tier) {
                first_error.get_or_insert((tier, "write task ended without a result".to_string()));
            }
        }

        match first_error {
            Some((tier, reason)) => Err(CreateError::PartialWrite { tier, reason }),
            None => Ok(()),
        }
    }

    /// Removes a mapping from both tiers.
    ///
    /// The durable delete decides the result; a cache invalidation failure is
    /// only logged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the durable delete fails.
    pub async fn delete(&self, short_code: &str) -> Result<bool, StoreError> {
        let deleted = self.store.delete(short_code).await?;

        if let Err(e) = self.cache.invalidate(short_code).await {
            warn!(short_code, error = %e, "Failed to invalidate cache entry");
        }

        Ok(deleted)
    }
}

/// Joins the public base URL and a short code.
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
