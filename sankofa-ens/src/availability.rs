//! Debounced label availability checks.
//!
//! Typing produces a stream of labels; only the label that survives the
//! debounce window is looked up, and only the answer for the latest such
//! label is ever applied to the visible state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use sankofa_cache::{CacheConfig, TtlCache};
use sankofa_core::constants::{
    AVAILABILITY_DEBOUNCE, CACHE_TTL, MIN_LABEL_LENGTH, MSG_AVAILABILITY_FAILED,
};
use sankofa_core::traits::RegistrarReader;
use sankofa_core::types::{AvailabilityState, AvailabilityStatus};
use sankofa_core::validation::check_label;

use crate::names::full_name;

/// Availability checker configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Input inactivity before querying, in milliseconds
    pub debounce_ms: u64,
    /// Lifetime of cached verdicts, in milliseconds
    pub cache_ttl_ms: u64,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            debounce_ms: AVAILABILITY_DEBOUNCE.as_millis() as u64,
            cache_ttl_ms: CACHE_TTL.as_millis() as u64,
        }
    }
}

/// Removes a label from the in-flight set when the query ends or is dropped.
struct InFlightLabel<'a> {
    set: &'a DashSet<String>,
    label: &'a str,
}

impl Drop for InFlightLabel<'_> {
    fn drop(&mut self) {
        self.set.remove(self.label);
    }
}

impl AvailabilityConfig {
    fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Availability checker for one input field.
///
/// # Ordering
///
/// - Each [`check`](Self::check) takes a generation number; after the
///   debounce sleep it gives up if a newer call arrived.
/// - A label with a query already outstanding is not queried again.
/// - A query result is applied only if its label is still the current one.
pub struct AvailabilityChecker {
    registrar: Arc<dyn RegistrarReader>,
    cache: TtlCache<bool>,
    config: AvailabilityConfig,
    generation: AtomicU64,
    in_flight: DashSet<String>,
    state: RwLock<AvailabilityState>,
    queries: AtomicU64,
}

impl AvailabilityChecker {
    /// Creates a checker with default timing (500 ms debounce, 30 s cache).
    pub fn new(registrar: Arc<dyn RegistrarReader>) -> Self {
        Self::with_config(registrar, AvailabilityConfig::default())
    }

    /// Creates a checker with custom timing.
    pub fn with_config(registrar: Arc<dyn RegistrarReader>, config: AvailabilityConfig) -> Self {
        let cache = TtlCache::with_config(CacheConfig::with_ttl(Duration::from_millis(
            config.cache_ttl_ms,
        )));

        Self {
            registrar,
            cache,
            config,
            generation: AtomicU64::new(0),
            in_flight: DashSet::new(),
            state: RwLock::new(AvailabilityState::default()),
            queries: AtomicU64::new(0),
        }
    }

    /// Feeds a new input value.
    ///
    /// Resolves after the debounce window. If a newer value arrived in the
    /// meantime this call changes nothing and returns the current snapshot.
    #[instrument(skip(self))]
    pub async fn check(&self, label: &str) -> AvailabilityState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.config.debounce()).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(label, "Superseded by newer input");
            return self.state();
        }

        self.settle(label).await
    }

    /// Checks immediately, skipping the debounce window.
    ///
    /// Pending debounced calls are superseded.
    #[instrument(skip(self))]
    pub async fn check_now(&self, label: &str) -> AvailabilityState {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.settle(label).await
    }

    /// Makes `label` the current label and resolves its verdict.
    async fn settle(&self, label: &str) -> AvailabilityState {
        if label.chars().count() < MIN_LABEL_LENGTH {
            return self.replace_state(label, None, false, None);
        }

        if let Err(err) = check_label(label) {
            return self.replace_state(label, None, false, Some(err.to_string()));
        }

        if let Some(available) = self.cache.get(label) {
            debug!(label, available, "Cache hit");
            return self.replace_state(label, Some(available), false, None);
        }

        if !self.in_flight.insert(label.to_string()) {
            debug!(label, "Query already in flight");
            return self.replace_state(label, None, true, None);
        }

        let guard = InFlightLabel {
            set: &self.in_flight,
            label,
        };

        self.replace_state(label, None, true, None);
        self.queries.fetch_add(1, Ordering::SeqCst);

        let result = self.registrar.available(label).await;
        drop(guard);

        if let Ok(available) = result {
            self.cache.set(label, available);
        }

        let mut state = self.state.write();
        if state.label != label {
            debug!(label, current = %state.label, "Discarding stale result");
            return state.clone();
        }

        match result {
            Ok(available) => {
                debug!(label, available, "Availability resolved");
                state.available = Some(available);
                state.error = None;
            }
            Err(err) => {
                warn!(label, error = %err, "Availability check failed");
                state.available = None;
                state.error = Some(MSG_AVAILABILITY_FAILED.to_string());
            }
        }
        state.is_loading = false;
        state.clone()
    }

    fn replace_state(
        &self,
        label: &str,
        available: Option<bool>,
        is_loading: bool,
        error: Option<String>,
    ) -> AvailabilityState {
        let mut state = self.state.write();
        *state = AvailabilityState {
            label: label.to_string(),
            available,
            is_loading,
            error,
        };
        state.clone()
    }

    /// Current snapshot.
    pub fn state(&self) -> AvailabilityState {
        self.state.read().clone()
    }

    /// Displayable status for the current label.
    pub fn status(&self) -> AvailabilityStatus {
        let state = self.state.read();
        state.status(full_name(&state.label))
    }

    /// Returns true if `label` is current and known to be free.
    pub fn is_available(&self, label: &str) -> bool {
        self.state.read().is_available(label)
    }

    /// Clears the surfaced error.
    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    /// Drops all cached verdicts.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of registrar queries issued so far.
    pub fn queries_issued(&self) -> u64 {
        self.queries.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use sankofa_core::error::{Result, SankofaError};

    #[derive(Default)]
    struct MockRegistrar {
        taken: Vec<&'static str>,
        failing: Vec<&'static str>,
        delays: HashMap<&'static str, Duration>,
        calls: AtomicUsize,
        log: Mutex<Vec<String>>,
    }

    impl MockRegistrar {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RegistrarReader for MockRegistrar {
        async fn available(&self, label: &str) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().push(label.to_string());

            if let Some(delay) = self.delays.get(label) {
                tokio::time::sleep(*delay).await;
            }

            if self.failing.contains(&label) {
                return Err(SankofaError::RpcError("boom".into()));
            }

            Ok(!self.taken.contains(&label))
        }
    }

    fn checker(mock: &Arc<MockRegistrar>) -> Arc<AvailabilityChecker> {
        Arc::new(AvailabilityChecker::new(mock.clone()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_label_never_queries() {
        let mock = Arc::new(MockRegistrar::default());
        let checker = checker(&mock);

        let state = checker.check("al").await;

        assert_eq!(state.available, None);
        assert_eq!(state.error, None);
        assert!(!state.is_loading);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_available_label() {
        let mock = Arc::new(MockRegistrar::default());
        let checker = checker(&mock);

        let state = checker.check("alice").await;

        assert_eq!(state.available, Some(true));
        assert!(checker.is_available("alice"));
        assert_eq!(checker.status().to_string(), "alice.sankofachain.eth is available!");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_taken_label() {
        let mock = Arc::new(MockRegistrar {
            taken: vec!["alice"],
            ..Default::default()
        });
        let checker = checker(&mock);

        let state = checker.check("alice").await;

        assert_eq!(state.available, Some(false));
        assert!(!checker.is_available("alice"));
        assert_eq!(checker.status().short_message(), "Already taken");
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_label_reports_reason_without_query() {
        let mock = Arc::new(MockRegistrar::default());
        let checker = checker(&mock);

        let state = checker.check("-alice").await;

        assert_eq!(state.available, None);
        assert_eq!(
            state.error.as_deref(),
            Some("Label can only contain letters, numbers, and hyphens (not at start/end)")
        );
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_verdict_skips_query() {
        let mock = Arc::new(MockRegistrar::default());
        let checker = checker(&mock);

        checker.check("alice").await;
        checker.check("bob42").await;
        let state = checker.check("alice").await;

        assert_eq!(state.available, Some(true));
        assert_eq!(mock.calls(), 2);
        assert_eq!(checker.queries_issued(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expiry_requeries() {
        let mock = Arc::new(MockRegistrar::default());
        let config = AvailabilityConfig {
            debounce_ms: 0,
            cache_ttl_ms: 1,
        };
        let checker = AvailabilityChecker::with_config(mock.clone(), config);

        checker.check("alice").await;
        // Cache timestamps use the wall clock, not the paused runtime clock
        std::thread::sleep(Duration::from_millis(5));
        checker.check("alice").await;

        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_only_queries_latest_input() {
        let mock = Arc::new(MockRegistrar::default());
        let checker = checker(&mock);

        let (first, second, third) = tokio::join!(
            checker.check("ali"),
            checker.check("alic"),
            checker.check("alice"),
        );

        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.log.lock().as_slice(), ["alice".to_string()]);
        assert_eq!(third.label, "alice");
        // Superseded calls return whatever is current when they wake
        assert_ne!(first.label, "ali");
        assert_ne!(second.label, "alic");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_is_discarded() {
        let mut delays = HashMap::new();
        delays.insert("slowpoke", Duration::from_secs(1));
        let mock = Arc::new(MockRegistrar {
            taken: vec!["slowpoke"],
            delays,
            ..Default::default()
        });
        let checker = checker(&mock);

        let slow = tokio::spawn({
            let checker = checker.clone();
            async move { checker.check("slowpoke").await }
        });

        // Past the debounce window: the slow query is now outstanding
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(checker.state().is_loading);

        let fast = checker.check("speedy").await;
        assert_eq!(fast.label, "speedy");
        assert_eq!(fast.available, Some(true));

        let slow_state = slow.await.unwrap();
        assert_eq!(slow_state.label, "speedy");
        assert_eq!(checker.state().available, Some(true));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_label_not_queried_twice_concurrently() {
        let mut delays = HashMap::new();
        delays.insert("alice", Duration::from_millis(200));
        let mock = Arc::new(MockRegistrar {
            delays,
            ..Default::default()
        });
        let checker = checker(&mock);

        let (a, b) = tokio::join!(checker.check_now("alice"), checker.check_now("alice"));

        assert_eq!(mock.calls(), 1);
        assert!(b.is_loading || b.available == Some(true));
        assert_eq!(a.available, Some(true));
        assert_eq!(checker.state().available, Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_maps_to_unknown_and_is_not_cached() {
        let mock = Arc::new(MockRegistrar {
            failing: vec!["alice"],
            ..Default::default()
        });
        let checker = checker(&mock);

        let state = checker.check("alice").await;
        assert_eq!(state.available, None);
        assert_eq!(state.error.as_deref(), Some("Failed to check availability"));
        assert_eq!(mock.calls(), 1);

        checker.clear_error();
        assert_eq!(checker.state().error, None);

        // Retyping retries
        checker.check("alice").await;
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_query_can_be_retried() {
        let mut delays = HashMap::new();
        delays.insert("alice", Duration::from_secs(5));
        let mock = Arc::new(MockRegistrar {
            delays,
            ..Default::default()
        });
        let checker = checker(&mock);

        let cancelled =
            tokio::time::timeout(Duration::from_secs(1), checker.check_now("alice")).await;
        assert!(cancelled.is_err());
        assert_eq!(mock.calls(), 1);

        let state = checker.check_now("alice").await;

        assert_eq!(mock.calls(), 2);
        assert_eq!(state.available, Some(true));
        assert!(!state.is_loading);
    }
}
