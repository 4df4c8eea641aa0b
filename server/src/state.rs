use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::store::ProfileStore;

#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileStore,
    /// Lowercased header carrying the identity asserted by the auth gateway.
    pub auth_header: Arc<str>,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    calc_requests_total: AtomicU64,
    profile_reads_total: AtomicU64,
    profile_writes_total: AtomicU64,
    unauthorized_total: AtomicU64,
    store_failures_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub calc_requests_total: u64,
    pub profile_reads_total: u64,
    pub profile_writes_total: u64,
    pub unauthorized_total: u64,
    pub store_failures_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            calc_requests_total: self.calc_requests_total.load(Ordering::Relaxed),
            profile_reads_total: self.profile_reads_total.load(Ordering::Relaxed),
            profile_writes_total: self.profile_writes_total.load(Ordering::Relaxed),
            unauthorized_total: self.unauthorized_total.load(Ordering::Relaxed),
            store_failures_total: self.store_failures_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_calc_request(&self) {
        self.calc_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_profile_read(&self) {
        self.profile_reads_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_profile_write(&self) {
        self.profile_writes_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unauthorized(&self) {
        self.unauthorized_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_failure(&self) {
        self.store_failures_total.fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new(profiles: ProfileStore, auth_header: &str) -> Self {
        Self {
            profiles,
            auth_header: Arc::from(auth_header.to_ascii_lowercase()),
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }

    /// In-memory store behind the default identity header.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(
            ProfileStore::memory(),
            crate::config::DEFAULT_AUTH_USER_HEADER,
        )
    }
}
