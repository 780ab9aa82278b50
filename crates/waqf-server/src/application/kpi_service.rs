//! KPI Application Service
//!
//! Issues the nine slice reads concurrently and reduces them into one
//! snapshot. A failed read zeroes its slice and is listed in
//! `failed_slices`; nothing is retried. Complete snapshots are cached
//! until a dependent table changes or the entry goes stale.

use std::sync::Arc;

use chrono::Utc;

use waqf::domain::services::kpi::{self, KpiSlice};
use waqf::{DomainError, KpiReader, KpiSnapshot};

use crate::cache::QueryCache;

pub const KPI_CACHE_KEY: &str = "kpi:unified";

/// Tables whose changes invalidate the snapshot
const KPI_TABLES: &[&str] = &[
    "beneficiaries",
    "properties",
    "contracts",
    "rental_payments",
    "journal_entries",
    "journal_lines",
    "accounts",
    "funds",
    "loans",
    "beneficiary_requests",
    "distributions",
];

pub struct KpiService<K: KpiReader> {
    reader: Arc<K>,
    cache: QueryCache,
}

/// Reduce a slice read, or fall back to the zeroed slice and note the failure
fn reduce_slice<R, T: Default>(
    slice: KpiSlice,
    rows: Result<Vec<R>, DomainError>,
    failed: &mut Vec<KpiSlice>,
    reduce: impl FnOnce(&[R]) -> T,
) -> T {
    match rows {
        Ok(rows) => reduce(&rows),
        Err(e) => {
            tracing::warn!("⚠️  KPI slice {slice} failed: {e}");
            failed.push(slice);
            T::default()
        }
    }
}

impl<K: KpiReader> KpiService<K> {
    pub fn new(reader: Arc<K>, cache: QueryCache) -> Self {
        Self { reader, cache }
    }

    /// Cached snapshot, computed on a miss
    pub async fn snapshot(&self) -> KpiSnapshot {
        if let Some(snapshot) = self.cache.get::<KpiSnapshot>(KPI_CACHE_KEY) {
            return snapshot;
        }
        self.compute_and_store().await
    }

    /// Drop the cached snapshot and recompute
    pub async fn refresh(&self) -> KpiSnapshot {
        self.cache.invalidate(KPI_CACHE_KEY);
        self.compute_and_store().await
    }

    async fn compute_and_store(&self) -> KpiSnapshot {
        let snapshot = self.compute().await;
        if snapshot.is_partial() {
            tracing::warn!(
                "KPI snapshot is partial ({} failed slices), not caching",
                snapshot.failed_slices.len()
            );
        } else {
            self.cache.put(KPI_CACHE_KEY, KPI_TABLES, &snapshot);
        }
        snapshot
    }

    pub async fn compute(&self) -> KpiSnapshot {
        let reader = &self.reader;
        let (beneficiaries, properties, contracts, payments, lines, funds, loans, requests, distributions) = tokio::join!(
            reader.beneficiaries(),
            reader.properties(),
            reader.contracts(),
            reader.payments(),
            reader.posted_lines(),
            reader.funds(),
            reader.loans(),
            reader.requests(),
            reader.distributions(),
        );

        let today = Utc::now().date_naive();
        let mut failed = Vec::new();
        let mut snapshot = KpiSnapshot::empty(Utc::now());

        snapshot.beneficiaries = reduce_slice(
            KpiSlice::Beneficiaries,
            beneficiaries,
            &mut failed,
            kpi::reduce_beneficiaries,
        );
        snapshot.properties =
            reduce_slice(KpiSlice::Properties, properties, &mut failed, kpi::reduce_properties);
        snapshot.contracts = reduce_slice(KpiSlice::Contracts, contracts, &mut failed, |rows| {
            kpi::reduce_contracts(rows, today)
        });
        snapshot.collections = reduce_slice(KpiSlice::Payments, payments, &mut failed, |rows| {
            kpi::reduce_payments(rows, today)
        });
        snapshot.income = reduce_slice(KpiSlice::Journal, lines, &mut failed, kpi::reduce_journal);
        snapshot.funds = reduce_slice(KpiSlice::Funds, funds, &mut failed, kpi::reduce_funds);
        snapshot.loans = reduce_slice(KpiSlice::Loans, loans, &mut failed, |rows| {
            kpi::reduce_loans(rows, today)
        });
        snapshot.requests =
            reduce_slice(KpiSlice::Requests, requests, &mut failed, kpi::reduce_requests);
        snapshot.distributions = reduce_slice(
            KpiSlice::Distributions,
            distributions,
            &mut failed,
            kpi::reduce_distributions,
        );
        snapshot.failed_slices = failed;

        tracing::debug!(
            "Computed KPI snapshot ({} beneficiaries, {} properties)",
            snapshot.beneficiaries.total_beneficiaries,
            snapshot.properties.total_properties
        );
        snapshot
    }
}
