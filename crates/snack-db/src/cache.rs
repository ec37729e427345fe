//! # Redis Report Cache
//!
//! Cache-aside storage for sales reports, one JSON value per date range.
//!
//! ## Key Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  report:{start}:{end}        → SalesReport as JSON, with TTL           │
//! │                                                                         │
//! │  report:2025-10-01:2025-10-31                                          │
//! │  report:2025-10-22:2025-10-22                                          │
//! │                                                                         │
//! │  invalidate(Range)       DEL report:{start}:{end}                      │
//! │  invalidate(AllReports)  SCAN MATCH report:* → DEL (batched)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads and writes go through a `ConnectionManager`, which reconnects on
//! its own after Redis restarts.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use snack_core::{SalesReport, DATE_FORMAT};
use snack_workflow::{CacheScope, ReportCache, StoreResult};

use crate::error::{CacheError, CacheResult};

/// Pattern matching every cached report key.
pub const REPORT_KEY_PATTERN: &str = "report:*";

/// Keys fetched per SCAN round trip.
const SCAN_BATCH: usize = 100;

/// Cache key for the report over `[start, end]`.
pub fn report_key(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "report:{}:{}",
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT)
    )
}

/// Report cache backed by Redis.
#[derive(Clone)]
pub struct RedisReportCache {
    conn: ConnectionManager,
}

impl RedisReportCache {
    /// Connects to `url` (e.g. `redis://localhost:6379`).
    pub async fn new(url: &str) -> CacheResult<Self> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client).await?;

        debug!("Redis report cache connected");
        Ok(RedisReportCache { conn })
    }

    pub async fn fetch(&self, start: NaiveDate, end: NaiveDate) -> CacheResult<Option<SalesReport>> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(report_key(start, end)).await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Stores `report` with a TTL of at least one second.
    pub async fn store(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        report: &SalesReport,
        ttl: Duration,
    ) -> CacheResult<()> {
        let payload = serde_json::to_string(report)?;
        let mut conn = self.conn.clone();

        let _: () = conn
            .set_ex(report_key(start, end), payload, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    /// Deletes the keys in `scope`, returning how many existed.
    pub async fn evict(&self, scope: CacheScope) -> CacheResult<u64> {
        let mut conn = self.conn.clone();

        match scope {
            CacheScope::Range { start, end } => {
                let removed: u64 = conn.del(report_key(start, end)).await?;
                Ok(removed)
            }
            CacheScope::AllReports => {
                let mut cursor: u64 = 0;
                let mut removed: u64 = 0;

                loop {
                    let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(REPORT_KEY_PATTERN)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn)
                        .await?;

                    if !keys.is_empty() {
                        let deleted: u64 = conn.del(&keys).await?;
                        removed += deleted;
                    }

                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }

                debug!(removed, "Report cache flushed");
                Ok(removed)
            }
        }
    }
}

#[async_trait]
impl ReportCache for RedisReportCache {
    async fn get(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Option<SalesReport>> {
        Ok(self.fetch(start, end).await?)
    }

    async fn set(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        report: &SalesReport,
        ttl: Duration,
    ) -> StoreResult<()> {
        Ok(self.store(start, end, report, ttl).await?)
    }

    async fn invalidate(&self, scope: CacheScope) -> StoreResult<u64> {
        Ok(self.evict(scope).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[test]
    fn test_report_key_layout() {
        assert_eq!(report_key(day(1), day(31)), "report:2025-10-01:2025-10-31");
        assert_ne!(report_key(day(1), day(2)), report_key(day(2), day(1)));
    }

    #[test]
    fn test_pattern_matches_keys() {
        let prefix = REPORT_KEY_PATTERN.trim_end_matches('*');
        assert!(report_key(day(5), day(5)).starts_with(prefix));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis (REDIS_URL)"]
    async fn test_store_fetch_evict() {
        let url = std::env::var("REDIS_URL").unwrap();
        let cache = RedisReportCache::new(&url).await.unwrap();
        let report = SalesReport::empty(day(3), day(4));

        cache
            .store(day(3), day(4), &report, Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(cache.fetch(day(3), day(4)).await.unwrap(), Some(report));

        let removed = cache
            .evict(CacheScope::Range { start: day(3), end: day(4) })
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cache.fetch(day(3), day(4)).await.unwrap(), None);
    }
}
