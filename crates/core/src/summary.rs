//! Summary aggregation
//!
//! For a bounded date range, buckets each local day's merged durations into
//! project and language totals with percentages of the day's tracked time.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use tempo_domain::constants::{DEFAULT_BUCKET_LABEL, MAX_SUMMARY_SPAN_DAYS};
use tempo_domain::{Result, Summary, SummaryBucket, SummaryRange, TempoError};
use tracing::debug;
use uuid::Uuid;

use crate::durations::{merge_spans, MergeScope};
use crate::ports::HeartbeatStore;
use crate::timezone;

/// Day-bucketed summary aggregation over a store window.
pub struct SummaryService {
    store: Arc<dyn HeartbeatStore>,
}

impl SummaryService {
    /// Create a new summary service backed by the given store.
    pub fn new(store: Arc<dyn HeartbeatStore>) -> Self {
        Self { store }
    }

    /// One [`Summary`] per calendar day in `[start_date, end_date]`.
    ///
    /// Fails with `InvalidRange` before any store access when the range is
    /// inverted or its inclusive span exceeds 31 days. A day without
    /// heartbeats yields a summary with zero totals and empty buckets,
    /// never an error.
    pub async fn compute_summary(
        &self,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Summary>> {
        let span_days = validate_range(start_date, end_date)?;

        let tz = self.store.fetch_user_timezone(user_id).await?;
        let mut summaries = Vec::with_capacity(span_days as usize);

        for date in start_date.iter_days().take(span_days as usize) {
            summaries.push(self.summary_for_day(user_id, date, &tz).await?);
        }

        debug!(%user_id, days = summaries.len(), "computed summary range");
        Ok(summaries)
    }

    async fn summary_for_day(&self, user_id: Uuid, date: NaiveDate, tz: &str) -> Result<Summary> {
        let (start_ts, end_ts) = timezone::local_day_to_utc_window(date, tz)?;

        let rows = self.store.fetch_window(user_id, start_ts, end_ts, false).await?;
        let durations = merge_spans(&rows, MergeScope::Project);

        let mut projects = BucketCounter::default();
        let mut languages = BucketCounter::default();
        let mut grand_total = 0.0;

        for duration in &durations {
            let seconds = duration.seconds();
            projects.add(bucket_label(duration.project.as_deref()), seconds);
            languages.add(bucket_label(duration.language.as_deref()), seconds);
            grand_total += seconds;
        }

        Ok(Summary {
            range: SummaryRange { date, start: start_ts, end: end_ts },
            grand_total_seconds: grand_total,
            projects: projects.into_buckets(grand_total),
            languages: languages.into_buckets(grand_total),
        })
    }
}

fn validate_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<i64> {
    if start_date > end_date {
        return Err(TempoError::InvalidRange(format!(
            "start date {start_date} is after end date {end_date}"
        )));
    }

    let span_days = (end_date - start_date).num_days() + 1;
    if span_days > MAX_SUMMARY_SPAN_DAYS {
        return Err(TempoError::InvalidRange(format!(
            "{span_days} days requested, maximum is {MAX_SUMMARY_SPAN_DAYS}"
        )));
    }

    Ok(span_days)
}

fn bucket_label(name: Option<&str>) -> &str {
    name.unwrap_or(DEFAULT_BUCKET_LABEL)
}

/// Totals keyed by name, preserving first-insertion order so that equal
/// totals sort deterministically.
#[derive(Default)]
struct BucketCounter {
    entries: Vec<(String, f64)>,
}

impl BucketCounter {
    fn add(&mut self, name: &str, seconds: f64) {
        match self.entries.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, total)) => *total += seconds,
            None => self.entries.push((name.to_string(), seconds)),
        }
    }

    /// Buckets sorted by descending seconds. The sort is stable, so ties
    /// keep the order in which each name first appeared.
    fn into_buckets(mut self, grand_total: f64) -> Vec<SummaryBucket> {
        self.entries
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        self.entries
            .into_iter()
            .map(|(name, total_seconds)| SummaryBucket {
                name,
                percent: percent_of(total_seconds, grand_total),
                total_seconds,
            })
            .collect()
    }
}

/// `round(seconds / grand_total, 2) * 100`, computed at the percent scale.
/// Ties round to even so exact half-hundredths (0.125 of the total) land on
/// the same value as rounding the ratio to two decimals first.
fn percent_of(seconds: f64, grand_total: f64) -> f64 {
    if grand_total <= 0.0 {
        return 0.0;
    }
    (seconds / grand_total * 100.0).round_ties_even()
}
