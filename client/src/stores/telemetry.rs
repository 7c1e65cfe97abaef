//! # Telemetry Store
//!
//! Latest sensor reading, history for the selected time range, today's
//! summary and range statistics.
//!
//! Chart buckets are bound by position: bucket `i` is `readings[i]`. The
//! server returns history already aligned to the range's granularity
//! (hourly for today, daily for the week, weekly for the month). Missing
//! buckets render as zero.

use super::sequence::Sequencer;
use super::{settle, EventSink, SessionScoped};
use crate::app::events::StoreEvent;
use crate::core::service::ApiService;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::{ApiEnvelope, DailySummary, EnergyReading, EnergyStats, TimeRange};
use std::sync::Arc;

/// Upper bound on cached history samples
pub const MAX_CACHED_READINGS: usize = 500;

/// Snapshot of the telemetry slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryState {
    pub latest_reading: Option<EnergyReading>,
    pub readings: Vec<EnergyReading>,
    pub daily_summary: Option<DailySummary>,
    pub stats: Option<EnergyStats>,
    pub selected_time_range: TimeRange,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub error: Option<String>,
    /// Time of the last committed history fetch
    pub last_updated: Option<DateTime<Utc>>,
    pub version: u64,
    loading: u32,
    refresh_depth: u32,
}

/// Chart-ready series for the selected range
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub range: TimeRange,
    pub labels: Vec<String>,
    pub production: Vec<f64>,
    pub consumption: Vec<f64>,
}

impl ChartSeries {
    /// Build the series for `range` from positionally aligned readings.
    pub fn from_readings(range: TimeRange, readings: &[EnergyReading]) -> Self {
        let buckets = range.bucket_count();
        let labels = (0..buckets).map(|i| bucket_label(range, i)).collect();
        let value = |i: usize, pick: fn(&EnergyReading) -> f64| readings.get(i).map_or(0.0, pick);

        Self {
            range,
            labels,
            production: (0..buckets).map(|i| value(i, |r| r.production_kwh)).collect(),
            consumption: (0..buckets).map(|i| value(i, |r| r.consumption_kwh)).collect(),
        }
    }

    pub fn total_production(&self) -> f64 {
        self.production.iter().sum()
    }

    pub fn total_consumption(&self) -> f64 {
        self.consumption.iter().sum()
    }
}

fn bucket_label(range: TimeRange, index: usize) -> String {
    match range {
        TimeRange::Today => format!("{:02}:00", index),
        TimeRange::Week => format!("Day {}", index + 1),
        TimeRange::Month => format!("Week {}", index + 1),
    }
}

pub struct TelemetryStore {
    api: Arc<dyn ApiService>,
    state: RwLock<TelemetryState>,
    latest_seq: Sequencer,
    history_seq: Sequencer,
    summary_seq: Sequencer,
    stats_seq: Sequencer,
    /// Advanced by cancel_pending and reset; owns the loading counter
    loading_epoch: Sequencer,
    generation: Sequencer,
    events: EventSink,
}

impl TelemetryStore {
    pub fn new(api: Arc<dyn ApiService>, events: EventSink) -> Self {
        Self {
            api,
            state: RwLock::new(TelemetryState::default()),
            latest_seq: Sequencer::new(),
            history_seq: Sequencer::new(),
            summary_seq: Sequencer::new(),
            stats_seq: Sequencer::new(),
            loading_epoch: Sequencer::new(),
            generation: Sequencer::new(),
            events,
        }
    }

    pub fn state(&self) -> TelemetryState {
        self.state.read().clone()
    }

    fn update(&self, f: impl FnOnce(&mut TelemetryState)) {
        let version = {
            let mut state = self.state.write();
            f(&mut *state);
            state.version += 1;
            state.version
        };
        self.events.emit(StoreEvent::TelemetryChanged { version });
    }

    fn commit(&self, seq: &Sequencer, token: u64, f: impl FnOnce(&mut TelemetryState)) -> bool {
        let version = {
            let mut state = self.state.write();
            if !seq.is_current(token) {
                return false;
            }
            f(&mut *state);
            state.version += 1;
            state.version
        };
        self.events.emit(StoreEvent::TelemetryChanged { version });
        true
    }

    /// Run one fetch: raise the loading counter, await the gateway and
    /// commit the outcome if `seq` still considers it current.
    async fn fetch<T>(
        &self,
        seq: &Sequencer,
        call: impl std::future::Future<Output = crate::core::error::Result<ApiEnvelope<T>>>,
        fallback: &str,
        apply: impl FnOnce(&mut TelemetryState, T),
    ) {
        let token = seq.issue();
        let (epoch, version) = {
            let mut state = self.state.write();
            state.loading += 1;
            state.is_loading = true;
            state.version += 1;
            (self.loading_epoch.current(), state.version)
        };
        self.events.emit(StoreEvent::TelemetryChanged { version });

        let outcome = settle(call.await, fallback, ApiEnvelope::into_payload);

        // The loading counter belongs to the epoch, whatever happens to the
        // token
        let version = {
            let mut state = self.state.write();
            if !self.loading_epoch.is_current(epoch) {
                return;
            }
            state.loading = state.loading.saturating_sub(1);
            state.is_loading = state.loading > 0;
            if seq.is_current(token) {
                match outcome {
                    Ok(value) => apply(&mut *state, value),
                    Err(message) => state.error = Some(message),
                }
            }
            state.version += 1;
            state.version
        };
        self.events.emit(StoreEvent::TelemetryChanged { version });
    }

    pub async fn fetch_latest_reading(&self) {
        self.fetch(
            &self.latest_seq,
            self.api.get_latest_reading(),
            "Failed to load the latest reading",
            |state, reading| state.latest_reading = Some(reading),
        )
        .await;
    }

    /// Fetch history for `range`, keeping at most [`MAX_CACHED_READINGS`].
    pub async fn fetch_history(&self, range: TimeRange) {
        self.fetch(
            &self.history_seq,
            self.api.get_history(range),
            "Failed to load energy history",
            move |state, mut readings| {
                if readings.len() > MAX_CACHED_READINGS {
                    tracing::debug!(received = readings.len(), "Truncating history");
                    readings.truncate(MAX_CACHED_READINGS);
                }
                state.readings = readings;
                state.last_updated = Some(Utc::now());
            },
        )
        .await;
    }

    pub async fn fetch_today_summary(&self) {
        self.fetch(
            &self.summary_seq,
            self.api.get_today_summary(),
            "Failed to load today's summary",
            |state, summary| state.daily_summary = Some(summary),
        )
        .await;
    }

    pub async fn fetch_stats(&self, range: TimeRange) {
        self.fetch(
            &self.stats_seq,
            self.api.get_stats(range),
            "Failed to load energy statistics",
            |state, stats| state.stats = Some(stats),
        )
        .await;
    }

    /// Select a chart range and re-fetch history and stats for it. Selecting
    /// the current range does nothing.
    pub async fn set_time_range(&self, range: TimeRange) {
        if self.state.read().selected_time_range == range {
            return;
        }
        tracing::debug!(range = range.as_str(), "Time range changed");
        self.update(|state| state.selected_time_range = range);

        tokio::join!(self.fetch_history(range), self.fetch_stats(range));
    }

    /// Latest reading and history for the selected range, concurrently.
    /// `is_refreshing` stays up until both have settled.
    pub async fn refresh(&self) {
        let (generation, range, version) = {
            let mut state = self.state.write();
            state.refresh_depth += 1;
            state.is_refreshing = true;
            state.version += 1;
            (
                self.generation.current(),
                state.selected_time_range,
                state.version,
            )
        };
        self.events.emit(StoreEvent::TelemetryChanged { version });

        tokio::join!(self.fetch_latest_reading(), self.fetch_history(range));

        self.commit(&self.generation, generation, |state| {
            state.refresh_depth = state.refresh_depth.saturating_sub(1);
            state.is_refreshing = state.refresh_depth > 0;
        });
    }

    /// Chart series for the selected range.
    pub fn chart_series(&self) -> ChartSeries {
        let state = self.state.read();
        ChartSeries::from_readings(state.selected_time_range, &state.readings)
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    /// Discard every in-flight response and drop the loading flag.
    pub fn cancel_pending(&self) {
        let version = {
            let mut state = self.state.write();
            self.latest_seq.invalidate();
            self.history_seq.invalidate();
            self.summary_seq.invalidate();
            self.stats_seq.invalidate();
            self.loading_epoch.invalidate();
            state.loading = 0;
            state.is_loading = false;
            state.version += 1;
            state.version
        };
        self.events.emit(StoreEvent::TelemetryChanged { version });
    }
}

impl SessionScoped for TelemetryStore {
    fn reset(&self) {
        self.cancel_pending();
        self.generation.invalidate();
        self.update(|state| {
            let version = state.version;
            *state = TelemetryState {
                version,
                ..TelemetryState::default()
            };
        });
        tracing::debug!("Telemetry reset");
    }
}
