//! # Energy Telemetry DTOs
//!
//! Sensor readings and the aggregates the server computes from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Chart window selected in the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Hourly buckets
    #[default]
    Today,
    /// Daily buckets
    Week,
    /// Weekly buckets
    Month,
}

impl TimeRange {
    pub fn all() -> &'static [TimeRange] {
        &[TimeRange::Today, TimeRange::Week, TimeRange::Month]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Today => "today",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
        }
    }

    /// Number of chart buckets for this range.
    pub fn bucket_count(&self) -> usize {
        match self {
            TimeRange::Today => 24,
            TimeRange::Week => 7,
            TimeRange::Month => 4,
        }
    }
}

/// Single sensor sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReading {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub production_kwh: f64,
    pub consumption_kwh: f64,
    #[serde(default)]
    pub grid_export_kwh: f64,
    #[serde(default)]
    pub grid_import_kwh: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
}

impl EnergyReading {
    pub fn net_kwh(&self) -> f64 {
        self.production_kwh - self.consumption_kwh
    }
}

/// Today's aggregate, computed server-side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_production_kwh: f64,
    pub total_consumption_kwh: f64,
    #[serde(default)]
    pub net_export_kwh: f64,
    #[serde(default)]
    pub peak_production_kwh: f64,
    #[serde(default)]
    pub self_sufficiency_pct: f64,
    #[serde(default)]
    pub earnings: f64,
}

/// Aggregate statistics for a [`TimeRange`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyStats {
    pub range: TimeRange,
    pub total_production_kwh: f64,
    pub total_consumption_kwh: f64,
    #[serde(default)]
    pub average_daily_production_kwh: f64,
    #[serde(default)]
    pub carbon_offset_kg: f64,
    #[serde(default)]
    pub savings: f64,
}
