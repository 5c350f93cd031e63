use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// KPI figures for one site and date scope.
///
/// Every field is optional: `None` means the backend did not compute the
/// figure for this scope, which is not the same as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_sales: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fuel_volume: Option<f64>,
    /// Average pence per litre
    #[serde(default, rename = "avgPPL", skip_serializing_if = "Option::is_none")]
    pub avg_ppl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_sales: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_sales: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bunkered_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_bunkered_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<f64>,
}

impl MetricsResult {
    /// True when no figure at all is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Site {
    #[serde(deserialize_with = "deserialize_flexible_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDetail {
    #[serde(deserialize_with = "deserialize_flexible_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub city_display: Option<String>,
}

impl SiteDetail {
    /// City as it should be shown, preferring the display form.
    pub fn display_city(&self) -> Option<&str> {
        self.city_display.as_deref().or(self.city.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    #[serde(default, deserialize_with = "deserialize_optional_flexible_string")]
    pub site_id: Option<String>,
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One slice of the sales-distribution chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SalesSlice {
    pub name: String,
    pub value: f64,
}

/// Sales for one day of the date-wise chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySales {
    #[serde(deserialize_with = "deserialize_flexible_string")]
    pub day: String,
    pub sales: f64,
}

/// Where a bunkered/non-bunkered split came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeSource {
    Reported,
    Estimated,
}

/// How to split total fuel volume when the backend gives no breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeEstimatePolicy {
    /// Show nothing rather than guess.
    Omit,
    /// Assign a fixed share of total volume to bunkered sales.
    EstimatedSplit { bunkered_share: f64 },
}

impl Default for VolumeEstimatePolicy {
    fn default() -> Self {
        Self::EstimatedSplit {
            bunkered_share: Config::BUNKERED_ESTIMATE_SHARE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeBreakdown {
    pub bunkered: f64,
    pub non_bunkered: f64,
    pub source: VolumeSource,
}

impl VolumeBreakdown {
    /// Reported split when both halves are present, otherwise the policy's
    /// estimate from total volume.
    pub fn from_metrics(metrics: &MetricsResult, policy: VolumeEstimatePolicy) -> Option<Self> {
        if let (Some(bunkered), Some(non_bunkered)) =
            (metrics.bunkered_volume, metrics.non_bunkered_volume)
        {
            return Some(Self {
                bunkered,
                non_bunkered,
                source: VolumeSource::Reported,
            });
        }

        match policy {
            VolumeEstimatePolicy::Omit => None,
            VolumeEstimatePolicy::EstimatedSplit { bunkered_share } => {
                let total = metrics.total_fuel_volume?;
                let share = bunkered_share.clamp(0.0, 1.0);
                Some(Self {
                    bunkered: total * share,
                    non_bunkered: total * (1.0 - share),
                    source: VolumeSource::Estimated,
                })
            }
        }
    }

    pub fn total(&self) -> f64 {
        self.bunkered + self.non_bunkered
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Ids and day labels arrive as either JSON strings or numbers
fn deserialize_flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(Into::into)
}

fn deserialize_optional_flexible_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(Into::into))
}
