use crate::domain::values::record_status::RecordStatus;
use serde::{Deserialize, Serialize};

/// A security recommendation as served by the backend.
///
/// Read-only on the client. `status` is not part of the wire payload; it is
/// stamped from the list the record was fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    #[serde(rename = "recommendationId")]
    pub id: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    /// 0-100, possibly fractional.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub provider: Vec<u32>,
    #[serde(default)]
    pub frameworks: Vec<Framework>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub further_reading: Vec<FurtherReading>,
    #[serde(default)]
    pub total_historical_violations: u64,
    #[serde(default)]
    pub affected_resources: Vec<AffectedResource>,
    #[serde(default)]
    pub impact_assessment: Option<ImpactAssessment>,
    #[serde(default)]
    pub class: Option<u32>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Framework {
    pub name: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub subsection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurtherReading {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedResource {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    #[serde(default)]
    pub total_violations: u64,
    #[serde(default)]
    pub most_impacted_scope: Option<ImpactedScope>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactedScope {
    pub name: String,
    #[serde(rename = "type")]
    pub scope_type: String,
    pub count: u64,
}
