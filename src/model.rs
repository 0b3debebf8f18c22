use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Fixed alert shown for any failed prediction cycle. The underlying
/// cause goes to tracing output, never to the user.
#[cfg(feature = "tui")]
pub const ERROR_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub service_url: String,
    pub user_agent: String,
}

/// A photo chosen by the user. The raw bytes are held for the lifetime
/// of the selection so re-running a prediction never re-reads the disk.
#[derive(Debug, Clone)]
pub struct SelectedPhoto {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: &'static str,
    pub data: Bytes,
}

/// One breed guess from the service. Responses arrive sorted by
/// confidence descending and the client preserves that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub breed: String,
    pub confidence: f64,
}

/// Wire shape of a successful service reply. Absent or null fields
/// decode to their defaults instead of failing; unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub breed_analysis: Option<serde_json::Value>,
}

/// serde's `default` covers absent fields only; the service also sends
/// an explicit `null` for fields it has no value for.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// One completed prediction cycle, as shown in the TUI and printed by
/// `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub timestamp_utc: String,
    pub file_name: String,
    pub service_url: String,
    pub elapsed_ms: u64,
    pub predictions: Vec<Prediction>,
    /// Opaque analysis payload, rendered verbatim. The schema belongs to
    /// the service and is not interpreted here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed_analysis: Option<serde_json::Value>,
}

/// Lifecycle of the prediction request the view currently cares about.
#[cfg(feature = "tui")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

#[cfg(feature = "tui")]
impl RequestPhase {
    pub fn is_loading(self) -> bool {
        matches!(self, RequestPhase::Loading)
    }
}

/// Events emitted by the orchestrator for presentation layers. Every
/// event carries the cycle number it belongs to so consumers can ignore
/// completions that a newer cycle has superseded.
#[cfg(feature = "tui")]
#[derive(Debug, Clone)]
pub enum PredictEvent {
    Started {
        seq: u64,
        file_name: String,
    },
    Completed {
        seq: u64,
        // Box to keep PredictEvent size small; the report carries the
        // full predictions list and analysis payload.
        report: Box<PredictionReport>,
    },
    Failed {
        seq: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_json_omits_absent_analysis() {
        let report = PredictionReport {
            timestamp_utc: "2025-01-01T00:00:00Z".into(),
            file_name: "dog.jpg".into(),
            service_url: "http://localhost:5001/service".into(),
            elapsed_ms: 120,
            predictions: vec![Prediction {
                breed: "Beagle".into(),
                confidence: 0.42,
            }],
            breed_analysis: None,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("breed_analysis"));
        assert!(json.contains("\"breed\":\"Beagle\""));
    }

    #[test]
    fn report_json_keeps_analysis_verbatim() {
        let report = PredictionReport {
            timestamp_utc: "2025-01-01T00:00:00Z".into(),
            file_name: "dog.jpg".into(),
            service_url: "http://localhost:5001/service".into(),
            elapsed_ms: 120,
            predictions: Vec::new(),
            breed_analysis: Some(serde_json::json!({ "temperament": "friendly" })),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"temperament\":\"friendly\""));
    }
}
