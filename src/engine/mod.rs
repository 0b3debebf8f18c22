mod service;

pub use service::{ServiceClient, ServiceError};

use crate::model::{PredictionReport, RequestConfig, SelectedPhoto};
use anyhow::Result;
use std::time::Instant;

/// Runs prediction cycles against the inference service. One engine is
/// built per process and cloned into each cycle's task; the underlying
/// connection pool is shared.
#[derive(Clone)]
pub struct PredictEngine {
    client: ServiceClient,
}

impl PredictEngine {
    pub fn new(cfg: &RequestConfig) -> Result<Self> {
        Ok(Self {
            client: ServiceClient::new(cfg)?,
        })
    }

    /// Execute one prediction cycle: upload the photo, decode the reply,
    /// and stamp the completed report.
    pub async fn run(&self, photo: &SelectedPhoto) -> Result<PredictionReport, ServiceError> {
        let started = Instant::now();
        let response = self.client.predict(photo).await?;
        Ok(PredictionReport {
            timestamp_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            file_name: photo.file_name.clone(),
            service_url: self.client.service_url().to_string(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            predictions: response.predictions,
            breed_analysis: response.breed_analysis,
        })
    }
}
