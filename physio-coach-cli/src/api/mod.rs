use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use physio_coach_core::{Pose, SessionSummary};

use crate::config::Config;

mod error;
mod retry;

pub use error::ApiError;
pub use retry::RetryConfig;

/// Frame analysis request payload
#[derive(Debug, Serialize)]
pub struct AnalyzeFrameRequest {
    pub image_base64: String,
    pub exercise_key: String,
}

/// Frame analysis response from the pose service. A response without
/// a pose is treated as "nothing detected", not an error.
#[derive(Debug, Deserialize)]
pub struct AnalyzeFrameResponse {
    #[serde(default)]
    pub pose: Pose,
}

/// Report generation request payload
#[derive(Debug, Serialize)]
pub struct ReportRequest {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub patient_name: String,
    pub patient_id: String,
    pub exercise: String,
    pub exercise_key: String,
    pub reps: u32,
    pub assigned_reps: u32,
    pub sets: u32,
    pub duration: u64,
    pub avg_time: f64,
    pub form_score: f64,
}

impl ReportRequest {
    pub fn from_summary(summary: &SessionSummary, patient_name: &str, patient_id: &str) -> Self {
        Self {
            session_id: summary.session_id,
            started_at: summary.started_at,
            patient_name: patient_name.to_string(),
            patient_id: patient_id.to_string(),
            exercise: summary.exercise.display_name().to_string(),
            exercise_key: summary.exercise.key().to_string(),
            reps: summary.total_reps,
            assigned_reps: summary.assigned_reps,
            sets: summary.sets,
            duration: summary.duration_seconds,
            avg_time: summary.avg_seconds_per_rep,
            form_score: summary.form_score,
        }
    }
}

/// Report generation response
#[derive(Debug, Deserialize)]
pub struct ReportResponse {
    pub url: String,
}

/// Client for the pose-estimation and report-generation services
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_retry_config(config, RetryConfig::default())
    }

    /// Create a new API client with custom retry configuration
    pub fn with_retry_config(config: &Config, retry_config: RetryConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);
        let base_url = config.api.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            retry_config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one frame to the pose service and get its keypoints back.
    ///
    /// Never retried: a failed frame is a missed sampling opportunity,
    /// the next tick will capture a fresh one.
    pub async fn analyze_frame(&self, image_base64: &str, exercise_key: &str) -> Result<Pose> {
        let url = format!("{}/analyze_frame", self.base_url);

        let request = AnalyzeFrameRequest {
            image_base64: image_base64.to_string(),
            exercise_key: exercise_key.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send frame analysis request")?;

        let status = response.status();

        if status.is_success() {
            let analyze_response: AnalyzeFrameResponse = response
                .json()
                .await
                .context("Failed to parse frame analysis response")?;

            tracing::debug!(
                keypoints = analyze_response.pose.keypoints.len(),
                "frame analyzed"
            );
            Ok(analyze_response.pose)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text).into())
        }
    }

    /// Ask the report service to build the end-of-session report.
    ///
    /// Retried with exponential backoff; the report is the one request
    /// worth surviving a transient network hiccup.
    pub async fn generate_report(&self, report: &ReportRequest) -> Result<ReportResponse> {
        let url = format!("{}/generate_report", self.base_url);

        tracing::debug!(session_id = %report.session_id, "requesting session report");

        self.retry_config
            .execute(|| async {
                let response = self
                    .client
                    .post(&url)
                    .json(report)
                    .send()
                    .await
                    .context("Failed to send report request")?;

                let status = response.status();

                if status.is_success() {
                    let report_response: ReportResponse = response
                        .json()
                        .await
                        .context("Failed to parse report response")?;

                    tracing::info!(url = %report_response.url, "report generated");
                    Ok(report_response)
                } else {
                    let error_text = response.text().await.unwrap_or_default();
                    Err(ApiError::from_status(status, error_text).into())
                }
            })
            .await
    }
}
