//! Web vitals ingestion endpoint.
//!
//! Browsers beacon Core Web Vitals samples here; the admin analytics pages
//! aggregate them into p75 summaries.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use dukkan_core::WebVitalRating;

use crate::db::VitalsRepository;
use crate::db::vitals::VitalSample;
use crate::error::{AppError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Metrics we accept. Anything else is a client bug or garbage traffic.
const KNOWN_METRICS: [&str; 5] = ["LCP", "CLS", "INP", "FCP", "TTFB"];

/// Body for `POST /api/vitals`.
#[derive(Debug, Deserialize)]
pub struct VitalBody {
    pub metric: String,
    pub value: f64,
    pub rating: WebVitalRating,
    pub path: String,
}

impl VitalBody {
    /// Validate the beacon and normalize it into a sample.
    fn into_sample(self) -> Result<VitalSample> {
        let metric = self.metric.to_uppercase();
        if !KNOWN_METRICS.contains(&metric.as_str()) {
            return Err(AppError::Validation(format!("Unknown metric: {}", self.metric)));
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(AppError::Validation("Invalid metric value".to_owned()));
        }
        if !self.path.starts_with('/') {
            return Err(AppError::Validation("path must start with /".to_owned()));
        }
        Ok(VitalSample {
            metric,
            value: self.value,
            rating: self.rating,
            path: self.path,
        })
    }
}

/// `POST /api/vitals` - record one sample.
///
/// Malformed beacons are rejected with 400; past validation the insert is
/// fire-and-forget. Browsers never retry a beacon, so a storage hiccup is
/// logged and the response is still 202.
pub async fn ingest(
    State(state): State<AppState>,
    Json(body): Json<VitalBody>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    let sample = body.into_sample()?;

    if let Err(e) = VitalsRepository::new(state.pool()).insert(&sample).await {
        tracing::warn!(metric = %sample.metric, error = %e, "web vitals insert failed");
    }

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(()))))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn beacon(metric: &str, value: f64, path: &str) -> VitalBody {
        VitalBody {
            metric: metric.to_owned(),
            value,
            rating: WebVitalRating::Good,
            path: path.to_owned(),
        }
    }

    #[test]
    fn test_metric_names_normalize_to_uppercase() {
        let sample = beacon("lcp", 1830.5, "/").into_sample().unwrap();
        assert_eq!(sample.metric, "LCP");
    }

    #[test]
    fn test_malformed_beacons_are_rejected() {
        assert!(beacon("MADE_UP", 1.0, "/").into_sample().is_err());
        assert!(beacon("CLS", f64::NAN, "/").into_sample().is_err());
        assert!(beacon("CLS", -0.1, "/").into_sample().is_err());
        assert!(beacon("LCP", 1.0, "no-slash").into_sample().is_err());
    }
}
