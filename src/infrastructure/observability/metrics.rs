//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::{PassError, PassReport};

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let builder = PrometheusBuilder::new();

    match builder.install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("team_sync_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Create the metrics router mounted at the configured path
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Label for the outcome of one pass
pub fn pass_outcome(result: &Result<PassReport, PassError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(PassError::Incomplete(_)) => "partial",
        Err(PassError::Aborted(_)) => "aborted",
    }
}

/// Record the outcome of one pass
pub fn record_pass(result: &Result<PassReport, PassError>, duration: Duration) {
    counter!("team_sync_passes_total", "outcome" => pass_outcome(result)).increment(1);
    histogram!("team_sync_pass_duration_seconds").record(duration.as_secs_f64());

    match result {
        Ok(report) => record_report(report),
        Err(PassError::Incomplete(report)) => record_report(report),
        Err(PassError::Aborted(error)) => {
            counter!("team_sync_failures_total", "kind" => error.kind()).increment(1);
        }
    }
}

fn record_report(report: &PassReport) {
    counter!("team_sync_teams_converged_total").increment(report.teams_converged() as u64);

    for failure in report.failures() {
        counter!("team_sync_failures_total", "kind" => failure.error.kind()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sync::OrgReport;
    use crate::domain::{DomainError, OrgId, SyncError};

    fn incomplete() -> PassError {
        let org_id = OrgId::new(1).unwrap();
        let mut org = OrgReport::new(org_id);
        org.record_team_failure(
            "ops",
            SyncError::RemoteLookupFailed {
                org_id,
                team: "ops".to_string(),
                reason: DomainError::remote("timeout"),
            },
        );
        let mut report = PassReport::new();
        report.push(org);
        PassError::Incomplete(report)
    }

    #[test]
    fn test_pass_outcome_labels() {
        assert_eq!(pass_outcome(&Ok(PassReport::new())), "success");
        assert_eq!(pass_outcome(&Err(incomplete())), "partial");
        assert_eq!(
            pass_outcome(&Err(PassError::Aborted(SyncError::DirectoryConnectFailed {
                reason: DomainError::directory_connect("refused"),
            }))),
            "aborted"
        );
    }

    #[test]
    fn test_record_pass_without_recorder() {
        record_pass(&Err(incomplete()), Duration::from_millis(20));
        record_pass(&Ok(PassReport::new()), Duration::from_millis(5));
    }

    #[test]
    fn test_disabled_metrics_are_not_installed() {
        let config = MetricsConfig {
            enabled: false,
            path: "/metrics".to_string(),
        };

        assert!(init_metrics(&config).is_none());
    }
}
