use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// sqlx logs every statement at info; keep that out of request logs.
const QUIET_SQLX_DIRECTIVE: &str = "sqlx::query=warn";

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let quiet_queries = QUIET_SQLX_DIRECTIVE
        .parse()
        .map_err(|err| InfraError::telemetry(format!("invalid log directive: {err}")))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy()
        .add_directive(quiet_queries);

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "bulletin_contact_submissions_total",
            Unit::Count,
            "Contact messages created, labelled by source (public or admin)."
        );
        describe_counter!(
            "bulletin_contact_status_transitions_total",
            Unit::Count,
            "Contact messages moved to a new status, labelled by target status."
        );
        describe_counter!(
            "bulletin_contact_exports_total",
            Unit::Count,
            "Contact spreadsheets generated."
        );
        describe_counter!(
            "bulletin_contact_spam_rejected_total",
            Unit::Count,
            "Public contact submissions discarded because the honeypot field was filled."
        );
        describe_counter!(
            "bulletin_http_errors_total",
            Unit::Count,
            "HTTP responses with a 4xx or 5xx status, labelled by class and surface."
        );
    });
}
