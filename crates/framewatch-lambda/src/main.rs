// AWS Lambda binary entry point
//
// Both functions build from the same bootstrap binary; the deployed role is
// selected with FRAMEWATCH_ROLE=ingest|summary per function configuration.
//
// The lambda_runtime crate provides the tokio runtime, so we use #[tokio::main]

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .try_init();

    let role = std::env::var("FRAMEWATCH_ROLE").unwrap_or_default();
    match role.as_str() {
        "ingest" => framewatch_lambda::run_ingest().await,
        "summary" => framewatch_lambda::run_summary().await,
        other => Err(lambda_runtime::Error::from(format!(
            "unknown FRAMEWATCH_ROLE '{}' (expected: ingest, summary)",
            other
        ))),
    }
}
