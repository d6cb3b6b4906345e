use autotag::aws_config::tagging_client;
use autotag::handler::function_handler;
use lambda_runtime::{run, service_fn, Error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // CloudWatch stamps ingestion time and the function name already.
        .with_target(false)
        .without_time()
        .init();

    let client = tagging_client().await;

    run(service_fn(|event| function_handler(event, &client))).await
}
