use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use service_c_core::config::{ServiceConfig, load_config};
use service_c_core::errors::HandlerError;
use service_c_core::telemetry::init_tracing;
use service_c_core::{Acknowledgement, Handler};
use std::env;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::info;

/// Optional path to a YAML config file; `SERVICE_C_CONFIG` is used otherwise.
const CONFIG_PATH_ENV_VAR: &str = "SERVICE_C_CONFIG_PATH";

pub async fn lambda_handler(
    handler: &Handler,
    event: LambdaEvent<Value>,
) -> Result<Acknowledgement, Error> {
    let (payload, _context) = event.into_parts();
    Ok(handler.handle(&payload)?)
}

/// Runs a single invocation with the event read from `input`.
/// Empty input stands for a `null` event.
async fn run_local<R>(handler: &Handler, mut input: R) -> Result<Acknowledgement, HandlerError>
where
    R: AsyncRead + Unpin,
{
    let mut raw = String::new();
    input.read_to_string(&mut raw).await?;

    let event: Value = if raw.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&raw)?
    };

    handler.handle(&event)
}

fn load_validated_config() -> Result<ServiceConfig, HandlerError> {
    let config_path = env::var(CONFIG_PATH_ENV_VAR).ok();
    let config = load_config(config_path.as_deref())?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = load_validated_config()?;
    let verbosity = init_tracing(&config.log)?;
    let handler = Handler::new(verbosity);

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Running in AWS Lambda environment");
        let handler = &handler;
        lambda_runtime::run(service_fn(move |event| lambda_handler(handler, event))).await
    } else {
        info!("Running in local development mode, reading event from stdin");

        let ack = run_local(&handler, tokio::io::stdin()).await?;
        println!("{}", serde_json::to_string(&ack)?);
        Ok(())
    }
}
