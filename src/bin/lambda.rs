use lambda_runtime::{service_fn, LambdaEvent};
use pdf_summarizer::{
    config::Config,
    lambda::{function_handler, function_router},
    utils::{init_logger, LogFormat},
    AppState,
};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    init_logger(LogFormat::Json);

    // Fails the cold start when GOOGLE_API_KEY is missing
    let config = Config::from_env()?;
    let app = function_router(AppState::from_config(config)?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        function_handler(app.clone(), event)
    }))
    .await
}
