use ai_llm_service::telemetry;
use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present.
    let dotenv = dotenvy::dotenv().ok();

    telemetry::init(telemetry::DEFAULT_FILTER).context("installing tracing subscriber")?;
    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    api::start().await.context("restaurant search API failed")?;

    Ok(())
}
