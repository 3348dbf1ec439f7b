//! Default LLM profile configs loaded from environment variables.
//!
//! Two roles are used by the search gateway:
//!
//! - **Rewrite**   → chat model turning a free-text query into food terms + location
//! - **Embedding** → embedding model producing fixed-dimension vectors
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`     = API key (mandatory)
//! - `OPENAI_BASE_URL`    = API base URL (default `https://api.openai.com`)
//! - `REWRITE_MODEL`      = chat model (default `gpt-4o-mini`)
//! - `REWRITE_MAX_TOKENS` = completion token cap (default `60`)
//! - `EMBEDDING_MODEL`    = embedding model (default `text-embedding-3-small`)
//! - `EMBEDDING_DIM`      = embedding dimension (default `1024`)
//! - `LLM_TIMEOUT_SECS`   = optional request timeout

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, must_var, opt_u32, opt_u64, validate_http_endpoint, var_or,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_REWRITE_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REWRITE_MAX_TOKENS: u32 = 60;
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Reads the process environment.
fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Settings shared by both profiles.
struct Common {
    endpoint: String,
    api_key: String,
    timeout_secs: Option<u64>,
}

fn common<F>(lookup: &F) -> Result<Common, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(lookup, "OPENAI_API_KEY")?;
    let endpoint = var_or(lookup, "OPENAI_BASE_URL", DEFAULT_BASE_URL);
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;
    let timeout_secs = opt_u64(lookup, "LLM_TIMEOUT_SECS")?;

    Ok(Common {
        endpoint,
        api_key,
        timeout_secs,
    })
}

/// Constructs the **rewrite** profile from the process environment.
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `max_tokens = Some(60)`
/// - JSON object response format
pub fn config_openai_rewrite() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_rewrite_from(&process_env)
}

/// Same as [`config_openai_rewrite`], reading values through `lookup`.
pub fn config_openai_rewrite_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let common = common(lookup)?;
    let model = var_or(lookup, "REWRITE_MODEL", DEFAULT_REWRITE_MODEL);
    let max_tokens = opt_u32(lookup, "REWRITE_MAX_TOKENS")?.unwrap_or(DEFAULT_REWRITE_MAX_TOKENS);
    if max_tokens == 0 {
        return Err(ConfigError::OutOfRange {
            field: "REWRITE_MAX_TOKENS",
            detail: "must be > 0",
        }
        .into());
    }

    Ok(LlmModelConfig {
        model,
        endpoint: common.endpoint,
        api_key: Some(common.api_key),
        max_tokens: Some(max_tokens),
        temperature: Some(0.0),
        timeout_secs: common.timeout_secs,
        json_response: true,
        dimensions: None,
    })
}

/// Constructs the **embedding** profile from the process environment.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_embedding_from(&process_env)
}

/// Same as [`config_openai_embedding`], reading values through `lookup`.
pub fn config_openai_embedding_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let common = common(lookup)?;
    let model = var_or(lookup, "EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);
    let dim = match opt_u64(lookup, "EMBEDDING_DIM")? {
        Some(0) => {
            return Err(ConfigError::OutOfRange {
                field: "EMBEDDING_DIM",
                detail: "must be > 0",
            }
            .into());
        }
        Some(d) => d as usize,
        None => DEFAULT_EMBEDDING_DIM,
    };

    Ok(LlmModelConfig {
        model,
        endpoint: common.endpoint,
        api_key: Some(common.api_key),
        max_tokens: None,
        temperature: None,
        timeout_secs: common.timeout_secs,
        json_response: false,
        dimensions: Some(dim),
    })
}
