/// Configuration for one OpenAI-compatible model invocation profile.
///
/// The same struct describes both chat-completion and embeddings profiles;
/// fields that do not apply to a profile stay `None`/`false`.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(60),
///     temperature: Some(0.0),
///     timeout_secs: None,
///     json_response: true,
///     dimensions: None,
/// };
/// assert!(cfg.json_response);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string (e.g., `"gpt-4o-mini"`, `"text-embedding-3-small"`).
    pub model: String,

    /// API base URL without the `/v1/...` suffix.
    pub endpoint: String,

    /// API key sent as a Bearer token.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f32>,

    /// Request timeout in seconds; `None` keeps the transport default.
    pub timeout_secs: Option<u64>,

    /// Ask the provider for a strict JSON object response.
    pub json_response: bool,

    /// Target embedding dimension (embeddings profiles only).
    pub dimensions: Option<usize>,
}
