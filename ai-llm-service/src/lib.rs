//! Shared OpenAI-compatible LLM client used by the search gateway.
//!
//! - [`service_profiles::LlmServiceProfiles`] holds the `rewrite` and
//!   `embedding` profiles and lazily builds one HTTP client per profile.
//! - [`config::default_config`] builds those profiles from the environment.
//! - [`telemetry`] installs the process-wide `tracing` subscriber.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use service_profiles::LlmServiceProfiles;
