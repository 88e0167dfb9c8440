use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// API Key for the Google Generative Language API. Required.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Base URL for the Generative Language REST API.
    #[arg(long, env = "CHAT_BASE_URL", default_value = "https://generativelanguage.googleapis.com/v1beta")]
    pub chat_base_url: String,

    /// Ordered model fallback list. The first model that answers wins; later ones are
    /// only tried when an earlier one is overloaded or rate limited.
    #[arg(
        long,
        env = "CHAT_MODELS",
        value_delimiter = ',',
        default_values = ["gemini-2.5-flash-lite", "gemini-2.0-flash-lite", "gemini-2.0-flash"]
    )]
    pub chat_models: Vec<String>,

    /// Maximum number of tokens the model may generate per reply.
    #[arg(long, env = "MAX_OUTPUT_TOKENS", default_value = "2000")]
    pub max_output_tokens: u32,

    /// Sampling temperature for generation.
    #[arg(long, env = "TEMPERATURE", default_value = "0.5")]
    pub temperature: f32,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:5000")]
    pub server_addr: String,

    /// Frontend origins allowed to call the API (credentials included).
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_values = ["http://localhost:3000", "http://localhost:5173"]
    )]
    pub cors_origins: Vec<String>,

    /// Optional global request budget per second. 0 (the default) disables rate limiting.
    #[arg(long, env = "RATE_LIMIT_PER_SECOND", default_value = "0")]
    pub rate_limit_per_second: u32,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
