use clap::{Args, Parser, ValueEnum};
use ipnetwork::IpNetwork;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub telegram: TelegramConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "NABLA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "NABLA_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Comma-separated list of CIDRs to trust for X-Forwarded-For IP extraction
    #[arg(
        long,
        env = "NABLA_TRUSTED_PROXIES",
        default_value = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,127.0.0.1/32",
        value_delimiter = ','
    )]
    pub trusted_proxies: Vec<IpNetwork>,

    /// Include fault details in internal-error responses
    #[arg(long, env = "NABLA_DEV_MODE", default_value_t = false)]
    pub dev_mode: bool,
}

#[derive(Clone, Debug, Args)]
pub struct TelegramConfig {
    /// Bot API token; absence is reported per request, not at boot
    #[arg(long, env = "NABLA_BOT_TOKEN")]
    pub bot_token: Option<String>,

    /// Destination chat identifier
    #[arg(long, env = "NABLA_CHAT_ID")]
    pub chat_id: Option<String>,

    /// Bot API base URL (override it to point tests at a local stand-in)
    #[arg(long, env = "NABLA_TELEGRAM_API_BASE", default_value = "https://api.telegram.org")]
    pub api_base: String,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed on the submission endpoint
    #[arg(long, env = "NABLA_RATE_LIMIT_PER_SECOND", default_value_t = 5)]
    pub per_second: u32,

    /// Burst allowance for the submission endpoint
    #[arg(long, env = "NABLA_RATE_LIMIT_BURST", default_value_t = 10)]
    pub burst: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "NABLA_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are exported only when set
    #[arg(long, env = "NABLA_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self::parse()
    }
}
