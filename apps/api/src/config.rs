use anyhow::{Context, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const FEATHERLESS_BASE_URL: &str = "https://api.featherless.ai/v1";
const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-32B-Instruct";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Empty when running in demo mode without a key.
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Serve fixture requirements and emails instead of calling the AI backend.
    pub demo_mode: bool,
    pub demo_delay_ms: u64,
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let demo_mode = parse_flag("DEMO_MODE")?;

        let llm_api_key = if demo_mode {
            std::env::var("LLM_API_KEY").unwrap_or_default()
        } else {
            require_env("LLM_API_KEY")?
        };
        let llm_base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| default_base_url(&llm_api_key).to_string());

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            llm_api_key,
            llm_base_url,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            demo_mode,
            demo_delay_ms: std::env::var("DEMO_DELAY_MS")
                .unwrap_or_else(|_| "1500".to_string())
                .parse::<u64>()
                .context("DEMO_DELAY_MS must be a number of milliseconds")?,
            seed_sample_data: parse_flag("SEED_SAMPLE_DATA")?,
        })
    }
}

/// Featherless keys are prefixed with `rc_`; everything else goes to OpenAI.
fn default_base_url(api_key: &str) -> &'static str {
    if api_key.starts_with("rc_") {
        FEATHERLESS_BASE_URL
    } else {
        OPENAI_BASE_URL
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_flag(key: &str) -> Result<bool> {
    match std::env::var(key) {
        Err(_) => Ok(false),
        Ok(raw) => parse_bool(&raw).with_context(|| format!("'{key}' must be true or false")),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised boolean '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_featherless_key_selects_featherless_endpoint() {
        assert_eq!(default_base_url("rc_abc123"), FEATHERLESS_BASE_URL);
        assert_eq!(default_base_url("sk-abc123"), OPENAI_BASE_URL);
        assert_eq!(default_base_url(""), OPENAI_BASE_URL);
    }

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool(" YES ").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(!parse_bool("").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
