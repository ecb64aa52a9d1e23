use anyhow::{Context, Result};
use clap::Parser;
use std::{env, str::FromStr};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub stats_path: String,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub export_webhook: Option<String>,
    pub seed_demo_content: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Unified cloud drive dashboard API")]
pub struct Args {
    /// Host to bind to (overrides LINKMYDRIVES_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides LINKMYDRIVES_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Path of the stats JSON document (overrides LINKMYDRIVES_STATS_PATH)
    #[arg(long)]
    pub stats_path: Option<String>,

    /// Secret used to sign login tokens (overrides LINKMYDRIVES_JWT_SECRET)
    #[arg(long)]
    pub jwt_secret: Option<String>,

    /// Login token lifetime in seconds (overrides LINKMYDRIVES_TOKEN_TTL_SECS)
    #[arg(long)]
    pub token_ttl_secs: Option<i64>,

    /// Webhook receiving preregistration rows (overrides LINKMYDRIVES_EXPORT_WEBHOOK)
    #[arg(long)]
    pub export_webhook: Option<String>,

    /// Start with only the demo user; no drives, files or uploads
    #[arg(long)]
    pub no_demo_data: bool,

    /// Rewrite the stats document with zeroed counters and exit
    #[arg(long)]
    pub reset_stats: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the reset flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("LINKMYDRIVES_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_number("LINKMYDRIVES_PORT", 5000)?;
        let env_stats =
            env::var("LINKMYDRIVES_STATS_PATH").unwrap_or_else(|_| "./data/stats.json".into());
        let env_secret =
            env::var("LINKMYDRIVES_JWT_SECRET").unwrap_or_else(|_| "change-me".into());
        let env_ttl = env_number("LINKMYDRIVES_TOKEN_TTL_SECS", 3600)?;
        let env_webhook = env::var("LINKMYDRIVES_EXPORT_WEBHOOK")
            .ok()
            .filter(|url| !url.trim().is_empty());

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            stats_path: args.stats_path.unwrap_or(env_stats),
            jwt_secret: args.jwt_secret.unwrap_or(env_secret),
            token_ttl_secs: args.token_ttl_secs.unwrap_or(env_ttl),
            export_webhook: args.export_webhook.or(env_webhook),
            seed_demo_content: !args.no_demo_data,
        };

        if cfg.token_ttl_secs <= 0 {
            anyhow::bail!("token lifetime must be positive, got {}", cfg.token_ttl_secs);
        }

        Ok((cfg, args.reset_stats))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read a numeric env var, falling back to `default` when it is unset.
fn env_number<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}
