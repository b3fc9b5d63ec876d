//! Layered runtime configuration.
//!
//! Precedence, lowest to highest: built-in defaults, optional config file
//! (`--config` / `CONFIG_FILE`, falling back to `./config.yaml`),
//! `ELLM_`-prefixed environment variables (`__` separator, e.g.
//! `ELLM_SERVER__PORT=8000`), CLI flags.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Host to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Milliseconds between emitted frames
    #[arg(long, env = "TICK_MS")]
    pub tick_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub stream: StreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Emission parameters of the mock reply stream.
#[derive(Debug, Deserialize, Clone)]
pub struct StreamConfig {
    /// Maximum characters per streamed chunk.
    pub chunk_chars: usize,
    /// Milliseconds between emitted frames.
    pub tick_ms: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9090)?
            .set_default("stream.chunk_chars", 10)?
            .set_default("stream.tick_ms", 100)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if std::path::Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        // Environment variables prefixed with ELLM_, e.g. ELLM_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("ELLM")
                .separator("__")
                .try_parsing(true),
        );

        // CLI flags win over every other source.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(tick_ms) = cli.tick_ms {
            builder = builder.set_override("stream.tick_ms", tick_ms)?;
        }

        builder.build()?.try_deserialize()
    }
}
