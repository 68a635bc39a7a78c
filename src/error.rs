use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("failed to determine current working directory: {0}")]
    WorkingDirUnavailable(#[source] std::io::Error),

    #[error("could not determine the user configuration directory")]
    ConfigDirUnavailable,

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("config file not found: neither {} nor {} exists", local.display(), global.display())]
    NoConfigFound { local: PathBuf, global: PathBuf },

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create config directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no webhook URL provided; pass --webhook or set one with `pling config`")]
    MissingWebhookUrl,

    #[error("error sending webhook: {0}")]
    WebhookRequest(#[source] reqwest::Error),

    #[error("webhook returned status {status}: {body}")]
    WebhookStatus { status: u16, body: String },
}
