use crate::config::{DEFAULT_USERNAME, Settings};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Default embed accent color (blue).
pub const DEFAULT_COLOR: u32 = 3_447_003;

const EMBED_TITLE: &str = "🔔 Notification";
const FOOTER_TEXT: &str = "Pling";

// A webhook endpoint that hangs should not hang the process.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level webhook payload.
#[derive(Serialize, Debug)]
pub struct WebhookPayload {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub embeds: Vec<Embed>,
}

#[derive(Serialize, Debug)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<EmbedField>,
    pub footer: Footer,
}

#[derive(Serialize, Debug)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Serialize, Debug)]
pub struct Footer {
    pub text: String,
}

/// Builds the embed payload for `message`.
///
/// The configured username/avatar are used when set; an empty avatar is
/// omitted from the payload entirely rather than sent as an empty string.
pub fn build_payload(message: &str, source: &str, settings: Option<&Settings>) -> WebhookPayload {
    let username = settings
        .map(|s| s.username.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_USERNAME)
        .to_string();
    let avatar_url = settings
        .map(|s| s.avatar_url.clone())
        .filter(|url| !url.is_empty());

    let working_dir = std::env::current_dir()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "Unknown".to_string());

    WebhookPayload {
        username,
        avatar_url,
        embeds: vec![Embed {
            title: EMBED_TITLE.to_string(),
            description: message.to_string(),
            color: DEFAULT_COLOR,
            timestamp: Utc::now(),
            fields: vec![
                EmbedField {
                    name: "Working Directory".to_string(),
                    value: working_dir,
                    inline: false,
                },
                EmbedField {
                    name: "Source".to_string(),
                    value: source.to_string(),
                    inline: true,
                },
            ],
            footer: Footer {
                text: FOOTER_TEXT.to_string(),
            },
        }],
    }
}

/// Sends `message` to the webhook at `webhook_url` as a single blocking POST.
///
/// Any 2xx status counts as delivered; otherwise the status and response
/// body are reported. No retries.
pub fn send_notification(
    webhook_url: &str,
    message: &str,
    source: &str,
    settings: Option<&Settings>,
) -> Result<(), AppError> {
    let payload = build_payload(message, source, settings);

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pling/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(AppError::WebhookRequest)?;

    let response = client
        .post(webhook_url)
        .json(&payload)
        .send()
        .map_err(AppError::WebhookRequest)?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response
        .text()
        .unwrap_or_else(|_| "<unreadable response body>".to_string());
    Err(AppError::WebhookStatus {
        status: status.as_u16(),
        body,
    })
}
