use crate::config::Settings;
use crate::error::AppError;
use console::{Style, Term};
use std::io::{self, Write};
use std::path::Path;

/// Marker shown for configuration fields with no value.
const NOT_SET: &str = "(not set)";

pub struct DisplayManager {
    // Status and errors go to stderr; the configuration summary is the
    // actual output and goes to stdout.
    out: Term,
    err: Term,
    pub error_style: Style,
    pub warning_style: Style,
    pub success_style: Style,
    pub heading_style: Style,
    pub value_style: Style,
    pub metadata_style: Style,
}

impl DisplayManager {
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            error_style: Style::new().red().bold(),
            warning_style: Style::new().yellow(),
            success_style: Style::new().green(),
            heading_style: Style::new().bold(),
            value_style: Style::new().cyan(),
            metadata_style: Style::new().dim(),
        }
    }

    /// Print the configuration summary for the file at `path`.
    ///
    /// The webhook URL is shown masked; see `Settings::masked_webhook_url`.
    pub fn print_config_summary(&self, path: &Path, settings: &Settings) -> io::Result<()> {
        let mut out = self.out.clone();

        writeln!(
            out,
            "\n{}",
            self.heading_style
                .apply_to(format!("📋 Current configuration ({}):", path.display()))
        )?;

        let webhook = summary_text(&settings.masked_webhook_url());
        writeln!(out, "  🔗 Webhook URL: {}", self.styled_field(webhook))?;

        let username = summary_text(&settings.username);
        writeln!(out, "  👤 Username: {}", self.styled_field(username))?;

        let avatar = summary_text(&settings.avatar_url);
        writeln!(out, "  🖼️  Avatar URL: {}", self.styled_field(avatar))?;

        Ok(())
    }

    fn styled_field(&self, value: String) -> console::StyledObject<String> {
        if value == NOT_SET {
            self.metadata_style.apply_to(value)
        } else {
            self.value_style.apply_to(value)
        }
    }

    /// Report a freshly created configuration template with edit hints.
    pub fn print_template_created(&self, path: &Path) -> io::Result<()> {
        let mut out = self.out.clone();

        writeln!(
            out,
            "{} Configuration template created: {}",
            self.success_style.apply_to("✅"),
            self.value_style.apply_to(path.display().to_string())
        )?;
        writeln!(out, "\nEdit the file and set the following values:")?;
        writeln!(
            out,
            "  {} your webhook URL",
            self.metadata_style.apply_to("webhook_url:")
        )?;
        writeln!(
            out,
            "  {} bot display name (optional)",
            self.metadata_style.apply_to("username:   ")
        )?;
        writeln!(
            out,
            "  {} bot avatar image URL (optional)",
            self.metadata_style.apply_to("avatar_url: ")
        )?;
        writeln!(out, "\nOr use the config command:")?;
        writeln!(
            out,
            "  {}",
            self.metadata_style
                .apply_to("pling config --webhook 'https://discord.com/api/webhooks/...'")
        )?;
        Ok(())
    }

    /// Report that the template already existed and was left untouched.
    pub fn print_template_exists(&self, path: &Path) -> io::Result<()> {
        let mut out = self.out.clone();
        writeln!(
            out,
            "{} Configuration file {} already exists.",
            self.warning_style.apply_to("⚠️"),
            self.value_style.apply_to(path.display().to_string())
        )
    }

    pub fn print_config_updated(&self) -> io::Result<()> {
        let mut out = self.out.clone();
        writeln!(
            out,
            "{} Configuration updated",
            self.success_style.apply_to("✅")
        )
    }

    pub fn print_send_success(&self) -> io::Result<()> {
        let mut out = self.out.clone();
        writeln!(
            out,
            "{} Notification sent successfully",
            self.success_style.apply_to("✅")
        )
    }

    /// Print a terminal error before the process exits non-zero.
    pub fn print_error(&self, error: &AppError) -> io::Result<()> {
        let mut err = self.err.clone();
        writeln!(
            err,
            "{} {error}",
            self.error_style.apply_to("Error:")
        )
    }
}

/// Value rendered for a summary field, with unset fields made explicit
/// rather than omitted.
fn summary_text(value: &str) -> String {
    if value.is_empty() {
        NOT_SET.to_string()
    } else {
        value.to_string()
    }
}
