mod config;
mod display;
mod error;
mod webhook;

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::process::ExitCode;

use config::{Manager, Settings};
use display::DisplayManager;
use error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "pling",
    version,
    about = "Sends formatted notifications to a chat webhook.",
    long_about = "Sends a formatted notification to a chat-webhook endpoint, \
                  reading the webhook URL and bot identity from a local or \
                  global configuration file that can be created and updated \
                  via subcommands.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    send: SendArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a configuration template file
    Init {
        /// Create the template in the per-user config directory instead of
        /// the current directory
        #[arg(short = 'g', long)]
        global: bool,
    },
    /// Show or update the configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct SendArgs {
    /// The notification message to send
    message: Option<String>,

    /// Webhook URL (overrides the configured one)
    #[arg(long, value_name = "URL")]
    webhook: Option<String>,

    /// Source label shown in the notification
    #[arg(long, value_name = "SOURCE", default_value = "Unknown")]
    source: String,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Operate on the global per-user configuration
    #[arg(short = 'g', long)]
    global: bool,

    /// Set the webhook URL
    #[arg(long, value_name = "URL")]
    webhook: Option<String>,

    /// Set the bot display name
    #[arg(long, value_name = "NAME")]
    username: Option<String>,

    /// Set the bot avatar image URL
    #[arg(long, value_name = "URL")]
    avatar: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let display = DisplayManager::new();

    match run(cli, &display) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            display
                .print_error(&err)
                .unwrap_or_else(|e| eprintln!("Display error: {e}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, display: &DisplayManager) -> Result<(), AppError> {
    let manager = Manager::new()?;

    match cli.command {
        Some(Command::Init { global }) => run_init(&manager, display, global),
        Some(Command::Config(args)) => run_config(&manager, display, &args),
        None => run_send(&manager, display, cli.send),
    }
}

fn run_send(manager: &Manager, display: &DisplayManager, args: SendArgs) -> Result<(), AppError> {
    let Some(message) = args.message else {
        // clap cannot express "positional required unless a subcommand is
        // given", so the missing-message case is reported here.
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "missing required message argument",
            )
            .exit();
    };

    let (webhook_url, settings) = match args.webhook {
        // An explicit URL wins, but the configured identity is still used
        // when a config loads; a failed load is not fatal here.
        Some(url) => (url, manager.load_preferred(false).ok().map(|(s, _)| s)),
        None => {
            let (settings, _path) = match manager.load_preferred(false) {
                Ok(loaded) => loaded,
                Err(AppError::NotFound { .. } | AppError::NoConfigFound { .. }) => {
                    return Err(AppError::MissingWebhookUrl);
                }
                Err(err) => return Err(err),
            };
            if settings.webhook_url.is_empty() {
                return Err(AppError::MissingWebhookUrl);
            }
            (settings.webhook_url.clone(), Some(settings))
        }
    };

    webhook::send_notification(&webhook_url, &message, &args.source, settings.as_ref())?;
    display
        .print_send_success()
        .unwrap_or_else(|e| eprintln!("Display error: {e}"));
    Ok(())
}

fn run_init(manager: &Manager, display: &DisplayManager, global: bool) -> Result<(), AppError> {
    let (path, created) = manager.create_template(global)?;

    if created {
        display
            .print_template_created(&path)
            .unwrap_or_else(|e| eprintln!("Display error: {e}"));
    } else {
        let settings = manager.load_from(&path)?;
        display
            .print_template_exists(&path)
            .unwrap_or_else(|e| eprintln!("Display error: {e}"));
        display
            .print_config_summary(&path, &settings)
            .unwrap_or_else(|e| eprintln!("Display error: {e}"));
    }
    Ok(())
}

fn run_config(
    manager: &Manager,
    display: &DisplayManager,
    args: &ConfigArgs,
) -> Result<(), AppError> {
    let has_updates = args.webhook.is_some() || args.username.is_some() || args.avatar.is_some();

    if !has_updates {
        let (settings, path) = manager.load_preferred(args.global)?;
        display
            .print_config_summary(&path, &settings)
            .unwrap_or_else(|e| eprintln!("Display error: {e}"));
        return Ok(());
    }

    // Field updates target the selected location directly. A missing file
    // starts from defaults; a corrupt one is surfaced rather than replaced.
    let target = manager.resolve_path(args.global)?;
    let mut settings = match manager.load_from(&target) {
        Ok(settings) => settings,
        Err(AppError::NotFound { .. }) => Settings::default(),
        Err(err) => return Err(err),
    };

    if let Some(url) = &args.webhook {
        settings.webhook_url = url.clone();
    }
    if let Some(name) = &args.username {
        settings.username = name.clone();
    }
    if let Some(url) = &args.avatar {
        settings.avatar_url = url.clone();
    }

    let path = manager.save(&settings, args.global)?;
    display
        .print_config_updated()
        .unwrap_or_else(|e| eprintln!("Display error: {e}"));
    display
        .print_config_summary(&path, &settings)
        .unwrap_or_else(|e| eprintln!("Display error: {e}"));
    Ok(())
}
