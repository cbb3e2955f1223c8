//! TG File Sender - Main Entry Point
//!
//! Reads a text file and sends it to a Telegram chat, split into as many
//! messages as Telegram's length limit requires.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tg_file_sender::config::{
    ConfigError, SendOptions, TelegramConfig, load_env_file, mask_token,
};
use tg_file_sender::delivery::{DeliveryPlan, deliver};
use tg_file_sender::error::AppError;
use tg_file_sender::input::read_text_file;
use tg_file_sender::telegram::{BotClient, ParseMode};

/// Send the contents of a text file to a Telegram chat.
#[derive(Parser, Debug)]
#[command(name = "tg_sender")]
#[command(about = "Send the contents of a text file to a Telegram chat via a bot")]
#[command(after_help = "Example: tg_sender report.txt --parse-mode HTML")]
#[command(version)]
struct Args {
    /// Path to the text file to send.
    #[arg(required_unless_present = "check")]
    file: Option<PathBuf>,

    /// Formatting mode (plain, markdown, markdown-v2, html).
    #[arg(long, value_enum, ignore_case = true, default_value = "plain")]
    parse_mode: ParseMode,

    /// Show the messages that would be sent without sending them.
    #[arg(long)]
    preview: bool,

    /// Check the bot token via getMe and exit.
    #[arg(long, conflicts_with = "preview")]
    check: bool,

    /// Prefix each message with "📄 Part i/n" when the text is split.
    #[arg(long)]
    numbered: bool,

    /// Let Telegram show link previews.
    #[arg(long)]
    link_preview: bool,

    /// Send without a notification sound.
    #[arg(long)]
    silent: bool,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn send_options(&self) -> SendOptions {
        SendOptions {
            parse_mode: self.parse_mode,
            disable_link_preview: !self.link_preview,
            disable_notification: self.silent,
            numbered_parts: self.numbered,
        }
    }

    fn file(&self) -> Result<&Path, AppError> {
        self.file.as_deref().ok_or(AppError::MissingFile)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args.log_level);
    load_env_file(&args.env_file);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: &Args) -> Result<(), AppError> {
    let options = args.send_options();

    if args.preview {
        let text = read_text_file(args.file()?)?;
        let plan = DeliveryPlan::new(&text, &options);
        print_preview(&plan, &options);
        return Ok(());
    }

    let config = TelegramConfig::from_env()?;
    info!(
        "Using bot {} for chat {}",
        mask_token(&config.bot_token),
        config.chat_id
    );

    let client = BotClient::new(&config)?;

    if args.check {
        let bot = client.get_me().await?;
        println!("✓ Bot connected: {bot}");
        return Ok(());
    }

    let path = args.file()?;
    let text = read_text_file(path)?;
    let plan = DeliveryPlan::new(&text, &options);

    if plan.is_empty() {
        println!("Nothing to send: {} contains no text", path.display());
        return Ok(());
    }

    let report = deliver(&client, &config, &plan, &options).await?;
    println!(
        "✓ Sent {}/{} part(s) to chat {}",
        report.sent(),
        report.total,
        config.chat_id
    );

    Ok(())
}

/// Prints every planned message with its length.
fn print_preview(plan: &DeliveryPlan<'_>, options: &SendOptions) {
    let rule = "=".repeat(50);

    println!("{rule}");
    println!("MESSAGE PREVIEW");
    println!("{rule}");

    for part in plan.parts() {
        println!(
            "--- Part {}/{} ({} chars) ---",
            part.index,
            part.total,
            part.char_count()
        );
        println!("{}", part.body);
    }

    println!("{rule}");
    println!("Parts: {}", plan.len());
    println!("Parse mode: {}", options.parse_mode);
    match TelegramConfig::from_env() {
        Ok(config) => println!("Chat ID: {}", config.chat_id),
        Err(_) => println!("Chat ID: (not configured)"),
    }
}

/// Prints an error and any follow-up hints to stderr.
fn report_error(error: &AppError) {
    eprintln!("✗ {error}");

    match error {
        AppError::Config(ConfigError::Missing(_)) => {
            eprintln!();
            eprintln!("Set the variables or create a .env file next to where you run tg_sender:");
            eprintln!("  TG_BOT_TOKEN=123456:ABC-DEF...");
            eprintln!("  TG_CHAT_ID=123456789");
        }
        AppError::Delivery(e) if e.delivered > 0 => {
            eprintln!(
                "  {} of {} part(s) were sent before the failure",
                e.delivered, e.total
            );
        }
        _ => {}
    }
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
