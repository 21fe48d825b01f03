//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use deskbot_completion::CompletionClient;
use deskbot_core::{ChatPipeline, ProgressReporter, handle_chat};
use deskbot_helpcenter::ArticleClient;
use deskbot_shared::{
    AppConfig, ChatSettings, CompletionSettings, HelpCenterSettings, init_config, load_config,
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const REPL_PROMPT: &str = "질문을 입력하세요: ";

type Pipeline = ChatPipeline<ArticleClient, CompletionClient>;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// deskbot: help-center question answering.
#[derive(Parser)]
#[command(
    name = "deskbot",
    version,
    about = "Answer questions from help-center articles, in Korean or English.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Answer a single question.
    Ask {
        /// The question; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Answer questions interactively until an empty line or EOF.
    Repl,

    /// Run a raw chat request through the HTTP endpoint mapping.
    Request {
        /// HTTP method of the simulated request.
        #[arg(long, default_value = "POST")]
        method: String,

        /// JSON request body, e.g. '{"question":"와이어 교체 방법"}'.
        #[arg(long)]
        body: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "deskbot=info",
        1 => "deskbot=debug",
        _ => "deskbot=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Ask { question } => cmd_ask(&question.join(" ")).await,
        Command::Repl => cmd_repl().await,
        Command::Request { method, body } => cmd_request(&method, &body).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Resolve settings once and wire the clients into a pipeline.
fn build_pipeline() -> Result<Pipeline> {
    let config = load_config()?;
    let helpcenter = HelpCenterSettings::from_env(&config)?;
    let completion = CompletionSettings::from_env(&config)?;

    info!(
        base_url = %helpcenter.base_url,
        model = %completion.model,
        "clients configured"
    );

    Ok(ChatPipeline::new(
        ArticleClient::new(&helpcenter)?,
        CompletionClient::new(&completion)?,
        ChatSettings::from(&config.chat),
    ))
}

async fn cmd_ask(question: &str) -> Result<()> {
    let pipeline = build_pipeline()?;
    let reporter = CliProgress::new()?;

    let answer = pipeline.answer_with_progress(question, &reporter).await;
    reporter.clear();

    println!("{}", answer?);
    Ok(())
}

async fn cmd_repl() -> Result<()> {
    let pipeline = build_pipeline()?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{REPL_PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            break;
        }

        let reporter = CliProgress::new()?;
        let result = pipeline.answer_with_progress(question, &reporter).await;
        reporter.clear();

        match result {
            Ok(answer) => println!("\n{answer}\n"),
            Err(e) => {
                warn!(error = %e, "turn failed");
                eprintln!("오류: {e}\n");
            }
        }
    }

    Ok(())
}

async fn cmd_request(method: &str, body: &str) -> Result<()> {
    let pipeline = build_pipeline()?;
    let response = handle_chat(&pipeline, method, body).await;

    println!("HTTP {}", response.status);
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Spinner on stderr showing the current pipeline phase.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("invalid spinner template: {e}"))?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Ok(Self { spinner })
    }

    fn clear(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, elapsed: Duration) {
        self.spinner.finish_and_clear();
        info!(elapsed_ms = elapsed.as_millis(), "answer ready");
    }
}
