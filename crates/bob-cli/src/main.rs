mod cmd;
mod interact;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    build::BuildSubcommand, config::ConfigSubcommand, design::DesignSubcommand,
    init::InitOptions, llm::LlmSubcommand, objectives::ObjectivesSubcommand,
    stories::StoriesSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bob",
    about = "AI-assisted planning: objectives, user stories, design, then tests and docs",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from bob_config.json or .git/)
    #[arg(long, global = true, env = "BOB_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Provider for this invocation: ollama, openai, anthropic, or groq
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Debug logging
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a bob project in the root directory
    Init(InitOptions),

    /// Show and change project settings
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Configure LLM providers
    Llm {
        #[command(subcommand)]
        subcommand: LlmSubcommand,
    },

    /// Talk to the active provider
    Chat {
        /// Message to send (omit for an interactive session)
        message: Vec<String>,
    },

    /// Manage project objectives
    Objectives {
        #[command(subcommand)]
        subcommand: ObjectivesSubcommand,
    },

    /// Generate and refine user stories from objectives
    Stories {
        #[command(subcommand)]
        subcommand: StoriesSubcommand,
    },

    /// Generate and refine class/function designs
    Design {
        #[command(subcommand)]
        subcommand: DesignSubcommand,
    },

    /// Generate tests and documentation from the latest design
    Build {
        #[command(subcommand)]
        subcommand: BuildSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        match &cli.command {
            Commands::Build { .. } => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");
    let provider = cli.provider.as_deref();

    let result = match cli.command {
        Commands::Init(opts) => cmd::init::run(&root, opts, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Llm { subcommand } => cmd::llm::run(&root, subcommand, provider, cli.json),
        Commands::Chat { message } => cmd::chat::run(&root, &message.join(" "), provider, cli.json),
        Commands::Objectives { subcommand } => cmd::objectives::run(&root, subcommand, cli.json),
        Commands::Stories { subcommand } => {
            cmd::stories::run(&root, subcommand, provider, cli.json)
        }
        Commands::Design { subcommand } => cmd::design::run(&root, subcommand, provider, cli.json),
        Commands::Build { subcommand } => cmd::build::run(&root, subcommand, provider, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
