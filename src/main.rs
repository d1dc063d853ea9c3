use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotify_mcp::{
    cli,
    config::{self, Config},
    fatal, logging,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Serve Spotify tools over stdio (default)
    Serve,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        fatal!("Cannot load environment. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => fatal!("{}", e),
    };

    let _logging = match logging::init_logging(config.logging_path.as_deref()) {
        Ok(guard) => guard,
        Err(e) => fatal!("Cannot initialize logging. Err: {}", e),
    };

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Auth => cli::auth(Arc::clone(&config)).await,
        Command::Serve => cli::serve(&config).await,
        Command::Completions(_) => Ok(()),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        fatal!("{}", e);
    }
}
