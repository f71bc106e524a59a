use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lookuptui::app::{App, RestoreGuard};
use lookuptui::config::{Config, WidgetConfig};
use lookuptui::logging;
use lookuptui::lookups::joke::{fetch_jokes_in_order, format_numbered, JokeFetcher};
use lookuptui::lookups::LookupKind;
use lookuptui::surface::{ConsoleDisplay, FixedInput};
use lookuptui::widget::LookupWidget;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

#[derive(Parser)]
#[command(name = "lookuptui")]
#[command(about = "Verse, phone, weather and joke lookups in your terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/lookuptui/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file for the dashboard (default: ~/.cache/lookuptui/lookuptui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a bible verse or passage, e.g. `verse john 3:16`
    Verse {
        #[arg(required = true)]
        reference: Vec<String>,
    },
    /// Validate a phone number
    Phone { number: String },
    /// Show current weather for a city
    Weather {
        #[arg(required = true)]
        city: Vec<String>,
    },
    /// Print random jokes in the order they were fetched
    Joke {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path.or_else(Config::default_path) {
        Some(path) => Config::load(&path),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => run_dashboard(cli.config, cli.log_file).await,
        Some(command) => run_command(cli.config, command).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_dashboard(config: Option<PathBuf>, log_file: Option<PathBuf>) -> Result<ExitCode> {
    let config = load_config(config)?;
    logging::init_file(log_file)?;

    let mut app = App::new(&config);

    enable_raw_mode().context("Failed to enable raw mode")?;
    // Runs on every exit path below, early `?` returns included.
    let _restore = RestoreGuard::new(|| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    });

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = app.run(&mut terminal).await;
    terminal.show_cursor()?;

    result.map(|_| ExitCode::SUCCESS)
}

async fn run_command(config: Option<PathBuf>, command: Commands) -> Result<ExitCode> {
    logging::init_stderr()?;
    let config = load_config(config)?;

    let (kind, query) = match command {
        Commands::Joke { count } => return print_jokes(&config, count).await,
        Commands::Verse { reference } => (LookupKind::Verse, reference.join(" ")),
        Commands::Phone { number } => (LookupKind::Phone, number),
        Commands::Weather { city } => (LookupKind::Weather, city.join(" ")),
    };

    let widget_config = config.widget_for(kind);
    let widget = LookupWidget::from_config(
        &widget_config,
        Arc::new(FixedInput::new(query)),
        Arc::new(ConsoleDisplay),
    )?;

    match widget.handle_trigger().await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(widget = kind.label(), error = %e, "lookup failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn print_jokes(config: &Config, count: usize) -> Result<ExitCode> {
    let base_url = match config.widget_for(LookupKind::Joke) {
        WidgetConfig::Joke(c) => c.base_url,
        _ => None,
    };
    let fetcher = JokeFetcher::new(base_url);

    let run = fetch_jokes_in_order(&fetcher, count, |i, joke| {
        println!("{}", format_numbered(i, joke));
    })
    .await;

    match run {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "failed to fetch the joke");
            eprintln!("{}", LookupKind::Joke.failure_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
