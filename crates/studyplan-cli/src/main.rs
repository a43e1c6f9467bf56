use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Study planner dashboard CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login, logout and session status
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Greeting, today's stats and today's plan
    Home(commands::home::HomeArgs),
    /// Generated study plan
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Subjects and chapters
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Task listing and completion
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Month calendar of tasks
    Calendar(commands::calendar::CalendarArgs),
    /// Pomodoro timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Personal notepad
    Notes {
        #[command(subcommand)]
        action: commands::notes::NotesAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions { shell: Shell },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action).await,
        Commands::Home(args) => commands::home::run(args).await,
        Commands::Plan { action } => commands::plan::run(action).await,
        Commands::Subject { action } => commands::subject::run(action).await,
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Calendar(args) => commands::calendar::run(args).await,
        Commands::Timer { action } => commands::timer::run(action).await,
        Commands::Notes { action } => commands::notes::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "studyplan", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
