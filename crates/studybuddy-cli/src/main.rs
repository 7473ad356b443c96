use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studybuddy-cli", version, about = "StudyBuddy CLI")]
struct Cli {
    /// Profile to operate on (defaults to the configured profile)
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank inspection, XP and decay
    Rank {
        #[command(subcommand)]
        action: commands::rank::RankAction,
    },
    /// Qualifying activities that reset the decay clock
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Focus session tracking
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Challenge progress
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Daily study streak
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Stored profile data
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();
    let result = match cli.command {
        Commands::Rank { action } => commands::rank::run(profile, action),
        Commands::Activity { action } => commands::activity::run(profile, action),
        Commands::Session { action } => commands::session::run(profile, action),
        Commands::Challenge { action } => commands::challenge::run(profile, action),
        Commands::Streak { action } => commands::streak::run(profile, action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(profile, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
