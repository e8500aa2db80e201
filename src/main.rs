use anyhow::Result;
use clap::{Parser, Subcommand};

use fluxo::cli::{
    handle_audit, handle_classify, handle_config, handle_dashboard, handle_seed, handle_signin,
    handle_signout, handle_signup, handle_whoami, AppContext,
};
use fluxo::models::Direction;

#[derive(Parser)]
#[command(
    name = "fluxo",
    version,
    about = "Personal-finance dashboard in the terminal",
    long_about = "Fluxo categorizes your bank statement lines with simple keyword \
                  rules and keeps a running balance of your account."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        /// E-mail address
        email: String,
        /// CPF or CNPJ, with or without punctuation
        #[arg(short, long)]
        document: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "FLUXO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in to an existing account
    #[command(alias = "login")]
    Signin {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "FLUXO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out of the current account
    #[command(alias = "logout")]
    Signout,

    /// Show the signed-in account
    Whoami,

    /// Show balance, greeting and recent activity
    #[command(alias = "dash")]
    Dashboard {
        /// Print the dashboard state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load demo transactions into an empty account
    Seed,

    /// Classify a statement line with the built-in rules
    Classify {
        /// Raw statement descriptor
        descriptor: String,
        /// Transaction direction (in or out)
        #[arg(short, long, default_value = "out", value_parser = parse_direction)]
        direction: Direction,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Show current configuration and paths
    Config {
        /// Write the settings file with current values
        #[arg(long)]
        save: bool,
    },
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::parse(s).ok_or_else(|| format!("invalid direction '{}': expected in or out", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Fluxo - personal-finance dashboard");
        println!();
        println!("Run 'fluxo --help' for usage information.");
        println!("Run 'fluxo signup <email> --document <cpf>' to get started.");
        return Ok(());
    };

    // classify runs without a data directory
    match command {
        Commands::Classify {
            descriptor,
            direction,
        } => handle_classify(&descriptor, direction)?,
        Commands::Signup {
            email,
            document,
            password,
        } => handle_signup(&AppContext::load()?, &email, &document, password)?,
        Commands::Signin { email, password } => {
            handle_signin(&AppContext::load()?, &email, password)?
        }
        Commands::Signout => handle_signout(&AppContext::load()?)?,
        Commands::Whoami => handle_whoami(&AppContext::load()?)?,
        Commands::Dashboard { json } => handle_dashboard(&AppContext::load()?, json)?,
        Commands::Seed => handle_seed(&AppContext::load()?)?,
        Commands::Audit { limit } => handle_audit(&AppContext::load()?, limit)?,
        Commands::Config { save } => handle_config(&AppContext::load()?, save)?,
    }

    Ok(())
}
