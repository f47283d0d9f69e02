use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use log::info;
use std::path::PathBuf;
use token_desk::app::App;
use token_desk::config::Config;
use token_desk::ui::{self, formatters::format_price};

#[derive(Parser)]
#[command(name = "token-desk")]
#[command(about = "Token prices, user listing and AI answers", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format a price for display
    Price {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Look up a token by contract / mint address
    Token { address: String },
    /// Load and list users
    Users,
    /// Ask the AI a question
    Ask {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    // Formatting needs neither config nor network
    if let Command::Price { value } = cli.command {
        println!("{}", format_price(value));
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut app = App::new(config)?;
    info!("token-desk v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Price { .. } => {}
        Command::Token { address } => match app.lookup_token(&address).await {
            Ok(token) => println!("{}", ui::render_token_info(&token)),
            Err(e) => eprintln!("Error: {}", e),
        },
        Command::Users => {
            let mut states = app.subscribe_users();
            while let Some(state) = states.next().await {
                println!("{}", ui::render_user_state(&state));
            }
        }
        Command::Ask { prompt } => {
            println!("{}", app.ask(&prompt.join(" ")).await);
        }
    }

    Ok(())
}
