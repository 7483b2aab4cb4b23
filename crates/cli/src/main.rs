//! # supportpilot-cli: A CLI for `supportpilot`
//!
//! This is the main entry point for the `supportpilot` command-line interface.

mod admin;
mod api_client;
mod app;

use anyhow::Result;
use api_client::ApiClient;
use app::{render_turn, App};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use supportpilot::constants::DEFAULT_DB_FILE;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SERVER_URL: &str = "http://localhost:9090";

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with the support assistant through a running server
    Chat(ServerArgs),
    /// Manage the knowledge base in the local database
    Kb(KbArgs),
    /// Inspect captured leads in the local database
    Leads(LeadsArgs),
    /// List the models available to the server's AI provider
    Models(ServerArgs),
}

#[derive(Parser, Debug)]
struct ServerArgs {
    /// Base URL of the supportpilot server
    #[arg(long, env = "SUPPORTPILOT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
}

#[derive(Parser, Debug)]
struct DbArgs {
    /// Path to the SQLite database file
    #[arg(long, default_value = DEFAULT_DB_FILE)]
    db: String,
}

#[derive(Parser, Debug)]
struct KbArgs {
    #[command(subcommand)]
    command: KbCommands,
}

#[derive(Subcommand, Debug)]
enum KbCommands {
    /// Add a question/answer pair
    Add(KbAddArgs),
    /// List every question/answer pair in grounding order
    List(DbArgs),
}

#[derive(Parser, Debug)]
struct KbAddArgs {
    #[arg(long)]
    question: String,
    #[arg(long)]
    answer: String,
    #[command(flatten)]
    db: DbArgs,
}

#[derive(Parser, Debug)]
struct LeadsArgs {
    #[command(subcommand)]
    command: LeadsCommands,
}

#[derive(Subcommand, Debug)]
enum LeadsCommands {
    /// List captured leads, oldest first
    List(DbArgs),
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging to a file so it does not interleave with the chat.
    let log_file = File::create("supportpilot-cli.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Chat(args) => handle_chat(args).await,
        Commands::Kb(args) => handle_kb(args).await,
        Commands::Leads(args) => handle_leads(args).await,
        Commands::Models(args) => handle_models(args).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

// --- Command Handlers ---

async fn handle_chat(args: &ServerArgs) -> Result<()> {
    info!("Starting chat session against {}", args.server_url);
    let mut app = App::new(ApiClient::new(&args.server_url));
    print_new_turns(&mut app);
    println!("(type /help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while app.running {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        app.handle_line(&line).await;
        print_new_turns(&mut app);
        if !app.status.is_empty() {
            println!("{}", app.status);
        }
    }
    info!("Chat session ended.");
    Ok(())
}

fn print_new_turns(app: &mut App<ApiClient>) {
    for turn in app.take_new_turns() {
        if let Some(line) = render_turn(&turn) {
            println!("{line}");
        }
    }
}

async fn handle_kb(args: &KbArgs) -> Result<()> {
    match &args.command {
        KbCommands::Add(add) => {
            let provider = admin::open_database(&add.db.db).await?;
            let record = admin::add_knowledge(&provider, &add.question, &add.answer).await?;
            println!("Added: {}", record.question);
        }
        KbCommands::List(db) => {
            let provider = admin::open_database(&db.db).await?;
            let records = admin::list_knowledge(&provider).await?;
            println!("{}", admin::format_knowledge(&records));
        }
    }
    Ok(())
}

async fn handle_leads(args: &LeadsArgs) -> Result<()> {
    match &args.command {
        LeadsCommands::List(db) => {
            let provider = admin::open_database(&db.db).await?;
            let leads = admin::list_leads(&provider).await?;
            println!("{}", admin::format_leads(&leads));
        }
    }
    Ok(())
}

async fn handle_models(args: &ServerArgs) -> Result<()> {
    let models = ApiClient::new(&args.server_url).list_models().await?;
    if models.is_empty() {
        println!("The provider reported no models.");
    }
    for model in models {
        println!(
            "{} ({})",
            model.sdk_name,
            model.supported_generation_methods.join(", ")
        );
    }
    Ok(())
}
