//! txq — command-line tag-query client for a threat-intelligence exchange.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "txq")]
#[command(version = "0.1.0")]
#[command(about = "Query and mutate tag-indexed threat records", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: config::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a tag name to its numeric identifier
    LookUpTagId(commands::lookup_tag::LookupTagArgs),

    /// List identifiers of all records under a tag
    TagToIds(commands::tag_to_ids::TagToIdsArgs),

    /// Fetch full details for explicit record identifiers
    IdsToDetails(commands::ids_to_details::IdsToDetailsArgs),

    /// Fetch full details for all records under a tag
    TagToDetails(commands::tag_to_details::TagToDetailsArgs),

    /// Walk a cursor-paginated listing URL, printing each page
    Paginate(commands::paginate::PaginateArgs),

    /// Submit a new record to the exchange
    Submit(commands::mutate::SubmitArgs),

    /// Update an existing record on the exchange
    Update(commands::mutate::UpdateArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    // An interrupt aborts unconditionally; in-flight requests are not drained.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            output::error("interrupted");
            std::process::exit(1);
        }
    });

    let config = match config::RunConfig::from_args(&cli.global) {
        Ok(c) => c,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    let exit_code = match cli.command {
        Commands::LookUpTagId(args) => commands::lookup_tag::run(args, &config).await,
        Commands::TagToIds(args) => commands::tag_to_ids::run(args, &config).await,
        Commands::IdsToDetails(args) => commands::ids_to_details::run(args, &config).await,
        Commands::TagToDetails(args) => commands::tag_to_details::run(args, &config).await,
        Commands::Paginate(args) => commands::paginate::run(args, &config).await,
        Commands::Submit(args) => commands::mutate::run_submit(args, &config).await,
        Commands::Update(args) => commands::mutate::run_update(args, &config).await,
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
