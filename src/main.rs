use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shelf::cli::{
    handle_audit_command, handle_backup_command, handle_book_command, handle_export_command,
    handle_loan_command, handle_return_command, handle_search_command, handle_stats_command,
    AuditArgs, BackupCommands, BookCommands, ExportArgs, SearchArgs, StatsArgs,
};
use shelf::config::{paths::LibraryPaths, settings::Settings};
use shelf::storage::{initialize_storage, Storage};

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "SHELF_LOG";

#[derive(Parser)]
#[command(
    name = "shelf",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based book catalog with loan tracking",
    long_about = "shelf keeps a catalog of your books in a JSON file, records who \
                  borrowed what and when it is due back, and answers searches and \
                  statistics from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the catalog, seeding example books into an empty one
    Init {
        /// Do not add the example books
        #[arg(long)]
        no_samples: bool,
    },

    /// Show current configuration and paths
    Config,

    /// Book management commands
    #[command(subcommand)]
    Book(BookCommands),

    /// Search titles, authors and ISBNs
    #[command(alias = "find")]
    Search(SearchArgs),

    /// Lend a book
    Loan {
        /// ISBN of the book
        isbn: String,
        /// Who is borrowing it
        borrower: String,
        /// Loan date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Take a loaned book back
    Return {
        /// ISBN of the book
        isbn: String,
    },

    /// Show catalog statistics
    Stats(StatsArgs),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Export the catalog
    Export(ExportArgs),

    /// Show recent catalog changes
    Audit(AuditArgs),
}

fn init_tracing(settings: &Settings) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LibraryPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    let report = storage.load_or_recover()?;
    tracing::debug!(loaded = report.loaded, skipped = report.skipped, "catalog loaded");

    match cli.command {
        Some(Commands::Init { no_samples }) => {
            println!("Initializing shelf at: {}", paths.base_dir().display());
            let seeded = initialize_storage(&storage, settings.seed_examples && !no_samples)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if seeded > 0 {
                println!("Added {} example books.", seeded);
                println!("Run 'shelf book list' to see them.");
            }
        }
        Some(Commands::Config) => {
            println!("shelf Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Catalog file:     {}", paths.catalog_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Date format:      {}", settings.date_format);
            println!("  Seed examples:    {}", settings.seed_examples);
            println!("  Log level:        {}", settings.log_level);
            println!(
                "  Backup retention: {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }
        Some(Commands::Book(cmd)) => handle_book_command(&storage, &settings, cmd)?,
        Some(Commands::Search(args)) => handle_search_command(&storage, &settings, args)?,
        Some(Commands::Loan {
            isbn,
            borrower,
            date,
        }) => handle_loan_command(&storage, &settings, &isbn, &borrower, date.as_deref())?,
        Some(Commands::Return { isbn }) => handle_return_command(&storage, &isbn)?,
        Some(Commands::Stats(args)) => handle_stats_command(&storage, args)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&storage, &settings, cmd)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, args)?,
        Some(Commands::Audit(args)) => handle_audit_command(&storage, args)?,
        None => {
            println!("shelf - Terminal-based book catalog");
            println!();
            println!("Run 'shelf --help' for usage information.");
            println!("Run 'shelf init' to create a catalog with example books.");
        }
    }

    Ok(())
}
