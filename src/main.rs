use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::cli::{
    handle_income, handle_month, handle_remove, handle_spend, handle_year, EntryArgs, MonthArgs,
    YearArgs,
};
use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
use expense_tracker::display::DisplayOptions;
use expense_tracker::logging::init_tracing;
use expense_tracker::models::UserId;
use expense_tracker::services::DataManager;
use expense_tracker::storage::JsonEventStore;
use expense_tracker::TrackerError;

#[derive(Parser)]
#[command(
    name = "expense",
    version,
    about = "Track spending and income by month and year",
    long_about = "Record what you spend and earn, then browse the totals one \
                  month or one year at a time from the command line."
)]
struct Cli {
    /// User whose records are read and written (overrides the configured user)
    #[arg(short, long, global = true, env = "EXPENSE_TRACKER_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Record a spending entry
    Spend {
        #[command(flatten)]
        entry: EntryArgs,
        /// Spending category
        #[arg(short, long)]
        category: String,
    },

    /// Record an income entry
    Income {
        #[command(flatten)]
        entry: EntryArgs,
        /// Where the money came from
        #[arg(short, long, default_value = "")]
        source: String,
    },

    /// Remove a record or income entry by id
    #[command(alias = "rm")]
    Remove {
        /// Full id as printed by `month` (rec-... or inc-...)
        id: String,
        /// Treat an unprefixed id as an income entry
        #[arg(long)]
        income: bool,
    },

    /// Show a month overview
    Month(MonthArgs),

    /// Show a year overview
    Year(YearArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TrackerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("expense - track spending and income");
        println!();
        println!("Run 'expense --help' for usage information.");
        println!("Run 'expense init' to get started.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            if paths.is_initialized() {
                println!(
                    "Expense tracker is already initialized at: {}",
                    paths.base_dir().display()
                );
                return Ok(());
            }
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'expense spend 12.50 -c Food' to record your first expense.");
        }
        Commands::Config => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Events file:     {}", paths.events_file().display());
            println!(
                "Initialized:     {}",
                if paths.is_initialized() { "yes" } else { "no" }
            );
            println!();
            println!("Settings:");
            println!("  User:          {}", settings.user_id);
            println!("  Currency:      {}", settings.currency_symbol);
            println!("  Date format:   {}", settings.date_format);
            println!("  Chart width:   {}", settings.chart_width);
        }
        command => {
            let manager = open_manager(&paths, &settings, cli.user.as_deref())?;
            let options = DisplayOptions::from(&settings);

            match command {
                Commands::Spend { entry, category } => handle_spend(&manager, entry, category)?,
                Commands::Income { entry, source } => handle_income(&manager, entry, source)?,
                Commands::Remove { id, income } => handle_remove(&manager, &id, income)?,
                Commands::Month(args) => handle_month(&manager, &options, args)?,
                Commands::Year(args) => handle_year(&manager, &options, args)?,
                Commands::Init | Commands::Config => {}
            }
        }
    }

    Ok(())
}

fn open_manager(
    paths: &TrackerPaths,
    settings: &Settings,
    user_override: Option<&str>,
) -> Result<DataManager> {
    let user = match user_override {
        Some(id) => UserId::new(id)
            .ok_or_else(|| TrackerError::Config(format!("Invalid user id: '{}'", id)))?,
        None => settings.user()?,
    };

    paths.ensure_directories()?;
    let store = JsonEventStore::open(paths.events_file())?;
    Ok(DataManager::new(Arc::new(store), user))
}
