use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pocket_ledger::cli::{
    handle_account_command, handle_category_command, handle_export_command,
    handle_import_command, handle_operation_command, handle_report_command, FormatArg, Workspace,
};
use pocket_ledger::config::{paths::LedgerPaths, settings::Settings};
use pocket_ledger::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Accounts, categories and operations with JSON/CSV/YAML import and export",
    long_about = "pocket-ledger keeps a small personal or business ledger in a single \
                  snapshot file. Each command loads the file, applies one change, and \
                  writes it back atomically."
)]
struct Cli {
    /// Working ledger file (format taken from the extension)
    #[arg(short, long, global = true, env = "POCKET_LEDGER_FILE")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(pocket_ledger::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(pocket_ledger::cli::CategoryCommands),

    /// Operation management commands
    #[command(subcommand, alias = "op")]
    Operation(pocket_ledger::cli::OperationCommands),

    /// Export the whole ledger to a file
    Export {
        /// Output file path
        output: PathBuf,
        /// Output format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Import a ledger file, replacing the working ledger
    Import {
        /// Input file path
        input: PathBuf,
        /// Input format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Keep existing data; entities with matching IDs are replaced
        #[arg(long)]
        merge: bool,
    },

    /// Income and expense report for a period
    Report {
        /// Start date (YYYY-MM-DD, default first of this month)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, default today)
        #[arg(long)]
        to: Option<String>,
        /// Limit to one account (name or ID)
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter);

    let ledger_file = cli.file.unwrap_or_else(|| paths.default_ledger_file());

    let command = match cli.command {
        Some(Commands::Config) => {
            println!("pocket-ledger Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Exports directory: {}", paths.exports_dir().display());
            println!("Working ledger:   {}", ledger_file.display());
            println!();
            println!("Settings:");
            println!("  Default format: {}", settings.default_format);
            println!("  Pretty JSON:    {}", settings.pretty_json);
            println!("  Log filter:     {}", settings.log_filter);
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("pocket-ledger - accounts, categories and operations");
            println!();
            println!("Run 'ledger --help' for usage information.");
            return Ok(());
        }
    };

    let workspace = Workspace::open(ledger_file, &settings)?;
    let storage = workspace.storage();

    let changed = match command {
        Commands::Account(cmd) => handle_account_command(storage, cmd)?,
        Commands::Category(cmd) => handle_category_command(storage, cmd)?,
        Commands::Operation(cmd) => handle_operation_command(storage, cmd)?,
        Commands::Export { output, format } => {
            handle_export_command(storage, &settings, &output, format)?;
            false
        }
        Commands::Import {
            input,
            format,
            merge,
        } => {
            handle_import_command(storage, &settings, &input, format, merge)?;
            true
        }
        Commands::Report { from, to, account } => {
            handle_report_command(storage, from, to, account)?;
            false
        }
        Commands::Config => false,
    };

    if changed {
        workspace.save()?;
    }

    Ok(())
}
