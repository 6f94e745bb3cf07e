//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// vocabsync - reconcile vocabulary notebooks into SQLite
#[derive(Parser, Debug)]
#[command(name = "vocabsync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.vocabsync/data/vocabsync.db)
    #[arg(long, global = true, env = "VOCABSYNC_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the vocabsync database
    Init {
        /// Overwrite existing database
        #[arg(long)]
        force: bool,
    },

    /// Import notebooks, learning histories and dictionary caches
    Import(ImportArgs),

    /// Write notes, learning logs and dictionary entries to JSONL backups
    Export {
        /// Output directory (default: export_directory from config, else ~/.vocabsync/export)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show row counts per table
    Status,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// Directory of story/book notebooks (repeatable)
    #[arg(long = "stories", value_name = "DIR")]
    pub stories: Vec<PathBuf>,

    /// Directory of flashcard notebooks (repeatable)
    #[arg(long = "flashcards", value_name = "DIR")]
    pub flashcards: Vec<PathBuf>,

    /// Directory of learning histories, one file per notebook id
    #[arg(long, value_name = "DIR")]
    pub learning_notes: Option<PathBuf>,

    /// Directory of cached dictionary lookups
    #[arg(long, value_name = "DIR")]
    pub dictionaries: Option<PathBuf>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Refresh meaning/level/dictionary number and dictionary payloads of existing records
    #[arg(long)]
    pub update_existing: bool,
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_import_flags() {
        let cli = Cli::parse_from([
            "vocabsync",
            "import",
            "--stories",
            "a",
            "--stories",
            "b",
            "--learning-notes",
            "logs",
            "--dry-run",
            "--update-existing",
        ]);
        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.stories, [PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(args.learning_notes, Some(PathBuf::from("logs")));
        assert!(args.dry_run);
        assert!(args.update_existing);
        assert!(args.flashcards.is_empty());
    }
}
