//! Import command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::ImportArgs;
use crate::config::{load_config, SourceOverrides};
use crate::error::{Error, Result};
use crate::source::SourceSet;
use crate::sync::{ImportOptions, ImportResult, Importer, Reporter};

#[derive(Serialize)]
struct ImportOutput {
    dry_run: bool,
    refresh_existing: bool,
    result: ImportResult,
}

/// Execute the import command.
///
/// Prints one line per record and a summary. With `--json` only the final
/// counters are printed.
///
/// # Errors
///
/// Returns an error if no sources are configured, a source cannot be loaded,
/// or a phase fails. Counters of the phases that completed are still printed.
pub fn execute(args: &ImportArgs, db_path: Option<&PathBuf>, json: bool, quiet: bool) -> Result<()> {
    let config = load_config()?;
    let paths = config.source_paths(&SourceOverrides {
        stories: args.stories.clone(),
        flashcards: args.flashcards.clone(),
        learning_notes: args.learning_notes.clone(),
        dictionaries: args.dictionaries.clone(),
    });

    if paths.stories.is_empty()
        && paths.flashcards.is_empty()
        && paths.learning_notes.is_none()
        && paths.dictionaries.is_none()
    {
        return Err(Error::InvalidArgument(
            "No source directories given; pass --stories, --flashcards, --learning-notes or --dictionaries".to_string(),
        ));
    }

    let sources = SourceSet::load(&paths).map_err(|e| Error::Source(format!("{e:#}")))?;
    let mut storage = super::open_storage(db_path)?;

    let options = ImportOptions {
        dry_run: args.dry_run,
        refresh_existing: args.update_existing,
    };

    let mut stdout = io::stdout();
    let mut silent = io::sink();
    let sink: &mut dyn Write = if json || quiet { &mut silent } else { &mut stdout };
    let mut reporter = Reporter::new(sink);

    let mut result = ImportResult::default();
    let outcome = Importer::new(&mut storage, options).import_all(&sources, &mut reporter, &mut result);

    if json {
        if outcome.is_ok() {
            let output = ImportOutput {
                dry_run: options.dry_run,
                refresh_existing: options.refresh_existing,
                result,
            };
            println!("{}", serde_json::to_string(&output)?);
        }
    } else if !quiet {
        reporter
            .summary(&result, options.dry_run)
            .map_err(|e| Error::Other(e.to_string()))?;
    }

    outcome
}
