//! Note reconciliation.
//!
//! Every vocabulary occurrence is matched against existing notes by
//! (usage, entry). Unknown pairs become a new note plus its first notebook
//! link, written atomically. Known pairs are skipped or refreshed, and the
//! occurrence's notebook link is added if missing.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::model::{Note, NotebookKind, NotebookLink};
use crate::source::Occurrence;
use crate::storage::NoteRepository;
use crate::sync::report::{Outcome, Reporter};
use crate::sync::types::{ImportOptions, ImportResult, SyncError, SyncResult};

type LinkKey = (String, NotebookKind, String, String);

/// Reconciles notebook occurrences into notes and notebook links.
///
/// In dry-run mode nothing is written; notes and links that would have been
/// created are kept in memory so repeated keys in the same input are counted
/// the way a real run would count them.
pub struct NoteImporter<'a, R: NoteRepository + ?Sized> {
    repo: &'a mut R,
    options: ImportOptions,
    planned: Vec<Note>,
    planned_index: HashMap<(String, String), usize>,
    planned_links: HashSet<LinkKey>,
}

impl<'a, R: NoteRepository + ?Sized> NoteImporter<'a, R> {
    #[must_use]
    pub fn new(repo: &'a mut R, options: ImportOptions) -> Self {
        Self {
            repo,
            options,
            planned: Vec::new(),
            planned_index: HashMap::new(),
            planned_links: HashSet::new(),
        }
    }

    /// Import every occurrence in order.
    ///
    /// # Errors
    ///
    /// Returns the first repository failure, wrapped with the failing step
    /// and the `usage/entry` being processed. Nothing after it is attempted.
    pub fn import(
        &mut self,
        occurrences: &[Occurrence<'_>],
        reporter: &mut Reporter<'_>,
    ) -> SyncResult<ImportResult> {
        let mut result = ImportResult::default();

        for occurrence in occurrences {
            self.import_occurrence(occurrence, &mut result, reporter)?;
        }

        info!(
            new = result.notes_new,
            skipped = result.notes_skipped,
            updated = result.notes_updated,
            links_new = result.links_new,
            links_skipped = result.links_skipped,
            dry_run = self.options.dry_run,
            "Notes reconciled"
        );
        Ok(result)
    }

    /// Notes a dry run would have created, in creation order.
    ///
    /// Always empty after a real run.
    #[must_use]
    pub fn into_planned_notes(self) -> Vec<Note> {
        self.planned
    }

    fn import_occurrence(
        &mut self,
        occurrence: &Occurrence<'_>,
        result: &mut ImportResult,
        reporter: &mut Reporter<'_>,
    ) -> SyncResult<()> {
        let definition = occurrence.definition;
        let usage = definition.usage();
        let entry = definition.entry();
        let key = format!("{usage}/{entry}");

        let existing = self
            .lookup(usage, entry)
            .map_err(SyncError::repository("find note", &key))?;

        let Some(mut note) = existing else {
            let note = Note::new(usage, entry)
                .with_content(&definition.meaning, &definition.level, definition.dictionary_number)
                .with_attachments(definition.images.clone(), definition.references.clone());
            let link = new_link(&note.id, occurrence);

            if !self.options.dry_run {
                self.repo
                    .create_note(&note, &link)
                    .map_err(SyncError::repository("create note", &key))?;
            }
            debug!(usage, entry, note_id = %note.id, "New note");

            result.notes_new += 1;
            result.links_new += 1;
            reporter.record(Outcome::New, "note", &describe_note(usage, entry))?;
            reporter.record(Outcome::New, "link", &describe_link(usage, occurrence))?;
            self.plan(note, &link);
            return Ok(());
        };

        if self.options.refresh_existing {
            note.meaning.clone_from(&definition.meaning);
            note.level.clone_from(&definition.level);
            note.dictionary_number = definition.dictionary_number;

            if self.options.dry_run {
                if let Some(&idx) = self.planned_index.get(&(note.usage.clone(), note.entry.clone())) {
                    self.planned[idx] = note.clone();
                }
            } else {
                self.repo
                    .update_note(&note)
                    .map_err(SyncError::repository("update note", &key))?;
            }
            debug!(usage, entry, note_id = %note.id, "Updated note");
            result.notes_updated += 1;
            reporter.record(Outcome::Update, "note", &describe_note(usage, entry))?;
        } else {
            debug!(usage, entry, note_id = %note.id, "Note exists");
            result.notes_skipped += 1;
            reporter.record(Outcome::Skip, "note", &describe_note(usage, entry))?;
        }

        self.reconcile_link(&note, occurrence, &key, result, reporter)
    }

    fn lookup(&self, usage: &str, entry: &str) -> crate::Result<Option<Note>> {
        if self.options.dry_run {
            if let Some(&idx) = self
                .planned_index
                .get(&(usage.to_string(), entry.to_string()))
            {
                return Ok(Some(self.planned[idx].clone()));
            }
        }
        self.repo.find_note(usage, entry)
    }

    fn reconcile_link(
        &mut self,
        note: &Note,
        occurrence: &Occurrence<'_>,
        key: &str,
        result: &mut ImportResult,
        reporter: &mut Reporter<'_>,
    ) -> SyncResult<()> {
        let link = new_link(&note.id, occurrence);

        let exists = self.planned_links.contains(&link.key())
            || self
                .repo
                .notebook_link_exists(&note.id, link.notebook_kind, &link.notebook_id, &link.group)
                .map_err(SyncError::repository("find notebook link", key))?;

        if exists {
            result.links_skipped += 1;
            reporter.record(Outcome::Skip, "link", &describe_link(&note.usage, occurrence))?;
            return Ok(());
        }

        if self.options.dry_run {
            self.planned_links.insert(link.key());
        } else {
            self.repo
                .create_notebook_link(&link)
                .map_err(SyncError::repository("create notebook link", key))?;
        }
        debug!(note_id = %note.id, notebook_id = %link.notebook_id, group = %link.group, "New notebook link");
        result.links_new += 1;
        reporter.record(Outcome::New, "link", &describe_link(&note.usage, occurrence))?;
        Ok(())
    }

    fn plan(&mut self, note: Note, link: &NotebookLink) {
        if !self.options.dry_run {
            return;
        }
        self.planned_links.insert(link.key());
        self.planned_index
            .insert((note.usage.clone(), note.entry.clone()), self.planned.len());
        self.planned.push(note);
    }
}

fn new_link(note_id: &str, occurrence: &Occurrence<'_>) -> NotebookLink {
    NotebookLink {
        note_id: note_id.to_string(),
        notebook_kind: occurrence.kind,
        notebook_id: occurrence.notebook_id.to_string(),
        group: occurrence.group.to_string(),
        subgroup: occurrence.subgroup.to_string(),
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

fn describe_note(usage: &str, entry: &str) -> String {
    if usage == entry {
        usage.to_string()
    } else {
        format!("{usage} -> {entry}")
    }
}

fn describe_link(usage: &str, occurrence: &Occurrence<'_>) -> String {
    format!(
        "{usage} in {} {} / {}",
        occurrence.kind, occurrence.notebook_id, occurrence.group
    )
}
