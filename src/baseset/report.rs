//! Per-file verification results of a selected set

use std::fmt::Write;

use super::{FileRole, MediaSet};
use crate::checksums::ChecksumResult;
use crate::grf::SearchPaths;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub role: &'static str,
    pub filename: String,
    pub result: ChecksumResult,
    pub missing_warning: String,
}

/// Outcome of checking every file of a set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompletenessReport {
    set_type: &'static str,
    set_name: String,
    entries: Vec<ReportEntry>,
}

impl IncompletenessReport {
    /// Verify every file of `set`; one failing file never stops the others
    /// from being checked.
    pub fn check<S: MediaSet>(set: &S, search: &SearchPaths) -> Self {
        let resources = set.resources();
        let entries = resources
            .files
            .iter()
            .map(|(role, file)| ReportEntry {
                role: role.name(),
                filename: file.filename.clone(),
                result: S::check_file(file, search),
                missing_warning: file.missing_warning.clone(),
            })
            .collect();

        Self {
            set_type: S::MESSAGE_NAME,
            set_name: resources.name.clone(),
            entries,
        }
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| e.result != ChecksumResult::Match)
    }

    /// User message listing every corrupt or missing file, `None` when the
    /// set is complete
    pub fn message(&self) -> Option<String> {
        if self.is_complete() {
            return None;
        }

        let mut msg = format!(
            "Trying to load {} set '{}', but it is incomplete. The game will probably not run \
             correctly until you properly install this set or select another one. See section \
             4.1 of readme.txt.\n\nThe following files are corrupted or missing:\n",
            self.set_type, self.set_name
        );
        for entry in self.failures() {
            let _ = writeln!(
                msg,
                "\t{} is {} ({})",
                entry.filename, entry.result, entry.missing_warning
            );
        }
        Some(msg)
    }
}
