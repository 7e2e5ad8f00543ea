// SPDX-FileCopyrightText: 2026 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Template block store operations.
//!
//! The [`TemplateStore`] owns the parsed target file for the duration of one
//! run, and mutates its block set through the add, remove, update, clear,
//! and list operations. The caller decides when to flush the result back to
//! disk, so a fatal error mid-run never leaves a half-rewritten file behind.
//!
//! # Link Expansion
//!
//! Upstream templates sometimes declare "see also X" by embedding X's bare
//! file name as a comment line:
//!
//! ```text
//! # c++.gitignore
//! ```
//!
//! Only lines that are nothing but comment markers, whitespace, and the
//! linked file name count. Prose around the file name disqualifies the line.
//!
//! The store treats such lines as implicit dependency edges. Adding a
//! template transitively adds every template it links to; removing one
//! cleans up everything it pulled in. A per-run __visited set__ guarantees
//! that each identifier is fetched and reported at most once, even when it
//! is reachable through several link paths or a link cycle.

use crate::{
    catalog::{similar_names, suggestion_hint, Catalog},
    document::IgnoreFile,
    fetch::{Fetch, FetchError},
};

use regex::Regex;
use std::{
    collections::HashSet,
    fmt::{Display, Formatter, Result as FmtResult},
    sync::LazyLock,
};
use tracing::debug;

/// Bare reference to another template file, typically inside a comment.
static LINK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#|\s)*([!-.0-~]+/)*([!-.0-~]+)\.gitignore\s*$")
        .expect("invalid link line regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LinkOp {
    Add,
    Remove,
}

/// Block set mutator for one run.
///
/// Owns the parsed target file and records an [`Outcome`] for every
/// per-identifier event, in the order a user would expect to read them.
#[derive(Debug)]
pub struct TemplateStore<'a, F>
where
    F: Fetch,
{
    document: IgnoreFile,
    catalog: &'a Catalog,
    fetcher: F,
    visited: HashSet<String>,
    outcomes: Vec<Outcome>,
}

impl<'a, F> TemplateStore<'a, F>
where
    F: Fetch,
{
    /// Construct new template store over a parsed target file.
    pub fn new(document: IgnoreFile, catalog: &'a Catalog, fetcher: F) -> Self {
        Self {
            document,
            catalog,
            fetcher,
            visited: HashSet::new(),
            outcomes: Vec::new(),
        }
    }

    /// Add or update the template with given identifier.
    ///
    /// Unknown identifiers record an [`Outcome::Unknown`] with suggestions
    /// and leave the store untouched, so one bad name in a listing does not
    /// abort the others. Known identifiers are fetched, expanded for links,
    /// and stored wholesale, replacing any previous block content.
    /// Identifiers already processed this run are a no-op.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Fetch`] if content retrieval fails. This is
    ///   fatal to the run.
    pub fn add(&mut self, name: impl AsRef<str>) -> Result<()> {
        let lower = name.as_ref().to_lowercase();
        if !self.catalog.contains(&lower) {
            self.report_unknown(name.as_ref());
            return Ok(());
        }

        self.add_known(&lower)
    }

    /// Remove the template with given identifier.
    ///
    /// Templates that the removed block links to are removed recursively,
    /// so removing a template cleans up everything it pulled in. Unknown
    /// identifiers and identifiers not currently stored are reported without
    /// failing the run.
    ///
    /// # Errors
    ///
    /// None today. The signature matches [`TemplateStore::add`] so link
    /// expansion can dispatch either operation.
    pub fn remove(&mut self, name: impl AsRef<str>) -> Result<()> {
        let name = name.as_ref();
        let lower = name.to_lowercase();
        if !self.visited.insert(lower.clone()) {
            return Ok(());
        }
        if !self.catalog.contains(&lower) {
            self.report_unknown(name);
            return Ok(());
        }

        match self.document.block_lines(&lower).map(<[String]>::to_vec) {
            Some(lines) => {
                self.expand_links(&lines, &lower, LinkOp::Remove)?;
                self.document.remove_block(&lower);
                self.outcomes.push(Outcome::Removed { name: name.into() });
            }
            None => self.outcomes.push(Outcome::NotInFile { name: name.into() }),
        }

        Ok(())
    }

    /// Re-fetch every currently stored template.
    ///
    /// Runs the add path over a snapshot of the current key set, forcing the
    /// "updated" report for each. Additions triggered by link expansion
    /// beyond the snapshot happen at most once thanks to the visited set.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Fetch`] if any content retrieval fails.
    pub fn update(&mut self) -> Result<()> {
        let snapshot: Vec<String> = self.document.block_names().map(ToString::to_string).collect();
        for name in snapshot {
            self.add_known(&name)?;
        }

        Ok(())
    }

    /// Delete every stored template block. Junk lines are left alone.
    pub fn clear(&mut self) {
        self.document.clear_blocks();
    }

    /// List stored template identifiers in lexicographic order.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.document.block_names().map(ToString::to_string).collect();
        names.sort();

        names
    }

    /// Outcomes recorded so far, in order of occurrence.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Give up ownership of the underlying document for the final rewrite.
    pub fn into_document(self) -> IgnoreFile {
        self.document
    }

    fn add_known(&mut self, lower: &str) -> Result<()> {
        if !self.visited.insert(lower.to_string()) {
            return Ok(());
        }

        let Some(canonical) = self.catalog.resolve(lower).map(ToString::to_string) else {
            self.report_unknown(lower);
            return Ok(());
        };

        debug!("fetch template \"{lower}\" from \"{canonical}\"");
        let lines = self.fetcher.fetch(&canonical)?;
        let updated = self.document.contains_block(lower);

        // Children first, so linked templates land before their parent.
        self.expand_links(&lines, lower, LinkOp::Add)?;

        self.document.insert_block(lower, lines);
        self.outcomes.push(if updated {
            Outcome::Updated { name: lower.into() }
        } else {
            Outcome::Added { name: lower.into() }
        });

        Ok(())
    }

    fn expand_links(&mut self, lines: &[String], parent: &str, op: LinkOp) -> Result<()> {
        for line in lines {
            let Some(child) = link_target(line) else {
                continue;
            };
            if self.visited.contains(&child) {
                continue;
            }

            self.outcomes.push(Outcome::Linked {
                parent: parent.into(),
                child: child.clone(),
            });

            if !self.catalog.contains(&child) {
                self.report_unknown(&child);
                continue;
            }

            match op {
                LinkOp::Add => self.add_known(&child)?,
                LinkOp::Remove => self.remove(&child)?,
            }
        }

        Ok(())
    }

    fn report_unknown(&mut self, name: &str) {
        let similar = similar_names(&name.to_lowercase(), self.catalog.identifiers());
        self.outcomes.push(Outcome::Unknown {
            name: name.into(),
            similar,
        });
    }
}

fn link_target(line: &str) -> Option<String> {
    LINK_LINE
        .captures(line)
        .and_then(|captures| captures.get(3))
        .map(|m| m.as_str().to_lowercase())
}

/// Per-identifier event recorded during one run.
///
/// The [`Display`] form is the exact line the CLI prints for the event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Template fetched and stored for the first time.
    Added { name: String },

    /// Template re-fetched, replacing previous block content.
    Updated { name: String },

    /// Template block deleted from the file.
    Removed { name: String },

    /// Removal requested for a template the file does not contain.
    NotInFile { name: String },

    /// Link expansion followed a dependency edge.
    Linked { parent: String, child: String },

    /// Identifier missing from the catalog, with close-name suggestions.
    Unknown { name: String, similar: Vec<String> },
}

impl Outcome {
    /// Check if this outcome reports a failed identifier.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::NotInFile { .. } | Self::Unknown { .. })
    }
}

impl Display for Outcome {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Added { name } => write!(fmt, "{name} added"),
            Self::Updated { name } => write!(fmt, "{name} updated"),
            Self::Removed { name } => write!(fmt, "{name} removed"),
            Self::NotInFile { name } => write!(fmt, "Error: {name} not in file"),
            Self::Linked { parent, child } => write!(fmt, "{parent} -> {child}"),
            Self::Unknown { name, similar } => {
                write!(fmt, "Error: unknown template \"{name}\"")?;
                let hint = suggestion_hint(similar);
                if !hint.is_empty() {
                    write!(fmt, "\n{hint}")?;
                }

                Ok(())
            }
        }
    }
}

/// Block store operation error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Template content retrieval fails.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Friendly result alias :3
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
