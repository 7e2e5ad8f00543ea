// SPDX-FileCopyrightText: 2026 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Template content retrieval.
//!
//! Template content comes from one of two sources: the upstream template
//! repository over HTTP, or a local clone of it on disk. Both sit behind the
//! [`Fetch`] trait so the store logic never cares which one it talks to.
//!
//! Fetches are blocking, one per distinct template per run. There is no
//! retry or timeout policy; a failed fetch is fatal to the whole run, which
//! is safe because the target file only gets rewritten after every requested
//! operation has completed.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

/// Default upstream template repository.
pub const UPSTREAM_URL: &str = "https://raw.githubusercontent.com/github/gitignore/master/";

/// Layer of indirection for template content retrieval.
pub trait Fetch {
    /// Retrieve template content lines for given canonical catalog path.
    ///
    /// Every returned line keeps a trailing newline, including the last one.
    fn fetch(&self, canonical: &str) -> Result<Vec<String>>;
}

/// Template retrieval from the upstream repository over HTTP.
#[derive(Debug)]
pub struct RemoteSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteSource {
    /// Construct new remote source for given base URL.
    ///
    /// # Errors
    ///
    /// - Return [`FetchError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Construct new remote source for the upstream template repository.
    ///
    /// # Errors
    ///
    /// - Return [`FetchError::Http`] if the HTTP client cannot be built.
    pub fn upstream() -> Result<Self> {
        Self::new(UPSTREAM_URL)
    }
}

impl Fetch for RemoteSource {
    fn fetch(&self, canonical: &str) -> Result<Vec<String>> {
        let url = format!("{}{}.gitignore", self.base_url, canonical);
        debug!("fetch {url}");

        let response = self.client.get(&url).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                canonical: canonical.to_string(),
            });
        }
        let text = response.error_for_status()?.text()?;

        Ok(split_lines(&text))
    }
}

/// Template retrieval from a local clone of the template repository.
#[derive(Clone, Debug)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    /// Construct new local source rooted at given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the local template clone.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetch for LocalSource {
    fn fetch(&self, canonical: &str) -> Result<Vec<String>> {
        let path = self.root.join(format!("{canonical}.gitignore"));
        debug!("read template at {}", path.display());

        let text = std::fs::read_to_string(&path).map_err(|err| FetchError::ReadTemplate {
            source: err,
            path,
        })?;

        Ok(split_lines(&text))
    }
}

/// Split fetched text into lines that keep their trailing newline.
///
/// The last line gets one appended if the source lacked it.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split_inclusive('\n').map(ToString::to_string).collect();
    if let Some(last) = lines.last_mut() {
        if !last.ends_with('\n') {
            last.push('\n');
        }
    }

    lines
}

/// Template source selected for one run.
///
/// Mode selection happens outside the store logic: the CLI picks local when
/// a local template directory has been persisted, remote otherwise.
#[derive(Debug)]
pub enum TemplateSource {
    /// Fetch from the upstream repository over HTTP.
    Remote(RemoteSource),

    /// Fetch from a local clone of the template repository.
    Local(LocalSource),
}

impl Fetch for TemplateSource {
    fn fetch(&self, canonical: &str) -> Result<Vec<String>> {
        match self {
            Self::Remote(source) => source.fetch(canonical),
            Self::Local(source) => source.fetch(canonical),
        }
    }
}

/// Template retrieval error types.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Upstream repository has no template at the requested path.
    #[error("template \"{canonical}\" not found upstream")]
    NotFound { canonical: String },

    /// HTTP transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Local template file cannot be read.
    #[error("failed to read template at {:?}", path.display())]
    ReadTemplate {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = FetchError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn local_source_reads_template_lines() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        std::fs::write(root.path().join("Python.gitignore"), "__pycache__/\n*.pyc")?;

        let source = LocalSource::new(root.path());
        let lines = source.fetch("Python")?;

        assert_eq!(lines, ["__pycache__/\n", "*.pyc\n"]);

        Ok(())
    }

    #[test]
    fn local_source_resolves_grouped_paths() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        std::fs::create_dir(root.path().join("Global"))?;
        std::fs::write(root.path().join("Global/Redis.gitignore"), "*.rdb\n")?;

        let source = LocalSource::new(root.path());
        let lines = source.fetch("Global/Redis")?;

        assert_eq!(lines, ["*.rdb\n"]);

        Ok(())
    }

    #[test]
    fn local_source_missing_template_is_an_error() {
        let source = LocalSource::new("/no/such/dir");

        let result = source.fetch("Python");

        assert!(matches!(result, Err(FetchError::ReadTemplate { .. })));
    }

    #[test]
    fn split_lines_normalizes_final_newline() {
        assert_eq!(split_lines(""), Vec::<String>::new());
        assert_eq!(split_lines("a\nb\n"), ["a\n", "b\n"]);
        assert_eq!(split_lines("a\nb"), ["a\n", "b\n"]);
    }
}
