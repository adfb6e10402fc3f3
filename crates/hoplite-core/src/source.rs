//! Locating configuration sources.
//!
//! Sources are either plain filesystem paths or resource names looked up
//! under a list of resource roots. Resolution checks every requested source
//! and reports all the missing ones together.

use crate::failure::ConfigFailure;
use crate::result::{ConfigResult, ConfigResultExt, fail, sequence};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    /// A resource `name` found at `path` under one of the resource roots.
    Resource { name: String, path: PathBuf },
}

impl FileSource {
    /// Resolve each path, failing with one `UnknownSource` per missing file
    /// collected into a single `MultipleFailures`.
    pub fn from_paths<I, P>(paths: I) -> ConfigResult<Vec<FileSource>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let results = paths.into_iter().map(|p| {
            let path = p.as_ref();
            if path.is_file() {
                Ok(FileSource::Path(path.to_path_buf()))
            } else {
                tracing::debug!(path = %path.display(), "config file not found");
                fail(ConfigFailure::UnknownSource {
                    identifier: path.display().to_string(),
                })
            }
        });
        sequence(results).wrap_failures(|failures| ConfigFailure::MultipleFailures { failures })
    }

    /// Label used in positions and diagnostics.
    pub fn describe(&self) -> String {
        match self {
            FileSource::Path(path) => path.display().to_string(),
            FileSource::Resource { name, .. } => name.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileSource::Path(path) | FileSource::Resource { path, .. } => path,
        }
    }

    /// Lowercased file extension, if any.
    pub fn ext(&self) -> Option<String> {
        self.path()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }

    pub fn open(&self) -> ConfigResult<String> {
        fs::read_to_string(self.path()).map_err(|err| {
            tracing::debug!(source = %self.describe(), %err, "could not read config source");
            ConfigFailure::UnknownSource {
                identifier: self.describe(),
            }
            .into()
        })
    }
}

/// Directories searched, in order, for resource names.
#[derive(Debug, Clone, Default)]
pub struct ResourceRoots {
    roots: Vec<PathBuf>,
}

impl ResourceRoots {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Find a single resource. A leading `/` on `name` is ignored.
    pub fn find(&self, name: &str) -> Option<FileSource> {
        let relative = name.trim_start_matches('/');
        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
            .map(|path| FileSource::Resource {
                name: name.to_string(),
                path,
            })
    }

    /// Resolve each name, failing with one `UnknownSource` per missing
    /// resource collected into a single `MultipleFailures`.
    pub fn resolve<I, S>(&self, names: I) -> ConfigResult<Vec<FileSource>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let results = names.into_iter().map(|name| {
            let name = name.as_ref();
            match self.find(name) {
                Some(source) => Ok(source),
                None => {
                    tracing::debug!(name, roots = self.roots.len(), "resource not found");
                    fail(ConfigFailure::UnknownSource {
                        identifier: name.to_string(),
                    })
                }
            }
        });
        sequence(results).wrap_failures(|failures| ConfigFailure::MultipleFailures { failures })
    }
}
