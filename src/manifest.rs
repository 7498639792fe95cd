//! Task-list building from JSON manifests or a single URL.
//!
//! A manifest maps names to URLs or to nested name-to-URL mappings. A string
//! value is a leaf: one render task whose filename is `<name>.pdf` under the
//! current base path. An object value creates the matching directory and
//! recurses. Any other JSON value is ignored. Tasks whose destination file
//! already exists are skipped, which makes re-runs idempotent: only the
//! pages that are still missing get rendered.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use url2pdf_core::manifest::build_from_manifest;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let build = build_from_manifest(Path::new("courses.json"), Path::new(""))?;
//! println!("{} pages to render, {} skipped", build.len(), build.skipped_count());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::queue::RenderTask;

/// Errors that can occur while building the task list.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        /// The manifest path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest file is not valid JSON.
    #[error("manifest {path} is not valid JSON: {source}")]
    Parse {
        /// The manifest path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The manifest root is not a JSON object, so there is nothing to walk.
    #[error("manifest root must be a JSON object, got {found}")]
    RootNotObject {
        /// The JSON type that was found instead.
        found: &'static str,
    },

    /// A destination directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An output path could not be resolved to an absolute path.
    #[error("failed to resolve output path {path}: {source}")]
    Resolve {
        /// The path that could not be resolved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A manifest entry maps a name to an empty URL.
    #[error("empty URL for entry {title:?}")]
    EmptyUrl {
        /// The entry name with the empty URL.
        title: String,
    },
}

/// Result of building the task list: tasks to render plus the destinations
/// that were skipped because they already exist.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Tasks to render, in manifest document order.
    pub tasks: Vec<RenderTask>,
    /// Destinations skipped because the file already exists.
    pub skipped: Vec<PathBuf>,
}

impl BuildResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no tasks were built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the number of tasks to render.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the number of skipped destinations.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Builds the task list from a JSON manifest file (bulk mode).
///
/// Destination paths are rooted at `output_root`; pass an empty path to
/// render relative to the working directory. Directories for nested
/// mappings are created eagerly, so an empty mapping still produces its
/// directory.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, its root is
/// not a JSON object, an entry maps to an empty URL, or a destination
/// directory cannot be created.
pub fn build_from_manifest(
    manifest_path: &Path,
    output_root: &Path,
) -> Result<BuildResult, ManifestError> {
    let text = fs::read_to_string(manifest_path).map_err(|source| ManifestError::Read {
        path: manifest_path.to_path_buf(),
        source,
    })?;
    let root: Value = serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
        path: manifest_path.to_path_buf(),
        source,
    })?;
    let Value::Object(node) = root else {
        return Err(ManifestError::RootNotObject {
            found: json_type_name(&root),
        });
    };

    let mut result = BuildResult::new();
    walk(&node, output_root, "", &mut result)?;
    Ok(result)
}

/// Builds a single-task list for one URL (direct mode).
///
/// The task title is derived from the output file stem and the logical
/// directory from the output's parent. The parent directory is created if
/// missing; an already-existing destination yields an empty task list.
///
/// # Errors
///
/// Returns an error if the URL is empty, the output path cannot be
/// resolved, or the parent directory cannot be created.
pub fn build_direct(url: &str, output: &Path) -> Result<BuildResult, ManifestError> {
    let output = std::path::absolute(output).map_err(|source| ManifestError::Resolve {
        path: output.to_path_buf(),
        source,
    })?;

    let title = output
        .file_stem()
        .or_else(|| output.file_name())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    if url.is_empty() {
        return Err(ManifestError::EmptyUrl { title });
    }

    let dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(&dir).map_err(|source| ManifestError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }

    let mut result = BuildResult::new();
    if output.exists() {
        debug!(path = %output.display(), "destination already exists");
        result.skipped.push(output);
    } else {
        result.tasks.push(RenderTask::new(
            title,
            url,
            output,
            dir.to_string_lossy().into_owned(),
        ));
    }
    Ok(result)
}

/// Recursively walks one manifest object.
///
/// `base` is the on-disk directory for this level; `dir` is the logical
/// directory used for error grouping (empty at the root).
fn walk(
    node: &Map<String, Value>,
    base: &Path,
    dir: &str,
    result: &mut BuildResult,
) -> Result<(), ManifestError> {
    for (key, value) in node {
        match value {
            Value::String(url) => {
                if url.is_empty() {
                    return Err(ManifestError::EmptyUrl { title: key.clone() });
                }
                let file_path = base.join(format!("{key}.pdf"));
                if file_path.exists() {
                    debug!(path = %file_path.display(), "destination already exists");
                    result.skipped.push(file_path);
                } else {
                    result
                        .tasks
                        .push(RenderTask::new(key.clone(), url.clone(), file_path, dir));
                }
            }
            Value::Object(children) => {
                let child_base = base.join(key);
                fs::create_dir_all(&child_base).map_err(|source| ManifestError::CreateDir {
                    path: child_base.clone(),
                    source,
                })?;
                let child_dir = if dir.is_empty() {
                    key.clone()
                } else {
                    format!("{dir}/{key}")
                };
                walk(children, &child_base, &child_dir, result)?;
            }
            other => {
                debug!(key = %key, "ignoring non-URL manifest entry: {}", json_type_name(other));
            }
        }
    }
    Ok(())
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
