//! # File I/O Module
//!
//! Project and report files:
//! - **Atomic saves**: write to a `.tmp` sibling, sync, rename
//! - **Version validation**: reject projects from an incompatible schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use slab_core::file_io::{load_project, save_project};
//! use slab_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "26-001", "Client");
//! let path = Path::new("slabs.json");
//! save_project(&project, path).unwrap();
//! let loaded = load_project(path).unwrap();
//! assert_eq!(loaded.meta.job_id, "26-001");
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::engine::DesignReport;
use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `value` as pretty JSON and atomically replace `path`.
fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = tmp_path_for(path);

    let tmp_error = |operation: &str, e: std::io::Error| {
        CalcError::file_error(operation, tmp_path.display().to_string(), e.to_string())
    };

    let mut tmp_file = File::create(&tmp_path).map_err(|e| tmp_error("create temp file", e))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| tmp_error("write temp file", e))?;
    tmp_file
        .sync_all()
        .map_err(|e| tmp_error("sync temp file", e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Save a project with atomic write semantics.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    write_json_atomic(project, path)
}

/// Save a design report with atomic write semantics.
pub fn save_report(report: &DesignReport, path: &Path) -> CalcResult<()> {
    write_json_atomic(report, path)
}

/// Load a project file.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - file schema is incompatible
/// * `Err(CalcError::SerializationError)` - invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Same major version; for 0.x the file's minor may not be newer.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first())
    else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if current_major == 0 {
        let minors = (file_parts.get(1), current_parts.get(1));
        if let (Some(&file_minor), Some(&current_minor)) = minors {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}
