//! Provenance sidecars for solve reports.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Solve parameters recorded next to a report.
pub struct Payload {
    pub params: Value,
    /// Extra files produced by the same run.
    pub extra_outputs: Vec<PathBuf>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            extra_outputs: Vec::new(),
        }
    }
}

/// Write `<report-stem>.provenance.json` beside `report`.
///
/// Records the code revision, library version, the calling site, the solve
/// parameters and every output path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(report: P, payload: Payload) -> Result<PathBuf> {
    let report = report.as_ref();
    let path = sidecar_path(report);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let callsite = Location::caller();
    let outputs: Vec<String> = std::iter::once(report)
        .chain(payload.extra_outputs.iter().map(PathBuf::as_path))
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let doc = json!({
        "code_rev": current_git_rev(),
        "version": homopath::VERSION,
        "callsite": format!("{}:{}", callsite.file(), callsite.line()),
        "params": payload.params,
        "outputs": outputs,
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(report: &Path) -> PathBuf {
    let stem = report
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    report.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else `unknown`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
