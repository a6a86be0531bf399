//! Diagram rendering through an external Graphviz-style tool.
//!
//! Only existence checks and process plumbing live here; the tool does the work.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::config::RenderSettings;
use crate::core_types::{EXIT_FAILURE, EXIT_MISSING, ExitCode};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("DOT file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("'{0}' not found in PATH. Please install graphviz.")]
    ToolNotFound(String),

    #[error("{tool} failed with code {}", describe_code(.exit_code))]
    ToolFailed {
        tool: String,
        exit_code: Option<i32>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "signal".to_string(),
    }
}

impl RenderError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RenderError::MissingInput(_) => EXIT_FAILURE,
            RenderError::ToolNotFound(_) => EXIT_MISSING,
            RenderError::ToolFailed { exit_code, .. } => match exit_code {
                Some(code) if *code != 0 => *code,
                _ => EXIT_FAILURE,
            },
            RenderError::Io(_) => EXIT_FAILURE,
        }
    }
}

/// Locate an executable named `name` on `PATH`.
///
/// A name containing a path separator is checked as given.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Render `input` into `output` with the configured tool and format.
///
/// Parent directories of `output` are created as needed.
pub fn render(input: &Path, output: &Path, settings: &RenderSettings) -> Result<(), RenderError> {
    if !input.exists() {
        return Err(RenderError::MissingInput(input.to_path_buf()));
    }

    let tool = find_executable(&settings.tool)
        .ok_or_else(|| RenderError::ToolNotFound(settings.tool.clone()))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!(
        tool = %tool.display(),
        input = %input.display(),
        output = %output.display(),
        "Rendering diagram"
    );

    let status = Command::new(&tool)
        .arg(format!("-T{}", settings.format))
        .arg(input)
        .arg("-o")
        .arg(output)
        .status()?;

    if !status.success() {
        return Err(RenderError::ToolFailed {
            tool: settings.tool.clone(),
            exit_code: status.code(),
        });
    }

    tracing::info!(output = %output.display(), "Diagram rendered");
    Ok(())
}
