//! Writing the generated module and running the publish command.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Write the formatted module, creating parent directories.
pub fn write_output(path: &Path, text: &str) -> Result<(), PublishError> {
    let io_err = |source| PublishError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, text).map_err(io_err)
}

/// Run `command` (program then arguments) in `dir`. An empty command does nothing.
pub fn publish(command: &[String], dir: &Path) -> Result<(), PublishError> {
    let Some((program, args)) = command.split_first() else {
        return Ok(());
    };
    let shown = command.join(" ");
    tracing::info!(command = %shown, dir = %dir.display(), "publishing");

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|source| PublishError::Spawn {
            command: shown.clone(),
            source,
        })?;

    if !status.success() {
        return Err(PublishError::Failed {
            command: shown,
            status,
        });
    }
    Ok(())
}
