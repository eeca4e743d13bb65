use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::LinkerOptions;
use crate::core::command::Command;
use crate::error::{DeplinkError, Result};
use crate::util::output;

/// Runs a resolved command stream strictly in sequence against a single
/// working-directory cursor. The process working directory itself is
/// never changed: shell commands get an explicit `current_dir` and
/// symlink destinations are resolved against the cursor, so the caller's
/// cwd is intact whether execution succeeds or aborts. In dry-run mode
/// every command is echoed and nothing is touched.
pub struct Executor {
    dry_run: bool,
    force: bool,
    verbose: u8,
}

impl Executor {
    pub fn new(options: &LinkerOptions) -> Self {
        Self {
            dry_run: options.dry_run,
            force: options.force,
            verbose: options.verbose,
        }
    }

    pub fn execute(&self, working_dir: &Path, commands: &[Command]) -> Result<()> {
        let mut cursor = working_dir.to_path_buf();
        for command in commands {
            if self.dry_run {
                output::run_op(&format!("(dry-run) {command}"));
                continue;
            }
            if self.verbose > 0 {
                output::run_op(&command.to_string());
            }
            match command {
                Command::Cd(dir) => cursor = resolve_against(&cursor, dir),
                Command::Symlink { source, dest } => self.create_symlink(&cursor, source, dest)?,
                Command::Shell(line) => run_shell(&cursor, line)?,
            }
        }
        Ok(())
    }

    fn create_symlink(&self, cursor: &Path, source: &Path, dest: &Path) -> Result<()> {
        let dest = resolve_against(cursor, dest);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        if dest.symlink_metadata().is_ok() {
            if !self.force {
                return Err(DeplinkError::Execution {
                    command: format!("ln -s {} {}", source.display(), dest.display()),
                    reason: "destination already exists (pass --force to overwrite)".to_string(),
                });
            }
            remove_existing(&dest)?;
        }
        make_symlink(source, &dest).map_err(|err| DeplinkError::Execution {
            command: format!("ln -s {} {}", source.display(), dest.display()),
            reason: err.to_string(),
        })
    }
}

fn resolve_against(cursor: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cursor.join(path)
    }
}

fn remove_existing(dest: &Path) -> std::io::Result<()> {
    let meta = dest.symlink_metadata()?;
    if meta.file_type().is_dir() {
        fs::remove_dir_all(dest)
    } else {
        fs::remove_file(dest)
    }
}

#[cfg(unix)]
fn make_symlink(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(windows)]
fn make_symlink(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(source, dest)
}

fn run_shell(cursor: &Path, line: &str) -> Result<()> {
    let mut cmd = if cfg!(windows) {
        let mut cmd = std::process::Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    } else {
        let mut cmd = std::process::Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    };
    let status = cmd
        .current_dir(cursor)
        .status()
        .with_context(|| format!("failed to run shell command {line}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(DeplinkError::Execution {
            command: line.to_string(),
            reason: format!("exited with {status}"),
        })
    }
}
