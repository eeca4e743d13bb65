use std::fmt;
use std::path::PathBuf;

/// One instruction for the executor: move the working-directory cursor,
/// materialize a symlink, or run an opaque shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Cd(PathBuf),
    Symlink { source: PathBuf, dest: PathBuf },
    Shell(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Cd(dir) => write!(f, "cd {}", dir.display()),
            Command::Symlink { source, dest } => {
                write!(f, "ln -s {} {}", source.display(), dest.display())
            }
            Command::Shell(line) => f.write_str(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Command;

    #[test]
    fn renders_shell_form() {
        assert_eq!(Command::Cd(PathBuf::from("/ws/core")).to_string(), "cd /ws/core");
        assert_eq!(
            Command::Symlink {
                source: PathBuf::from("/ws/core"),
                dest: PathBuf::from("node_modules/core"),
            }
            .to_string(),
            "ln -s /ws/core node_modules/core"
        );
        assert_eq!(Command::Shell("npm install".to_string()).to_string(), "npm install");
    }
}
