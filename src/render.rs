//! Graph rendering
//! Turns DOT text into an image through an external program

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error while talking to the renderer: {0}")]
    Io(#[from] std::io::Error),
    #[error("Renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Anything that can turn graph text into image bytes
pub trait GraphRenderer {
    fn render(&self, dot: &str) -> Result<Vec<u8>, RenderError>;
}

/// Graphviz `dot -T<format>`, fed through stdin
#[derive(Debug, Clone)]
pub struct DotCommand {
    pub program: PathBuf,
    pub format: String,
}

impl Default for DotCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from("dot"),
            format: "png".to_string(),
        }
    }
}

impl DotCommand {
    pub fn new(program: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            format: format.into(),
        }
    }
}

impl GraphRenderer for DotCommand {
    fn render(&self, dot: &str) -> Result<Vec<u8>, RenderError> {
        log::debug!("rendering graph with {} -T{}", self.program.display(), self.format);
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // stdin is dropped at the end of this block so the renderer sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl GraphRenderer for Echo {
        fn render(&self, dot: &str) -> Result<Vec<u8>, RenderError> {
            Ok(dot.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_custom_renderer() {
        let renderer: &dyn GraphRenderer = &Echo;
        assert_eq!(renderer.render("digraph g {}").unwrap(), b"digraph g {}");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let renderer = DotCommand::new("/nonexistent/cfsmgen-dot", "svg");
        let err = renderer.render("digraph g {}\n").unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
    }

    #[test]
    fn test_default_is_dot_png() {
        let renderer = DotCommand::default();
        assert_eq!(renderer.program, PathBuf::from("dot"));
        assert_eq!(renderer.format, "png");
    }
}
