//! External PlantUML rendering
//!
//! Rendering is best-effort. A [`Renderer`] holds an ordered list of
//! [`RenderCandidate`]s and tries each one exactly once; the first one that
//! exits successfully *and* leaves `<stem>.png` in the target directory wins.
//! Every failure is logged and swallowed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

/// Format flag passed to PlantUML
const PNG_FLAG: &str = "-tpng";

/// Extension of the image PlantUML produces for [`PNG_FLAG`]
pub const IMAGE_EXTENSION: &str = "png";

/// One way of invoking PlantUML
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCandidate {
    /// A PlantUML jar run through a Java runtime
    Packaged {
        /// Java executable
        runtime: PathBuf,
        /// The jar file
        package: PathBuf,
    },
    /// A PlantUML executable
    System {
        /// Resolved command path
        command: PathBuf,
    },
}

impl RenderCandidate {
    /// Build the process invocation for a diagram and target directory
    #[must_use]
    pub fn command(&self, diagram: &Path, out_dir: &Path) -> Command {
        let mut cmd = match self {
            Self::Packaged { runtime, package } => {
                let mut cmd = Command::new(runtime);
                cmd.arg("-jar").arg(package);
                cmd
            }
            Self::System { command } => Command::new(command),
        };
        cmd.arg(PNG_FLAG).arg(diagram).arg("-o").arg(out_dir);
        cmd
    }
}

impl fmt::Display for RenderCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packaged { runtime, package } => {
                write!(f, "{} -jar {}", runtime.display(), package.display())
            }
            Self::System { command } => write!(f, "{}", command.display()),
        }
    }
}

/// Why a single candidate produced no image
#[derive(Debug, Error)]
pub enum RenderError {
    /// The process could not be started
    #[error("failed to start `{candidate}`: {source}")]
    Spawn {
        /// Candidate description
        candidate: String,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// The process exited unsuccessfully
    #[error("`{candidate}` exited with {status}")]
    Failed {
        /// Candidate description
        candidate: String,
        /// Exit status
        status: std::process::ExitStatus,
    },
    /// The process succeeded but the image is not where it should be
    #[error("`{candidate}` produced no image at {}", .expected.display())]
    MissingOutput {
        /// Candidate description
        candidate: String,
        /// Path that was expected to exist
        expected: PathBuf,
    },
}

/// Ordered set of render candidates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renderer {
    candidates: Vec<RenderCandidate>,
}

impl Renderer {
    /// Create a renderer from an explicit candidate list
    #[must_use]
    pub const fn new(candidates: Vec<RenderCandidate>) -> Self {
        Self { candidates }
    }

    /// Discover candidates: the packaged tool first (if given), then the
    /// system command if it is on `PATH`
    #[must_use]
    pub fn discover(package: Option<&Path>, runtime: &str, command: &str) -> Self {
        let mut candidates = Vec::new();

        if let Some(package) = package {
            candidates.push(RenderCandidate::Packaged {
                runtime: PathBuf::from(runtime),
                package: package.to_path_buf(),
            });
        }

        match which::which(command) {
            Ok(path) => candidates.push(RenderCandidate::System { command: path }),
            Err(e) => debug!("`{command}` not found on PATH: {e}"),
        }

        Self { candidates }
    }

    /// The candidates in the order they will be tried
    #[must_use]
    pub fn candidates(&self) -> &[RenderCandidate] {
        &self.candidates
    }

    /// Check whether there is anything to try
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Render `diagram` into `out_dir`, returning the image path on success.
    ///
    /// `out_dir` must already exist.
    #[must_use]
    pub fn render(&self, diagram: &Path, out_dir: &Path) -> Option<PathBuf> {
        let expected = expected_image(diagram, out_dir);

        for candidate in &self.candidates {
            match render_with(candidate, diagram, out_dir, &expected) {
                Ok(()) => {
                    info!("rendered {} with `{candidate}`", expected.display());
                    return Some(expected);
                }
                Err(e) => info!("{e}"),
            }
        }

        if self.candidates.is_empty() {
            info!("no PlantUML renderer available");
        }
        None
    }
}

/// Where PlantUML writes the image for `diagram`
#[must_use]
pub fn expected_image(diagram: &Path, out_dir: &Path) -> PathBuf {
    let stem = diagram.file_stem().unwrap_or(diagram.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(IMAGE_EXTENSION);
    out_dir.join(name)
}

fn render_with(
    candidate: &RenderCandidate,
    diagram: &Path,
    out_dir: &Path,
    expected: &Path,
) -> Result<(), RenderError> {
    debug!("trying `{candidate}`");

    let output = candidate
        .command(diagram, out_dir)
        .output()
        .map_err(|source| RenderError::Spawn {
            candidate: candidate.to_string(),
            source,
        })?;

    if !output.stdout.is_empty() {
        debug!("stdout: {}", String::from_utf8_lossy(&output.stdout).trim_end());
    }
    if !output.stderr.is_empty() {
        debug!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
    }

    if !output.status.success() {
        return Err(RenderError::Failed {
            candidate: candidate.to_string(),
            status: output.status,
        });
    }

    if !expected.exists() {
        return Err(RenderError::MissingOutput {
            candidate: candidate.to_string(),
            expected: expected.to_path_buf(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expected_image() {
        let path = expected_image(Path::new("/in/order.puml"), Path::new("/out/assets"));
        assert_eq!(path, PathBuf::from("/out/assets/order.png"));

        let path = expected_image(Path::new("diagram"), Path::new("assets"));
        assert_eq!(path, PathBuf::from("assets/diagram.png"));
    }

    #[test]
    fn test_command_arguments() {
        let packaged = RenderCandidate::Packaged {
            runtime: PathBuf::from("java"),
            package: PathBuf::from("/opt/plantuml.jar"),
        };
        let cmd = packaged.command(Path::new("a.puml"), Path::new("/out"));
        assert_eq!(cmd.get_program(), "java");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["-jar", "/opt/plantuml.jar", "-tpng", "a.puml", "-o", "/out"]);

        let system = RenderCandidate::System {
            command: PathBuf::from("/usr/bin/plantuml"),
        };
        let cmd = system.command(Path::new("a.puml"), Path::new("/out"));
        assert_eq!(cmd.get_program(), "/usr/bin/plantuml");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["-tpng", "a.puml", "-o", "/out"]);
    }

    #[test]
    fn test_display() {
        let packaged = RenderCandidate::Packaged {
            runtime: PathBuf::from("java"),
            package: PathBuf::from("plantuml.jar"),
        };
        assert_eq!(packaged.to_string(), "java -jar plantuml.jar");
    }

    #[test]
    fn test_discover_package_first() {
        let renderer = Renderer::discover(
            Some(Path::new("plantuml.jar")),
            "java",
            "doc-combiner-no-such-command",
        );
        assert_eq!(
            renderer.candidates(),
            [RenderCandidate::Packaged {
                runtime: PathBuf::from("java"),
                package: PathBuf::from("plantuml.jar"),
            }]
        );
    }

    #[test]
    fn test_render_without_candidates() {
        let dir = TempDir::new().unwrap();
        let renderer = Renderer::default();
        assert!(renderer.is_empty());
        assert_eq!(renderer.render(Path::new("a.puml"), dir.path()), None);
    }

    #[test]
    fn test_render_spawn_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let renderer = Renderer::new(vec![RenderCandidate::System {
            command: dir.path().join("missing-plantuml"),
        }]);
        assert_eq!(renderer.render(Path::new("a.puml"), dir.path()), None);
    }

    #[cfg(unix)]
    fn fake_plantuml(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_render_success() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("assets");
        fs::create_dir(&out).unwrap();
        let diagram = dir.path().join("order.puml");
        fs::write(&diagram, "@startuml\n@enduml\n").unwrap();

        // args: -tpng <diagram> -o <dir>
        let tool = fake_plantuml(
            dir.path(),
            "plantuml",
            r#"touch "$4/$(basename "$2" .puml).png""#,
        );
        let renderer = Renderer::new(vec![RenderCandidate::System { command: tool }]);

        assert_eq!(renderer.render(&diagram, &out), Some(out.join("order.png")));
    }

    #[cfg(unix)]
    #[test]
    fn test_render_falls_through_to_next_candidate() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("assets");
        fs::create_dir(&out).unwrap();
        let diagram = dir.path().join("order.puml");
        fs::write(&diagram, "@startuml\n@enduml\n").unwrap();

        let failing = fake_plantuml(dir.path(), "failing", "exit 3");
        let silent = fake_plantuml(dir.path(), "silent", "exit 0");
        let working = fake_plantuml(
            dir.path(),
            "working",
            r#"touch "$4/$(basename "$2" .puml).png""#,
        );

        let renderer = Renderer::new(vec![
            RenderCandidate::System { command: failing },
            RenderCandidate::System { command: silent },
            RenderCandidate::System { command: working },
        ]);

        assert_eq!(renderer.render(&diagram, &out), Some(out.join("order.png")));
    }

    #[cfg(unix)]
    #[test]
    fn test_render_success_without_image_is_failure() {
        let dir = TempDir::new().unwrap();
        let silent = fake_plantuml(dir.path(), "silent", "exit 0");
        let renderer = Renderer::new(vec![RenderCandidate::System { command: silent }]);

        assert_eq!(renderer.render(Path::new("order.puml"), dir.path()), None);
    }
}
