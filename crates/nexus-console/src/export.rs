/*
[INPUT]:  Current artifact from the session, export directory and file name
[OUTPUT]: Newly created file holding the artifact bytes, or a no-artifact notice
[POS]:    Artifact exporter - on-demand local persistence
[UPDATE]: When changing naming, collision handling, or target directory rules
*/

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::session::Artifact;

pub const DEFAULT_FILE_NAME: &str = "nexus_solution.py";
pub const NO_ARTIFACT_NOTICE: &str = "No code artifact generated yet.";
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free file name for {0} in {1}")]
    NamesExhausted(String, PathBuf),

    #[error("invalid export file name {0:?}: must be a plain file name")]
    InvalidFileName(String),
}

/// Result of an export request; `Display` is the operator-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { path: PathBuf, bytes: usize },
    NoArtifact,
}

impl fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportOutcome::Saved { path, bytes } => {
                write!(f, "Saved {} ({bytes} bytes)", path.display())
            }
            ExportOutcome::NoArtifact => f.write_str(NO_ARTIFACT_NOTICE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Target directory; the user's download directory when unset
    pub dir: Option<PathBuf>,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ExportConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactExporter {
    dir: PathBuf,
    file_name: String,
}

impl ArtifactExporter {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Build from configuration, rejecting file names that would leave the
    /// export directory.
    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        validate_file_name(&config.file_name)?;
        Ok(Self::new(config.resolved_dir(), config.file_name.clone()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the artifact verbatim to a new file. Existing files are never
    /// overwritten: `name (1).ext`, `name (2).ext`, ... are tried in turn.
    pub async fn export(&self, artifact: &Artifact) -> Result<ExportOutcome, ExportError> {
        if artifact.is_empty() {
            return Ok(ExportOutcome::NoArtifact);
        }
        validate_file_name(&self.file_name)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ExportError::Io {
                path: self.dir.clone(),
                source,
            })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(candidate_name(&self.file_name, attempt));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(ExportError::Io { path, source }),
            };

            let bytes = artifact.as_bytes();
            let written = async {
                file.write_all(bytes).await?;
                file.flush().await
            }
            .await;
            drop(file);
            if let Err(source) = written {
                return Err(ExportError::Io { path, source });
            }

            info!(path = %path.display(), bytes = bytes.len(), "artifact exported");
            return Ok(ExportOutcome::Saved {
                path,
                bytes: bytes.len(),
            });
        }

        Err(ExportError::NamesExhausted(self.file_name.clone(), self.dir.clone()))
    }
}

/// A usable name is a single normal path component with a non-blank stem.
fn validate_file_name(file_name: &str) -> Result<(), ExportError> {
    let path = Path::new(file_name);
    let single_component = path.file_name().is_some_and(|name| name == path.as_os_str());
    let has_stem = path
        .file_stem()
        .is_some_and(|stem| !stem.to_string_lossy().trim().is_empty());
    if single_component && has_stem {
        Ok(())
    } else {
        Err(ExportError::InvalidFileName(file_name.to_string()))
    }
}

fn candidate_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    match path.extension() {
        Some(ext) => format!("{stem} ({attempt}).{}", ext.to_string_lossy()),
        None => format!("{stem} ({attempt})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use rstest::rstest;
    use tokio_test::assert_ok;

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate_name("nexus_solution.py", 0), "nexus_solution.py");
        assert_eq!(candidate_name("nexus_solution.py", 2), "nexus_solution (2).py");
        assert_eq!(candidate_name("solution", 1), "solution (1)");
    }

    #[tokio::test]
    async fn test_empty_artifact_writes_nothing() {
        let dir = TempDir::new().expect("tempdir");
        let exporter = ArtifactExporter::new(dir.path(), DEFAULT_FILE_NAME);

        let outcome = assert_ok!(exporter.export(&Artifact::default()).await);

        assert_eq!(outcome, ExportOutcome::NoArtifact);
        assert_eq!(outcome.to_string(), "No code artifact generated yet.");
        let entries = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn test_export_is_byte_identical() {
        let dir = TempDir::new().expect("tempdir");
        let exporter = ArtifactExporter::new(dir.path(), DEFAULT_FILE_NAME);
        let code = "import os\r\nprint('héllo')\n\n# trailing  \n";

        let outcome = assert_ok!(exporter.export(&Artifact::new(code)).await);

        let ExportOutcome::Saved { path, bytes } = outcome else {
            panic!("expected a saved file");
        };
        assert_eq!(path, dir.path().join("nexus_solution.py"));
        assert_eq!(bytes, code.len());
        assert_eq!(std::fs::read(&path).expect("read back"), code.as_bytes());
    }

    #[tokio::test]
    async fn test_repeated_export_creates_new_files() {
        let dir = TempDir::new().expect("tempdir");
        let exporter = ArtifactExporter::new(dir.path(), DEFAULT_FILE_NAME);
        let artifact = Artifact::new("print(1)");

        let first = assert_ok!(exporter.export(&artifact).await);
        let second = assert_ok!(exporter.export(&artifact).await);

        let ExportOutcome::Saved { path: second_path, .. } = second else {
            panic!("expected a saved file");
        };
        assert_ne!(first, ExportOutcome::NoArtifact);
        assert_eq!(second_path, dir.path().join("nexus_solution (1).py"));
        assert_eq!(std::fs::read_to_string(&second_path).expect("read"), "print(1)");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("nexus_solution.py")).expect("read"),
            "print(1)"
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_created() {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("exports").join("today");
        let exporter = ArtifactExporter::new(&nested, "out.txt");

        assert_ok!(exporter.export(&Artifact::new("x")).await);

        assert!(nested.join("out.txt").exists());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("..")]
    #[case(".")]
    #[case("../escape.py")]
    #[case("nested/solution.py")]
    #[case("/etc/solution.py")]
    #[case("solution.py/")]
    fn test_unsafe_file_names_are_rejected(#[case] file_name: &str) {
        let config = ExportConfig {
            dir: Some(PathBuf::from("/tmp/nexus")),
            file_name: file_name.to_string(),
        };
        assert!(matches!(
            ArtifactExporter::from_config(&config),
            Err(ExportError::InvalidFileName(_))
        ));
    }

    #[tokio::test]
    async fn test_export_refuses_path_outside_directory() {
        let dir = TempDir::new().expect("tempdir");
        let inner = dir.path().join("exports");
        let exporter = ArtifactExporter::new(&inner, "../escaped.py");

        let result = exporter.export(&Artifact::new("print(1)")).await;

        assert!(matches!(result, Err(ExportError::InvalidFileName(_))));
        assert!(!dir.path().join("escaped.py").exists());
    }

    #[test]
    fn test_config_dir_overrides_default() {
        let config = ExportConfig {
            dir: Some(PathBuf::from("/tmp/nexus")),
            ..ExportConfig::default()
        };
        let exporter = assert_ok!(ArtifactExporter::from_config(&config));
        assert_eq!(exporter.dir(), Path::new("/tmp/nexus"));
    }
}
