//! External document converter (Pandoc).
//!
//! Used for formats no Rust library reads: PowerPoint decks, legacy `.doc`
//! files, and as the secondary path for PDFs without a text layer.
//!
//! Lookup order for the binary:
//! 1. explicit override (`PANDOC_PATH`)
//! 2. auto-detection: asking the OS to run `pandoc --version`
//! 3. OS-specific well-known install locations
//! 4. a scan of `PATH`

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::documents::error::DocumentError;

const PANDOC: &str = "pandoc";

#[cfg(windows)]
const PANDOC_EXE: &str = "pandoc.exe";
#[cfg(not(windows))]
const PANDOC_EXE: &str = "pandoc";

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("converter exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("converter output unavailable: {0}")]
    Output(#[from] std::io::Error),
}

/// Finds the converter binary
#[derive(Debug, Clone)]
pub struct ConverterLocator {
    override_path: Option<PathBuf>,
    auto_detect: bool,
    well_known: Vec<PathBuf>,
    search_path: Option<OsString>,
}

impl ConverterLocator {
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self {
            override_path,
            auto_detect: true,
            well_known: well_known_locations(),
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Replace the OS-specific install locations
    pub fn with_well_known(mut self, locations: Vec<PathBuf>) -> Self {
        self.well_known = locations;
        self
    }

    /// Replace the `PATH` value that is scanned last
    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn without_auto_detect(mut self) -> Self {
        self.auto_detect = false;
        self
    }

    pub fn locate(&self) -> Result<Pandoc, DocumentError> {
        if let Some(path) = &self.override_path {
            info!(path = %path.display(), "Using Pandoc from PANDOC_PATH");
            return Ok(Pandoc::new(path.clone()));
        }

        if self.auto_detect && probe(Path::new(PANDOC)) {
            info!("Found Pandoc via auto-detection");
            return Ok(Pandoc::new(PathBuf::from(PANDOC)));
        }

        if let Some(path) = self.well_known.iter().find(|p| p.is_file()) {
            info!(path = %path.display(), "Found Pandoc at well-known location");
            return Ok(Pandoc::new(path.clone()));
        }

        if let Some(path) = self
            .search_path
            .as_ref()
            .and_then(|paths| std::env::split_paths(paths).map(|dir| dir.join(PANDOC_EXE)).find(|p| p.is_file()))
        {
            info!(path = %path.display(), "Found Pandoc in PATH");
            return Ok(Pandoc::new(path));
        }

        warn!("Pandoc not found");
        Err(DocumentError::MissingExternalTool {
            tool: "Pandoc".to_string(),
        })
    }
}

fn probe(program: &Path) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(windows)]
fn well_known_locations() -> Vec<PathBuf> {
    let program_files = std::env::var_os("ProgramFiles").unwrap_or_else(|| "C:\\Program Files".into());
    let program_files_x86 =
        std::env::var_os("ProgramFiles(x86)").unwrap_or_else(|| "C:\\Program Files (x86)".into());
    let mut locations = vec![
        PathBuf::from(program_files).join("Pandoc").join(PANDOC_EXE),
        PathBuf::from(program_files_x86).join("Pandoc").join(PANDOC_EXE),
    ];
    if let Some(local) = std::env::var_os("LOCALAPPDATA") {
        locations.push(PathBuf::from(local).join("Pandoc").join(PANDOC_EXE));
    }
    locations
}

#[cfg(target_os = "macos")]
fn well_known_locations() -> Vec<PathBuf> {
    ["/usr/local/bin/pandoc", "/opt/homebrew/bin/pandoc", "/opt/local/bin/pandoc"]
        .iter()
        .map(PathBuf::from)
        .collect()
}

#[cfg(not(any(windows, target_os = "macos")))]
fn well_known_locations() -> Vec<PathBuf> {
    ["/usr/bin/pandoc", "/usr/local/bin/pandoc"]
        .iter()
        .map(PathBuf::from)
        .collect()
}

/// A located Pandoc binary
#[derive(Debug, Clone)]
pub struct Pandoc {
    path: PathBuf,
}

impl Pandoc {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn command(&self, input: &Path, from: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.arg(input);
        if let Some(format) = from {
            cmd.args(["--from", format]);
        }
        cmd.args(["--to", "plain"]);
        cmd.stdin(Stdio::null());
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<Vec<u8>, ConversionError> {
        debug!(command = ?cmd, "Running converter");
        let output = cmd.output().map_err(|source| ConversionError::Spawn {
            program: self.path.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(ConversionError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Convert `input` to plain text captured from stdout. Without `from` the
    /// converter infers the input format from the file extension.
    pub fn convert(&self, input: &Path, from: Option<&str>) -> Result<String, ConversionError> {
        let stdout = self.run(self.command(input, from))?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Convert `input` into a temporary `.txt` file, read it back and delete it
    pub fn convert_via_file(&self, input: &Path, from: Option<&str>) -> Result<String, ConversionError> {
        let output_path = tempfile::Builder::new()
            .prefix("doc-qa-")
            .suffix(".txt")
            .tempfile()?
            .into_temp_path();

        let mut cmd = self.command(input, from);
        cmd.arg("-o").arg(output_path.as_os_str());
        self.run(cmd)?;

        let bytes = std::fs::read(&*output_path)?;
        let temp_file = output_path.display().to_string();
        if let Err(e) = output_path.close() {
            warn!(path = %temp_file, error = %e, "Failed to remove temporary file");
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let locator = ConverterLocator::new(Some(PathBuf::from("/opt/custom/pandoc")));
        let pandoc = locator.locate().unwrap();
        assert_eq!(pandoc.path(), Path::new("/opt/custom/pandoc"));
    }

    #[test]
    fn test_missing_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ConverterLocator::new(None)
            .without_auto_detect()
            .with_well_known(vec![dir.path().join("pandoc-not-here")])
            .with_search_path(Some(dir.path().as_os_str().to_owned()));

        let err = locator.locate().unwrap_err();
        assert_eq!(err, DocumentError::MissingExternalTool { tool: "Pandoc".to_string() });
    }

    #[test]
    fn test_well_known_before_path() {
        let known = tempfile::tempdir().unwrap();
        let on_path = tempfile::tempdir().unwrap();
        let known_bin = known.path().join("pandoc-bin");
        std::fs::write(&known_bin, b"").unwrap();
        std::fs::write(on_path.path().join(PANDOC_EXE), b"").unwrap();

        let locator = ConverterLocator::new(None)
            .without_auto_detect()
            .with_well_known(vec![known_bin.clone()])
            .with_search_path(Some(on_path.path().as_os_str().to_owned()));
        assert_eq!(locator.locate().unwrap().path(), known_bin.as_path());

        let locator = locator.with_well_known(Vec::new());
        assert_eq!(
            locator.locate().unwrap().path(),
            on_path.path().join(PANDOC_EXE).as_path()
        );
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let pandoc = Pandoc::new(PathBuf::from("/nonexistent/doc-qa/pandoc"));
        let err = pandoc.convert(Path::new("deck.pptx"), Some("pptx")).unwrap_err();
        assert!(matches!(err, ConversionError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/doc-qa/pandoc"));
    }

    #[test]
    fn test_command_arguments() {
        let pandoc = Pandoc::new(PathBuf::from("pandoc"));
        let cmd = pandoc.command(Path::new("deck.pptx"), Some("pptx"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["deck.pptx", "--from", "pptx", "--to", "plain"]);

        let cmd = pandoc.command(Path::new("old.doc"), None);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["old.doc", "--to", "plain"]);
    }
}
