//! Rich-text to PDF conversion through an external office suite.
//!
//! The converter is a collaborator with a file-in, file-out contract. The
//! service never retries a failed conversion; the diagnostic is surfaced to
//! the caller as-is.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use uuid::Uuid;

use crate::config::ConverterConfig;
use crate::metrics::ConversionMetrics;

/// Failure of the external document converter
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to start converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Converter timed out after {0:?}")]
    Timeout(Duration),

    #[error("Converter produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Conversion I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts a rich-text file into a PDF file
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert `input` and write the result to `output`
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Headless LibreOffice (`soffice`) converter
pub struct OfficeConverter {
    program: String,
    timeout: Duration,
}

impl OfficeConverter {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(
            config.program.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl DocumentConverter for OfficeConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let out_dir = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut command = Command::new(&self.program);
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(&out_dir)
            .arg(input)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            program = %self.program,
            input = %input.display(),
            out_dir = %out_dir.display(),
            "Starting document conversion"
        );

        let result = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ConversionError::Timeout(self.timeout))?
            .map_err(|source| ConversionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ConversionError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let generated = out_dir.join(format!("{}.pdf", stem));

        if !tokio::fs::try_exists(&generated).await? {
            return Err(ConversionError::MissingOutput(generated));
        }
        if generated != output {
            tokio::fs::rename(&generated, output).await?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Write `content` to a scratch file, convert it, and return the PDF bytes.
pub async fn convert_to_pdf(
    content: &str,
    converter: &dyn DocumentConverter,
) -> Result<Vec<u8>, ConversionError> {
    let workdir = tempfile::tempdir()?;
    let stem = format!("report-{}", Uuid::new_v4());
    let input = workdir.path().join(format!("{}.rtf", stem));
    let output = workdir.path().join(format!("{}.pdf", stem));

    tokio::fs::write(&input, content).await?;

    let started = Instant::now();
    let outcome = converter.convert(&input, &output).await;
    ConversionMetrics::record(outcome.is_ok(), started.elapsed());

    if let Err(e) = outcome {
        tracing::error!(converter = %converter.name(), error = %e, "Document conversion failed");
        return Err(e);
    }

    let bytes = tokio::fs::read(&output)
        .await
        .map_err(|_| ConversionError::MissingOutput(output.clone()))?;

    tracing::info!(
        converter = %converter.name(),
        bytes = bytes.len(),
        "Document converted to PDF"
    );

    Ok(bytes)
}
