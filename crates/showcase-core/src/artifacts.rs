//! Filesystem store for raw input images and result documents.
//!
//! Inputs live under one directory as `{id}.{ext}`, result documents
//! under another as `{id}.json`. Both directories are created lazily on
//! first use. The store is shared between the ingestor (writes inputs),
//! the dispatch worker (reads inputs, workflows write results), and the
//! result gateway (reads and removes both).

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::result::ResultDocument;
use crate::types::SubmissionId;

/// Artifact extensions accepted at upload time.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Every accepted input is re-encoded to this canonical kind.
pub const CANONICAL_EXTENSION: &str = "png";

/// Whether `extension` (already lowercased) is accepted at upload time.
pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension)
}

/// Filesystem-backed store for input and output artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Path of the raw input artifact for `id`.
    pub fn input_path(&self, id: SubmissionId, extension: &str) -> PathBuf {
        self.input_dir.join(format!("{id}.{extension}"))
    }

    /// Path of the result document for `id`.
    pub fn result_path(&self, id: SubmissionId) -> PathBuf {
        self.output_dir.join(format!("{id}.json"))
    }

    /// Persist raw input bytes for `id`. Returns the written path.
    pub async fn save_input(
        &self,
        id: SubmissionId,
        extension: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, CoreError> {
        ensure_dir(&self.input_dir).await?;
        let path = self.input_path(id, extension);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Remove the raw input artifact for `id`.
    ///
    /// Returns `false` when the file was already gone, which the caller
    /// may treat as benign (e.g. reprocessing cleanup).
    pub async fn remove_input(&self, id: SubmissionId, extension: &str) -> Result<bool, CoreError> {
        remove_file_if_exists(&self.input_path(id, extension)).await
    }

    /// Write (or overwrite) the result document for its submission id.
    pub async fn write_result(&self, document: &ResultDocument) -> Result<PathBuf, CoreError> {
        ensure_dir(&self.output_dir).await?;
        let path = self.result_path(document.submission_id);
        let json = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(&path, json).await?;
        Ok(path)
    }

    /// Load the result document for `id`.
    ///
    /// A missing document surfaces as [`CoreError::Storage`]; after a
    /// submission reaches the completion ledger its result document is
    /// expected to exist until consumed.
    pub async fn read_result(&self, id: SubmissionId) -> Result<ResultDocument, CoreError> {
        let bytes = tokio::fs::read(self.result_path(id)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Remove the result document for `id`. Returns `false` when absent.
    pub async fn remove_result(&self, id: SubmissionId) -> Result<bool, CoreError> {
        remove_file_if_exists(&self.result_path(id)).await
    }
}

async fn ensure_dir(dir: &Path) -> Result<(), CoreError> {
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

async fn remove_file_if_exists(path: &Path) -> Result<bool, CoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
