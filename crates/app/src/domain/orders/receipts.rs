//! Receipt storage
//!
//! Receipt files live outside the database; an order keeps the storage key
//! of its current receipt and they are only served through that order.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::debug;

/// Default maximum receipt size (5 MiB).
pub const DEFAULT_MAX_RECEIPT_BYTES: usize = 5 * 1024 * 1024;

/// Receipt file formats accepted from customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptContentType {
    Jpeg,
    Png,
    Webp,
    Pdf,
}

impl ReceiptContentType {
    /// Parse a MIME type, ignoring parameters such as `; charset=...`.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();

        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Pdf => "application/pdf",
        }
    }

    /// Recover the format from a storage key's extension.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match Path::new(key).extension()?.to_str()? {
            "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Pdf => "pdf",
        }
    }
}

/// An uploaded receipt as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReceiptRejection {
    #[error("receipt is empty")]
    Empty,

    #[error("receipt is {size} bytes, the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported receipt type '{0}', expected JPEG, PNG, WebP or PDF")]
    UnsupportedType(String),
}

/// Size and format limits applied before a receipt is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub max_bytes: usize,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_RECEIPT_BYTES,
        }
    }
}

impl ReceiptPolicy {
    /// Check a receipt against the policy.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReceiptRejection`] that applies.
    pub fn check(&self, file: &ReceiptFile) -> Result<ReceiptContentType, ReceiptRejection> {
        if file.bytes.is_empty() {
            return Err(ReceiptRejection::Empty);
        }

        if file.bytes.len() > self.max_bytes {
            return Err(ReceiptRejection::TooLarge {
                size: file.bytes.len(),
                max: self.max_bytes,
            });
        }

        ReceiptContentType::from_mime(&file.content_type)
            .ok_or_else(|| ReceiptRejection::UnsupportedType(file.content_type.clone()))
    }
}

#[derive(Debug, Error)]
pub enum ReceiptStorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("receipt I/O failed")]
    Io(#[from] io::Error),
}

/// A receipt read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReceipt {
    pub content_type: ReceiptContentType,
    pub bytes: Vec<u8>,
}

/// Private receipt storage. Files are only reachable through the order they belong to.
#[automock]
#[async_trait]
pub trait ReceiptStorage: Send + Sync {
    /// Store `bytes` under `key`, replacing anything already there.
    async fn put(
        &self,
        key: &str,
        content_type: ReceiptContentType,
        bytes: &[u8],
    ) -> Result<(), ReceiptStorageError>;

    async fn read(&self, key: &str) -> Result<Vec<u8>, ReceiptStorageError>;

    /// Remove the file under `key`. Removing a missing file succeeds.
    async fn delete(&self, key: &str) -> Result<(), ReceiptStorageError>;
}

/// Stores receipts on the local filesystem under `root`.
#[derive(Debug, Clone)]
pub struct LocalReceiptStorage {
    root: PathBuf,
}

impl LocalReceiptStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ReceiptStorageError> {
        let relative = Path::new(key);

        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        if key.is_empty() || !is_plain {
            return Err(ReceiptStorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ReceiptStorage for LocalReceiptStorage {
    async fn put(
        &self,
        key: &str,
        content_type: ReceiptContentType,
        bytes: &[u8],
    ) -> Result<(), ReceiptStorageError> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, bytes).await?;

        debug!(
            key,
            content_type = content_type.mime(),
            size = bytes.len(),
            "stored receipt"
        );

        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, ReceiptStorageError> {
        Ok(tokio::fs::read(self.path_for(key)?).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), ReceiptStorageError> {
        match tokio::fs::remove_file(self.path_for(key)?).await {
            Ok(()) => {
                debug!(key, "removed receipt");

                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
