//! Static asset module
//!
//! Reads the configured HTML file. Every read goes to storage unless the
//! opt-in cache is enabled, in which case the file is reloaded whenever its
//! modification time changes.

use hyper::body::Bytes;
use std::path::PathBuf;
use std::time::SystemTime;
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;

/// Failure to produce the static asset
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read asset '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset '{}' is not valid UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

#[derive(Debug, Clone)]
struct CachedAsset {
    modified: SystemTime,
    content: Bytes,
}

#[derive(Debug)]
pub struct AssetStore {
    path: PathBuf,
    cache: Option<RwLock<Option<CachedAsset>>>,
}

impl AssetStore {
    pub fn new(path: impl Into<PathBuf>, cache: bool) -> Self {
        Self {
            path: path.into(),
            cache: cache.then(|| RwLock::new(None)),
        }
    }

    /// Read the asset as UTF-8 text and return its bytes
    pub async fn read(&self) -> Result<Bytes, AssetError> {
        match &self.cache {
            None => self.load().await,
            Some(cache) => self.read_cached(cache).await,
        }
    }

    async fn read_cached(
        &self,
        cache: &RwLock<Option<CachedAsset>>,
    ) -> Result<Bytes, AssetError> {
        let modified = match fs::metadata(&self.path).await {
            Ok(meta) => meta.modified().ok(),
            Err(source) => {
                // Deleted asset must not keep being served
                cache.write().await.take();
                return Err(self.read_error(source));
            }
        };

        if let Some(modified) = modified {
            if let Some(hit) = cache.read().await.as_ref() {
                if hit.modified == modified {
                    return Ok(hit.content.clone());
                }
            }
        }

        let content = match self.load().await {
            Ok(content) => content,
            Err(e) => {
                cache.write().await.take();
                return Err(e);
            }
        };
        *cache.write().await = modified.map(|modified| CachedAsset {
            modified,
            content: content.clone(),
        });
        Ok(content)
    }

    async fn load(&self) -> Result<Bytes, AssetError> {
        let raw = fs::read(&self.path)
            .await
            .map_err(|source| self.read_error(source))?;
        let text = String::from_utf8(raw).map_err(|source| AssetError::Decode {
            path: self.path.clone(),
            source,
        })?;
        Ok(Bytes::from(text.into_bytes()))
    }

    fn read_error(&self, source: std::io::Error) -> AssetError {
        AssetError::Read {
            path: self.path.clone(),
            source,
        }
    }
}
