use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Where photo bytes come from when a file is attached.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads photos from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSource;

#[async_trait]
impl ImageSource for FileImageSource {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}
