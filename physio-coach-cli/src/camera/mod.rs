//! Frame acquisition.
//!
//! Camera hardware is an external collaborator; the runner only needs
//! a stream of base64-encoded JPEG frames. `DirectoryFrameSource`
//! replays a directory of image files, which covers offline sessions
//! and testing against recorded footage.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// One captured frame, already encoded for the pose service.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image_base64: String,
}

/// A pull-based source of frames. `Ok(None)` means the source is
/// exhausted and the session should wind down.
pub trait FrameSource: Send + 'static {
    fn next_frame(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<Frame>>> + Send + '_>>;
}

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Replays image files from a directory in lexicographic order.
pub struct DirectoryFrameSource {
    files: VecDeque<PathBuf>,
}

impl DirectoryFrameSource {
    pub async fn new(dir: &Path) -> Result<Self> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read frame directory {}", dir.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to list frame directory")?
        {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    IMAGE_EXTENSIONS
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(ext))
                });
            if is_image {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            anyhow::bail!("No image files found in {}", dir.display());
        }

        tracing::info!(frames = files.len(), dir = %dir.display(), "frame source ready");
        Ok(Self {
            files: files.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.files.len()
    }
}

impl FrameSource for DirectoryFrameSource {
    fn next_frame(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<Frame>>> + Send + '_>> {
        Box::pin(async move {
            let Some(path) = self.files.pop_front() else {
                return Ok(None);
            };

            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read frame file {}", path.display()))?;

            Ok(Some(Frame {
                image_base64: STANDARD.encode(bytes),
            }))
        })
    }
}
