//! Publishing of rendered files
//!
//! The renderer reports each file it writes; a [`Publisher`] copies them to
//! the configured publish directory (a mounted bucket, a shared drive).
//! Files keep their path relative to the output root, so `a/shot.png` and
//! `b/shot.png` stay apart.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Copies written files into a directory, remembering the first failure
#[derive(Debug, Default)]
pub struct Publisher {
    publish_dir: Option<PathBuf>,
    root: Option<PathBuf>,
    published: Vec<PathBuf>,
    error: Option<io::Error>,
}

impl Publisher {
    /// Publisher copying into `publish_dir`, or only logging when `None`
    pub fn new(publish_dir: Option<PathBuf>) -> Self {
        Self {
            publish_dir,
            root: None,
            published: Vec::new(),
            error: None,
        }
    }

    /// Directory that published paths are made relative to
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Path of `rendered_file` inside the publish directory
    ///
    /// Files under the root keep their relative path, as do relative paths
    /// that stay inside the working directory. Anything else is published
    /// by file name.
    pub fn relative_target(&self, rendered_file: &Path) -> Option<PathBuf> {
        let relative = match &self.root {
            Some(root) => rendered_file.strip_prefix(root).unwrap_or(rendered_file),
            None => rendered_file,
        };
        let stays_inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if stays_inside {
            let cleaned: PathBuf = relative
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect();
            if cleaned.as_os_str().is_empty() {
                return None;
            }
            Some(cleaned)
        } else {
            rendered_file.file_name().map(PathBuf::from)
        }
    }

    /// Handle one written file
    pub fn publish(&mut self, rendered_file: &Path) {
        let Some(dir) = &self.publish_dir else {
            log::info!("Wrote {}", rendered_file.display());
            return;
        };
        if self.error.is_some() {
            return;
        }

        let Some(relative) = self.relative_target(rendered_file) else {
            return;
        };
        let target = dir.join(relative);
        let result = target
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::copy(rendered_file, &target));
        match result {
            Ok(_) => {
                log::info!("Published {} to {}", rendered_file.display(), target.display());
                self.published.push(target);
            }
            Err(e) => {
                log::error!("Failed to publish {}: {}", rendered_file.display(), e);
                self.error = Some(e);
            }
        }
    }

    /// Files copied so far
    pub fn published(&self) -> &[PathBuf] {
        &self.published
    }

    /// Number of published files, or the first error
    pub fn finish(self) -> io::Result<usize> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.published.len()),
        }
    }
}
