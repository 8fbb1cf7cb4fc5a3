//! Renderer front end
//!
//! The [`Renderer`] checks a scene, works out what the output path asks
//! for, hands a [`RenderJob`] to its [`RenderBackend`] and then reports
//! every produced file to the caller.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use synthscene_core::{Scene, SceneValidator, ValidationError};

use crate::annotations::SceneAnnotations;
use crate::output::{OutputKind, RenderPasses};

/// Error type for rendering
#[derive(Debug)]
pub enum RenderError {
    /// IO error (spawning the backend, writing scripts or metadata)
    Io(io::Error),
    /// Backend process exited unsuccessfully
    Backend { status: Option<i32>, stderr: String },
    /// Scene failed validation
    InvalidScene(Vec<ValidationError>),
    /// Scene has no usable camera
    MissingCamera,
    /// Output path has no recognized form
    UnsupportedOutput(PathBuf),
    /// Backend finished but an expected file is absent
    MissingOutput(PathBuf),
    /// Asset render file is in a format the backend cannot import
    UnsupportedAsset(PathBuf),
    /// Annotation metadata could not be serialized or written
    Annotation(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "Render IO error: {}", e),
            RenderError::Backend { status, stderr } => {
                match status {
                    Some(code) => write!(f, "Render backend exited with status {}", code)?,
                    None => write!(f, "Render backend was terminated by a signal")?,
                }
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            RenderError::InvalidScene(errors) => {
                write!(f, "Scene failed validation:")?;
                for error in errors {
                    write!(f, " {};", error)?;
                }
                Ok(())
            }
            RenderError::MissingCamera => write!(f, "Scene has no camera to render from"),
            RenderError::UnsupportedOutput(path) => {
                write!(f, "Unsupported output path: {}", path.display())
            }
            RenderError::MissingOutput(path) => {
                write!(f, "Render backend did not produce {}", path.display())
            }
            RenderError::UnsupportedAsset(path) => {
                write!(f, "Cannot import asset geometry: {}", path.display())
            }
            RenderError::Annotation(msg) => write!(f, "Annotation error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RenderError {
    fn from(e: io::Error) -> Self {
        RenderError::Io(e)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Annotation(e.to_string())
    }
}

/// Everything a backend needs to produce one output
#[derive(Clone, Debug)]
pub struct RenderJob<'a> {
    pub scene: &'a Scene,
    pub output: PathBuf,
    pub kind: OutputKind,
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub passes: RenderPasses,
}

impl RenderJob<'_> {
    /// Files the backend is expected to write
    pub fn expected_files(&self) -> Vec<PathBuf> {
        self.kind.expected_files(
            &self.output,
            self.scene.frame_start,
            self.scene.frame_end,
            self.passes,
        )
    }

    /// Where the annotation metadata goes, `None` for scene files
    ///
    /// `shot.png` gets `shot_metadata.json`, the sequence `out/frame_` gets
    /// `out/frame_metadata.json`.
    pub fn metadata_path(&self) -> Option<PathBuf> {
        match &self.kind {
            OutputKind::SceneFile => None,
            OutputKind::ImageSequence { prefix } => {
                Some(PathBuf::from(format!("{}metadata.json", prefix.to_string_lossy())))
            }
            OutputKind::Still | OutputKind::Video => {
                let stem = self
                    .output
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Some(self.output.with_file_name(format!("{}_metadata.json", stem)))
            }
        }
    }
}

/// A program that turns a [`RenderJob`] into files
pub trait RenderBackend {
    /// Name used in log messages
    fn name(&self) -> &str;

    /// Produce the files of `job`, blocking until done
    fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError>;
}

/// Render settings plus the backend that executes them
pub struct Renderer {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel
    pub samples: u32,
    pub passes: RenderPasses,
    backend: Box<dyn RenderBackend>,
}

impl Renderer {
    /// Renderer at 640x480, 64 samples, image pass only
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            width: 640,
            height: 480,
            samples: 64,
            passes: RenderPasses::IMAGE,
            backend,
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_passes(mut self, passes: RenderPasses) -> Self {
        self.passes = passes;
        self
    }

    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    /// Validate `scene` and describe the job of rendering it to `path`
    pub fn prepare<'a>(&self, scene: &'a Scene, path: &Path) -> Result<RenderJob<'a>, RenderError> {
        SceneValidator::validate_or_error(scene).map_err(|errors| {
            if errors.contains(&ValidationError::MissingCamera) && errors.len() == 1 {
                RenderError::MissingCamera
            } else {
                RenderError::InvalidScene(errors)
            }
        })?;

        let kind = OutputKind::from_path(path)?;
        Ok(RenderJob {
            scene,
            output: path.to_path_buf(),
            kind,
            width: self.width,
            height: self.height,
            samples: self.samples,
            passes: self.passes,
        })
    }

    /// Render `scene` to `path`
    ///
    /// `on_render_write` is called for every produced file in order: the
    /// rendered images, video or scene file, then the annotation metadata.
    /// Returns the same list.
    pub fn render<F>(&self, scene: &Scene, path: impl AsRef<Path>, mut on_render_write: F) -> Result<Vec<PathBuf>, RenderError>
    where
        F: FnMut(&Path),
    {
        let job = self.prepare(scene, path.as_ref())?;
        log::info!(
            "Rendering '{}' ({}x{}, frames {}..={}, {} samples) to {} with {}",
            scene.name,
            job.width,
            job.height,
            scene.frame_start,
            scene.frame_end,
            job.samples,
            job.output.display(),
            self.backend.name()
        );

        create_parent_dir(&job.output)?;
        self.backend.render(&job)?;

        let mut written = job.expected_files();
        if let Some(missing) = written.iter().find(|file| !file.exists()) {
            return Err(RenderError::MissingOutput(missing.clone()));
        }

        if let Some(metadata_path) = job.metadata_path() {
            let annotations = SceneAnnotations::from_job(&job)?;
            annotations.write(&metadata_path)?;
            written.push(metadata_path);
        }

        for file in &written {
            log::debug!("Wrote {}", file.display());
            on_render_write(file);
        }
        Ok(written)
    }
}

fn create_parent_dir(path: &Path) -> io::Result<()> {
    // Sequence prefixes like `frames/` name the directory itself
    let dir = if path.to_string_lossy().ends_with('/') {
        Some(path)
    } else {
        path.parent()
    };
    match dir {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
