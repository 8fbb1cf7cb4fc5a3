//! Output kinds, chosen from the requested output path

use std::path::{Path, PathBuf};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::renderer::RenderError;

const STILL_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "exr", "tif", "tiff"];
const VIDEO_EXTENSIONS: &[&str] = &["mov", "mp4", "avi", "mkv"];

bitflags! {
    /// Render passes written next to the image output
    ///
    /// Everything except `IMAGE` goes to a multilayer EXR per frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RenderPasses: u32 {
        /// Combined color image
        const IMAGE = 1 << 0;
        /// Z depth
        const DEPTH = 1 << 1;
        /// World-space normals
        const NORMAL = 1 << 2;
        /// Per-object index masks
        const SEGMENTATION = 1 << 3;
        /// Optical flow (vector pass)
        const FLOW = 1 << 4;
    }
}

impl Default for RenderPasses {
    fn default() -> Self {
        RenderPasses::IMAGE
    }
}

impl RenderPasses {
    /// Parse pass names such as `["image", "depth"]`, case-insensitive
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        names.iter().try_fold(RenderPasses::empty(), |passes, name| {
            let name = name.as_ref();
            RenderPasses::from_name(&name.to_ascii_uppercase())
                .map(|pass| passes | pass)
                .ok_or_else(|| format!("Unknown render pass: {}", name))
        })
    }

    /// Whether any pass besides the color image is enabled
    pub fn has_data_passes(&self) -> bool {
        !self.difference(RenderPasses::IMAGE).is_empty()
    }
}

/// What the backend produces for an output path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// One image per frame, named `<prefix>NNNN.png`
    ImageSequence { prefix: PathBuf },
    /// A single image of the first frame
    Still,
    /// An encoded video of the whole frame range
    Video,
    /// The assembled scene saved as a `.blend` file, nothing rendered
    SceneFile,
}

impl OutputKind {
    /// Classify `path`
    ///
    /// Paths ending with a separator, or whose file name ends with `_`, are
    /// image sequence prefixes (`out/` or `out/frame_`).
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let text = path.to_string_lossy();
        if text.ends_with('/') || text.ends_with(std::path::MAIN_SEPARATOR) {
            return Ok(OutputKind::ImageSequence { prefix: path.to_path_buf() });
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some(ext) if STILL_EXTENSIONS.contains(&ext) => Ok(OutputKind::Still),
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext) => Ok(OutputKind::Video),
            Some("blend") => Ok(OutputKind::SceneFile),
            None if text.ends_with('_') => {
                Ok(OutputKind::ImageSequence { prefix: path.to_path_buf() })
            }
            _ => Err(RenderError::UnsupportedOutput(path.to_path_buf())),
        }
    }

    /// Files produced for `path` over the inclusive frame range
    ///
    /// Data passes add one multilayer EXR per rendered frame.
    pub fn expected_files(
        &self,
        path: &Path,
        frame_start: i32,
        frame_end: i32,
        passes: RenderPasses,
    ) -> Vec<PathBuf> {
        let mut files = match self {
            OutputKind::ImageSequence { prefix } => (frame_start..=frame_end)
                .map(|frame| frame_path(prefix, frame, "png"))
                .collect(),
            OutputKind::Still | OutputKind::Video | OutputKind::SceneFile => {
                vec![path.to_path_buf()]
            }
        };

        if passes.has_data_passes() {
            let frames = match self {
                OutputKind::Still => frame_start..=frame_start,
                OutputKind::SceneFile => return files,
                _ => frame_start..=frame_end,
            };
            let prefix = self.data_pass_prefix(path);
            files.extend(frames.map(|frame| frame_path(&prefix, frame, "exr")));
        }
        files
    }

    /// Prefix the data-pass EXRs are written with
    ///
    /// `out/frame_` becomes `out/frame_passes_`, `shot.png` becomes `shot_passes_`.
    pub fn data_pass_prefix(&self, path: &Path) -> PathBuf {
        match self {
            OutputKind::ImageSequence { prefix } => {
                PathBuf::from(format!("{}passes_", prefix.to_string_lossy()))
            }
            _ => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                path.with_file_name(format!("{}_passes_", stem))
            }
        }
    }

    pub fn is_scene_file(&self) -> bool {
        matches!(self, OutputKind::SceneFile)
    }
}

/// `<prefix>NNNN.<extension>`, the naming Blender uses for frame sequences
pub fn frame_path(prefix: &Path, frame: i32, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}{:04}.{}", prefix.to_string_lossy(), frame, extension))
}
