//! Rendering for SynthScene
//!
//! The toolkit does not render anything itself. A [`Renderer`] validates a
//! scene and hands it to a [`RenderBackend`]; the [`BlenderBackend`]
//! translates it into a Blender Python script and runs Blender headless.
//! Every render also produces [`SceneAnnotations`] with the ground truth
//! (camera intrinsics, per-frame poses, physical properties).

mod annotations;
mod blender;
mod output;
mod renderer;

pub use annotations::{CameraAnnotation, ObjectAnnotation, SceneAnnotations, Trajectory};
pub use blender::{BlenderBackend, BlenderScript, Engine, IMPORT_FORMATS};
pub use output::{frame_path, OutputKind, RenderPasses};
pub use renderer::{RenderBackend, RenderError, RenderJob, Renderer};
