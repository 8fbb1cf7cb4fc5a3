//! Blender render backend
//!
//! Runs `blender -noaudio --background --python <script>` on a script
//! generated from the job. Blender must be installed; nothing here links
//! against it.

mod script;

pub use script::{BlenderScript, IMPORT_FORMATS};

use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::renderer::{RenderBackend, RenderError, RenderJob};

/// Blender render engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Path tracer; the only engine with shadow catchers and flow passes
    #[default]
    Cycles,
    Eevee,
    Workbench,
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cycles" => Ok(Engine::Cycles),
            "eevee" => Ok(Engine::Eevee),
            "workbench" => Ok(Engine::Workbench),
            other => Err(format!("Unknown render engine: {}", other)),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Cycles => write!(f, "cycles"),
            Engine::Eevee => write!(f, "eevee"),
            Engine::Workbench => write!(f, "workbench"),
        }
    }
}

/// Drives a Blender executable
#[derive(Clone, Debug)]
pub struct BlenderBackend {
    pub executable: PathBuf,
    pub engine: Engine,
    /// Appended after `--`; visible to the script as `sys.argv`
    pub extra_args: Vec<String>,
    /// Also write each generated script here
    pub keep_script: Option<PathBuf>,
}

impl Default for BlenderBackend {
    fn default() -> Self {
        Self::new("blender")
    }
}

impl BlenderBackend {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            engine: Engine::default(),
            extra_args: Vec::new(),
            keep_script: None,
        }
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_keep_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.keep_script = Some(path.into());
        self
    }

    /// Arguments passed to Blender for `script`
    pub fn arguments(&self, script: &std::path::Path) -> Vec<String> {
        let mut args = vec![
            "-noaudio".to_string(),
            "--background".to_string(),
            // Exceptions in the script would otherwise exit with status 0
            "--python-exit-code".to_string(),
            "1".to_string(),
            "--python".to_string(),
            script.display().to_string(),
        ];
        if !self.extra_args.is_empty() {
            args.push("--".to_string());
            args.extend(self.extra_args.iter().cloned());
        }
        args
    }
}

impl RenderBackend for BlenderBackend {
    fn name(&self) -> &str {
        "blender"
    }

    fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError> {
        let script = BlenderScript::generate(job, self.engine)?;
        if let Some(path) = &self.keep_script {
            script.write(path)?;
            log::debug!("Kept Blender script at {}", path.display());
        }

        let file = tempfile::Builder::new()
            .prefix("synthscene")
            .suffix(".py")
            .tempfile()?;
        script.write(file.path())?;

        let args = self.arguments(file.path());
        log::debug!("Running {} {}", self.executable.display(), args.join(" "));
        let output = Command::new(&self.executable).args(&args).output()?;

        log::debug!("Blender output:\n{}", String::from_utf8_lossy(&output.stdout));
        if !output.status.success() {
            return Err(RenderError::Backend {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}
