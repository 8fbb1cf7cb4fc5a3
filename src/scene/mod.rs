//! Scene construction utilities
//!
//! This module provides a declarative API for building scenes, and the
//! hello-world shot the command line renders.

mod hello_world;
mod scene_builder;

pub use hello_world::{hello_world_scene, load_mesh, HelloWorldError, HelloWorldOptions};
pub use scene_builder::SceneBuilder;
