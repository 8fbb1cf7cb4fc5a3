//! SynthScene application library
//!
//! Configuration, scene construction helpers and output publishing used by
//! the `synthscene` command line tool.

pub mod config;
pub mod publish;
pub mod scene;
