//! Template rendering.
//!
//! - `engine`: minijinja environment over the template directory
//! - `synth`: child template synthesis from content blocks

mod engine;
mod synth;

pub use engine::TemplateEngine;
pub use synth::synthesize;
