#![allow(clippy::new_without_default)]

pub mod opengl;
pub mod settings;
pub mod shader;
pub mod vfs;

pub use glam as math;

pub use crate::shader::{Renderer, RendererKind, Shader, ShaderData, ShaderManager};
