// src/lib.rs
//! Shader/material resolution and GPU resource lifecycle for a retained-mode
//! scene-graph renderer.
//!
//! What lives here:
//! - A built-in [`ShaderLibrary`] of material kinds, each built by expanding
//!   `#include` directives against an embedded chunk store and layering
//!   shared uniform fragments under kind-specific definitions.
//! - [`Shader`] descriptors with content hashing for program caching, cheap
//!   clones that share source text, and order-sensitive define lists.
//! - [`Uniforms`] sets with lazy per-program location resolution, including
//!   the `name[0]` flat-array and `name[i].child` nested-struct conventions.
//! - [`Texture`] resources with lazy GPU allocation, dirty-flag driven
//!   uploads, and the power-of-two parameter fallback policy.
//! - The Gaussian kernel builder feeding the convolution post-process pass.
//!
//! The graphics driver is abstracted behind [`gpu::GlContext`]; everything is
//! single-threaded and synchronous, tied to one current context.
//!
//! ```
//! use glint::{EmbeddedResources, ShaderLibrary};
//!
//! let library = ShaderLibrary::new(&EmbeddedResources).unwrap();
//! let mut material_shader = library.clone_shader("phong").unwrap();
//! material_shader.set_defines(["USE_MAP", "1"].iter().map(|s| s.to_string()).collect());
//! assert_ne!(material_shader.hash(), library.get("phong").unwrap().hash());
//! ```

pub mod effects;
pub mod error;
pub mod gpu;
pub mod library;
pub mod preprocess;
pub mod resources;
pub mod shader;
pub mod texture;
pub mod uniform_lib;
pub mod uniforms;

pub use error::{Error, Result};
pub use library::{ShaderLibrary, BUILTIN_KINDS};
pub use resources::{EmbeddedResources, ShaderResources};
pub use shader::{DefineList, Shader};
pub use texture::{DataType, Filter, Texture, TextureFormat, Wrapping};
pub use uniforms::{Uniform, UniformValue, Uniforms};
