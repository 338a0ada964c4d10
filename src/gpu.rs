// src/gpu.rs
//! Abstract graphics-API boundary.
//!
//! The rest of the crate never talks to a concrete driver; it issues calls
//! against [`GlContext`] using the strongly typed enums below. A real backend
//! (OpenGL, GLES, a software rasterizer, a command recorder for tests)
//! implements the trait. All calls are synchronous and require the backend's
//! context to be current on the calling thread.

use std::num::NonZeroU32;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Opaque handle to a driver-side texture object. Never zero; a texture that
/// has not been realized simply has no handle at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub NonZeroU32);

/// Resolved location of a uniform within a linked program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

// ---------------------------------------------------------------------------
// API-side enums
// ---------------------------------------------------------------------------

/// Binding target for texture objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2d,
    TextureCubeMap,
}

/// Wrap axis for `set_wrap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapAxis {
    S,
    T,
}

/// Which filter of the sampler `set_filter` updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Mag,
    Min,
}

/// Driver-side wrap modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GpuWrap {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

/// Driver-side filter modes, including the mipmapped variants that are only
/// legal on power-of-two images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GpuFilter {
    Nearest,
    NearestMipmapNearest,
    NearestMipmapLinear,
    Linear,
    LinearMipmapNearest,
    LinearMipmapLinear,
}

/// Driver-side pixel layout of uploaded image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GpuPixelFormat {
    Rgb,
    Rgba,
}

/// Driver-side component type of uploaded image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GpuPixelType {
    UnsignedByte,
    Byte,
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// The texture-facing slice of the graphics API.
///
/// Callers must have a current context on this thread; there is no queuing or
/// deferral. Object creation/deletion is explicit — implementations must not
/// allocate on bind.
pub trait GlContext {
    fn create_texture(&self) -> TextureId;
    fn delete_texture(&self, id: TextureId);

    /// Select the active texture unit before a bind.
    fn active_texture(&self, slot: u32);
    fn bind_texture(&self, target: TextureTarget, id: TextureId);

    fn set_wrap(&self, target: TextureTarget, axis: WrapAxis, wrap: GpuWrap);
    fn set_filter(&self, target: TextureTarget, kind: FilterKind, filter: GpuFilter);
    fn set_unpack_alignment(&self, alignment: i32);

    /// Upload one mip level of pixel data to the currently bound texture.
    #[allow(clippy::too_many_arguments)]
    fn upload_image_2d(
        &self,
        target: TextureTarget,
        level: u32,
        format: GpuPixelFormat,
        width: u32,
        height: u32,
        pixel_type: GpuPixelType,
        data: &[u8],
    );

    /// Generate the full mip chain for the currently bound texture.
    fn generate_mipmaps(&self, target: TextureTarget);
}

/// Uniform-location lookup on a linked program.
///
/// Returns `None` when the program does not use the named uniform — that is
/// an expected outcome, not an error.
pub trait ProgramLocations {
    fn uniform_location(&self, name: &str) -> Option<UniformLocation>;
}

impl<F> ProgramLocations for F
where
    F: Fn(&str) -> Option<UniformLocation>,
{
    fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self(name)
    }
}
