// src/texture.rs
//! CPU-side texture state and its GPU object lifecycle.
//!
//! A [`Texture`] owns decoded pixel data plus sampling parameters and tracks
//! a single lazily allocated GPU handle. `bind` realizes the handle on first
//! use; `load` uploads pixels only while the dirty flag is set; `unrealize`
//! throws the GPU object away and re-arms the dirty flag so the next bind
//! re-uploads. Non-power-of-two images silently degrade to clamped,
//! non-mipmapped sampling instead of failing.

use glam::Vec2;
use image::{imageops, DynamicImage};
use uuid::Uuid;

use crate::gpu::{
    FilterKind, GlContext, GpuFilter, GpuPixelFormat, GpuPixelType, GpuWrap, TextureId,
    TextureTarget, WrapAxis,
};

// ---------------------------------------------------------------------------
// Sampling configuration
// ---------------------------------------------------------------------------

/// Texture coordinate wrap behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrapping {
    Repeat,
    Clamp,
    Mirrored,
}

/// Minification/magnification filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    NearestMipmapNearest,
    NearestMipmapLinear,
    Linear,
    LinearMipmapNearest,
    LinearMipmapLinear,
}

/// Channel layout of the CPU pixel source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgb,
    Rgba,
}

/// Component type of the CPU pixel source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    UnsignedByte,
    Byte,
}

/// Wrap translation. Exhaustive today; `Repeat` is the documented default for
/// any wrap mode a future variant fails to map.
pub fn wrap_to_gpu(wrap: Wrapping) -> GpuWrap {
    match wrap {
        Wrapping::Repeat => GpuWrap::Repeat,
        Wrapping::Clamp => GpuWrap::ClampToEdge,
        Wrapping::Mirrored => GpuWrap::MirroredRepeat,
    }
}

/// Filter translation. `Linear` is the documented default for any filter a
/// future variant fails to map.
pub fn filter_to_gpu(filter: Filter) -> GpuFilter {
    match filter {
        Filter::Nearest => GpuFilter::Nearest,
        Filter::NearestMipmapNearest => GpuFilter::NearestMipmapNearest,
        Filter::NearestMipmapLinear => GpuFilter::NearestMipmapLinear,
        Filter::Linear => GpuFilter::Linear,
        Filter::LinearMipmapNearest => GpuFilter::LinearMipmapNearest,
        Filter::LinearMipmapLinear => GpuFilter::LinearMipmapLinear,
    }
}

/// Non-mipmap fallback for non-power-of-two images: the nearest family
/// collapses to `Nearest`, everything else to `Linear`.
pub fn filter_fallback(filter: Filter) -> GpuFilter {
    match filter {
        Filter::Nearest | Filter::NearestMipmapNearest | Filter::NearestMipmapLinear => {
            GpuFilter::Nearest
        }
        _ => GpuFilter::Linear,
    }
}

/// Format translation; unknown/unspecified formats default to 4-channel RGBA.
pub fn format_to_gpu(format: TextureFormat) -> GpuPixelFormat {
    match format {
        TextureFormat::Rgb => GpuPixelFormat::Rgb,
        TextureFormat::Rgba => GpuPixelFormat::Rgba,
    }
}

/// Type translation; unknown/unspecified types default to unsigned byte.
pub fn data_type_to_gpu(data_type: DataType) -> GpuPixelType {
    match data_type {
        DataType::UnsignedByte => GpuPixelType::UnsignedByte,
        DataType::Byte => GpuPixelType::Byte,
    }
}

// ---------------------------------------------------------------------------
// Texture resource
// ---------------------------------------------------------------------------

/// A texture resource: CPU pixel source + sampling state + lazy GPU handle.
#[derive(Debug)]
pub struct Texture {
    uuid: Uuid,
    name: Option<String>,

    pixels: Option<DynamicImage>,
    gpu_handle: Option<TextureId>,
    needs_update: bool,

    wrap_s: Wrapping,
    wrap_t: Wrapping,
    mag_filter: Filter,
    min_filter: Filter,
    format: TextureFormat,
    data_type: DataType,

    flip_y: bool,
    generate_mipmaps: bool,
    unpack_alignment: i32,
    anisotropy: i32,

    offset: Vec2,
    repeat: Vec2,
    max_mip_level: u32,
}

impl Texture {
    /// Create a texture from decoded pixel data. The upload format follows
    /// the image's alpha channel.
    pub fn new(pixels: DynamicImage) -> Self {
        let format = if pixels.color().has_alpha() {
            TextureFormat::Rgba
        } else {
            TextureFormat::Rgb
        };
        let mut texture = Self::empty();
        texture.format = format;
        texture.pixels = Some(pixels);
        texture
    }

    /// Convenience: decode encoded image bytes (PNG/JPEG) into a texture.
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        let pixels = image::load_from_memory(bytes)?;
        Ok(Self::new(pixels))
    }

    /// Create a texture with no pixel source; `load` on it is bind-only until
    /// pixels are attached.
    pub fn empty() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: None,
            pixels: None,
            gpu_handle: None,
            needs_update: true,
            wrap_s: Wrapping::Clamp,
            wrap_t: Wrapping::Clamp,
            mag_filter: Filter::Linear,
            min_filter: Filter::LinearMipmapLinear,
            format: TextureFormat::Rgba,
            data_type: DataType::UnsignedByte,
            flip_y: true,
            generate_mipmaps: true,
            unpack_alignment: 4,
            anisotropy: 1,
            offset: Vec2::ZERO,
            repeat: Vec2::ONE,
            max_mip_level: 0,
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn set_needs_update(&mut self, needs_update: bool) {
        self.needs_update = needs_update;
    }

    pub fn wrap_s(&self) -> Wrapping {
        self.wrap_s
    }

    pub fn set_wrap_s(&mut self, wrap: Wrapping) {
        self.wrap_s = wrap;
    }

    pub fn wrap_t(&self) -> Wrapping {
        self.wrap_t
    }

    pub fn set_wrap_t(&mut self, wrap: Wrapping) {
        self.wrap_t = wrap;
    }

    pub fn mag_filter(&self) -> Filter {
        self.mag_filter
    }

    pub fn set_mag_filter(&mut self, filter: Filter) {
        self.mag_filter = filter;
    }

    pub fn min_filter(&self) -> Filter {
        self.min_filter
    }

    pub fn set_min_filter(&mut self, filter: Filter) {
        self.min_filter = filter;
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn set_format(&mut self, format: TextureFormat) {
        self.format = format;
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    pub fn set_flip_y(&mut self, flip_y: bool) {
        self.flip_y = flip_y;
    }

    pub fn generate_mipmaps(&self) -> bool {
        self.generate_mipmaps
    }

    pub fn set_generate_mipmaps(&mut self, generate: bool) {
        self.generate_mipmaps = generate;
    }

    pub fn anisotropy(&self) -> i32 {
        self.anisotropy
    }

    pub fn set_anisotropy(&mut self, anisotropy: i32) {
        self.anisotropy = anisotropy;
    }

    /// UV-space offset applied by materials via their `uvTransform` uniform.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// UV-space tiling factor, paired with [`Self::offset`].
    pub fn repeat(&self) -> Vec2 {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: Vec2) {
        self.repeat = repeat;
    }

    pub fn max_mip_level(&self) -> u32 {
        self.max_mip_level
    }

    /// The driver-side handle, if the texture has been realized.
    pub fn gpu_handle(&self) -> Option<TextureId> {
        self.gpu_handle
    }

    pub fn is_realized(&self) -> bool {
        self.gpu_handle.is_some()
    }

    // -- GPU lifecycle ------------------------------------------------------

    /// Bind to texture unit `slot`. The one and only allocation point: a
    /// handle is created here on first use and reused afterwards.
    pub fn bind(&mut self, gl: &dyn GlContext, slot: u32, target: TextureTarget) {
        let id = match self.gpu_handle {
            Some(id) => id,
            None => {
                let id = gl.create_texture();
                log::debug!("texture {} realized as {:?}", self.uuid, id);
                self.gpu_handle = Some(id);
                id
            }
        };
        gl.active_texture(slot);
        gl.bind_texture(target, id);
    }

    /// Bind, and upload the pixel source if the texture is dirty. With a
    /// clean flag or no pixels this is bind-only.
    pub fn load(&mut self, gl: &dyn GlContext, slot: u32) {
        self.bind(gl, slot, TextureTarget::Texture2d);

        if !self.needs_update {
            return;
        }
        let Some(pixels) = self.pixels.as_ref() else {
            return;
        };

        let width = pixels.width();
        let height = pixels.height();
        let pow2 = width.is_power_of_two() && height.is_power_of_two();

        gl.set_unpack_alignment(self.unpack_alignment);

        let gpu_format = format_to_gpu(self.format);
        let gpu_type = data_type_to_gpu(self.data_type);

        self.set_parameters(gl, TextureTarget::Texture2d, pow2);

        // Flip on a transient copy; the stored source is never mutated.
        let data = if self.flip_y {
            pixel_bytes(&imageops::flip_vertical(pixels).into(), self.format)
        } else {
            pixel_bytes(pixels, self.format)
        };
        gl.upload_image_2d(
            TextureTarget::Texture2d,
            0,
            gpu_format,
            width,
            height,
            gpu_type,
            &data,
        );

        if self.generate_mipmaps && pow2 {
            gl.generate_mipmaps(TextureTarget::Texture2d);
            self.max_mip_level = (width.max(height) as f32).log2().floor() as u32;
        }

        self.needs_update = false;
    }

    /// Push wrap and filter parameters for the bound target.
    ///
    /// Power-of-two images use the configured parameters; everything else is
    /// forced to clamp-to-edge and a non-mipmap filter, since NPOT wrap and
    /// mipmapping are unreliable on many backends.
    pub fn set_parameters(&self, gl: &dyn GlContext, target: TextureTarget, pow2: bool) {
        if pow2 {
            gl.set_wrap(target, WrapAxis::S, wrap_to_gpu(self.wrap_s));
            gl.set_wrap(target, WrapAxis::T, wrap_to_gpu(self.wrap_t));
            gl.set_filter(target, FilterKind::Mag, filter_to_gpu(self.mag_filter));
            gl.set_filter(target, FilterKind::Min, filter_to_gpu(self.min_filter));
        } else {
            gl.set_wrap(target, WrapAxis::S, GpuWrap::ClampToEdge);
            gl.set_wrap(target, WrapAxis::T, GpuWrap::ClampToEdge);
            gl.set_filter(target, FilterKind::Mag, filter_fallback(self.mag_filter));
            gl.set_filter(target, FilterKind::Min, filter_fallback(self.min_filter));
        }
    }

    /// Drop the GPU object (context loss, explicit teardown). The texture
    /// must currently be realized — calling this on an unrealized texture is
    /// a caller bug. The dirty flag is re-armed so the next bind re-uploads.
    pub fn unrealize(&mut self, gl: &dyn GlContext) {
        let id = self
            .gpu_handle
            .take()
            .expect("unrealize called on a texture with no GPU handle");
        gl.delete_texture(id);
        self.needs_update = true;
    }

    /// Final teardown: releases the pixel source and deletes the GPU handle
    /// if one was ever allocated. Unlike `unrealize`, never-bound textures
    /// are fine here.
    pub fn dispose(&mut self, gl: &dyn GlContext) {
        self.pixels = None;
        if let Some(id) = self.gpu_handle.take() {
            gl.delete_texture(id);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        // Deleting a driver object needs a current context, which a plain
        // drop cannot guarantee; realized textures must go through
        // `dispose`/`unrealize` first.
        if let Some(id) = self.gpu_handle {
            log::warn!(
                "texture {} dropped while still realized ({id:?}); GPU handle leaked",
                self.uuid
            );
        }
    }
}

fn pixel_bytes(pixels: &DynamicImage, format: TextureFormat) -> Vec<u8> {
    match format {
        TextureFormat::Rgba => pixels.to_rgba8().into_raw(),
        TextureFormat::Rgb => pixels.to_rgb8().into_raw(),
    }
}
