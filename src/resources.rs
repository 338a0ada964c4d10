// src/resources.rs
//! Name-addressed shader text storage.
//!
//! Shader source lives in a read-only blob store addressed by
//! `<category>/<name>.glsl`. Two categories exist: `shader_lib` holds the
//! per-kind vertex/fragment templates, `shader_chunks` holds the reusable
//! fragments pulled in by `#include <name>` directives. The default store is
//! compiled into the crate from the `shaders/` tree; embedders can substitute
//! their own lookup (filesystem, archive, download cache) by implementing
//! [`ShaderResources`].

/// Category prefix for per-kind vertex/fragment templates.
pub const SHADER_LIB_ROOT: &str = "shader_lib/";

/// Category prefix for `#include` chunks.
pub const SHADER_CHUNK_ROOT: &str = "shader_chunks/";

/// Read-only, name-addressed text lookup.
pub trait ShaderResources {
    /// Resolve a full path such as `shader_chunks/fog_fragment.glsl`.
    /// `None` means not found; the caller decides whether that is a warning
    /// (chunk include) or a startup fault (library template).
    fn lookup(&self, path: &str) -> Option<&str>;
}

/// Path of a template in the `shader_lib` category.
pub fn lib_path(name: &str) -> String {
    format!("{SHADER_LIB_ROOT}{name}.glsl")
}

/// Path of a chunk in the `shader_chunks` category.
pub fn chunk_path(name: &str) -> String {
    format!("{SHADER_CHUNK_ROOT}{name}.glsl")
}

/// The built-in resource bundle, embedded at compile time.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedResources;

impl ShaderResources for EmbeddedResources {
    fn lookup(&self, path: &str) -> Option<&str> {
        EMBEDDED
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, text)| *text)
    }
}

macro_rules! chunk {
    ($name:literal) => {
        (
            concat!("shader_chunks/", $name, ".glsl"),
            include_str!(concat!("../shaders/shader_chunks/", $name, ".glsl")),
        )
    };
}

macro_rules! lib {
    ($name:literal) => {
        (
            concat!("shader_lib/", $name, ".glsl"),
            include_str!(concat!("../shaders/shader_lib/", $name, ".glsl")),
        )
    };
}

static EMBEDDED: &[(&str, &str)] = &[
    chunk!("common"),
    chunk!("uv_pars_vertex"),
    chunk!("uv_vertex"),
    chunk!("begin_vertex"),
    chunk!("project_vertex"),
    chunk!("map_pars_fragment"),
    chunk!("map_fragment"),
    chunk!("fog_pars_fragment"),
    chunk!("fog_fragment"),
    chunk!("lights_pars_begin"),
    lib!("meshbasic_vert"),
    lib!("meshbasic_frag"),
    lib!("meshlambert_vert"),
    lib!("meshlambert_frag"),
    lib!("meshphong_vert"),
    lib!("meshphong_frag"),
    lib!("meshphysical_vert"),
    lib!("meshphysical_frag"),
    lib!("meshmatcap_vert"),
    lib!("meshmatcap_frag"),
    lib!("points_vert"),
    lib!("points_frag"),
    lib!("linedashed_vert"),
    lib!("linedashed_frag"),
    lib!("depth_vert"),
    lib!("depth_frag"),
    lib!("normal_vert"),
    lib!("normal_frag"),
    lib!("sprite_vert"),
    lib!("sprite_frag"),
    lib!("background_vert"),
    lib!("background_frag"),
    lib!("cube_vert"),
    lib!("cube_frag"),
    lib!("equirect_vert"),
    lib!("equirect_frag"),
    lib!("distanceRGBA_vert"),
    lib!("distanceRGBA_frag"),
    lib!("shadow_vert"),
    lib!("shadow_frag"),
    lib!("copy_vert"),
    lib!("copy_frag"),
    lib!("convolution_vert"),
    lib!("convolution_frag"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_bundle_is_complete() {
        for (path, text) in EMBEDDED {
            assert!(!text.is_empty(), "{path} is empty");
        }
        assert!(EmbeddedResources.lookup("shader_chunks/common.glsl").is_some());
        assert!(EmbeddedResources.lookup("shader_lib/meshbasic_vert.glsl").is_some());
        assert!(EmbeddedResources.lookup("shader_chunks/nope.glsl").is_none());
    }

    #[test]
    fn path_helpers() {
        assert_eq!(chunk_path("fog_fragment"), "shader_chunks/fog_fragment.glsl");
        assert_eq!(lib_path("copy_vert"), "shader_lib/copy_vert.glsl");
    }
}
