// src/library.rs
//! The built-in shader library.
//!
//! One [`ShaderLibrary`] holds the default descriptor for every built-in
//! material kind. It is built once — typically at renderer startup — and
//! passed by reference to whoever needs it; materials call
//! [`ShaderLibrary::clone_shader`] so they can mutate defines and uniforms
//! without touching the library's copy.

use fxhash::FxHashMap;

use crate::error::Result;
use crate::resources::ShaderResources;
use crate::shader::Shader;
use crate::uniforms::UniformValue;

use glam::{Mat3, Vec2, Vec3};

/// Names of every built-in kind, in construction order.
pub const BUILTIN_KINDS: &[&str] = &[
    "basic",
    "lambert",
    "phong",
    "standard",
    "matcap",
    "points",
    "dashed",
    "depth",
    "normal",
    "sprite",
    "background",
    "cube",
    "equirect",
    "distanceRGBA",
    "shadow",
    "physical",
    "copy",
    "convolution",
];

/// The convolution pass compiles against a fixed maximum kernel size; the
/// actual kernel from [`crate::effects::build_gaussian_kernel`] is padded or
/// truncated to fit by the pass, never by the shader.
pub const CONVOLUTION_DEFINES: &[&str] =
    &["KERNEL_SIZE_FLOAT", "25.0", "KERNEL_SIZE_INT", "25"];

/// Registry mapping built-in kind names to their default descriptors.
#[derive(Debug)]
pub struct ShaderLibrary {
    shaders: FxHashMap<&'static str, Shader>,
}

struct KindSpec {
    kind: &'static str,
    lib_uniforms: &'static [&'static str],
    defines: &'static [&'static str],
    vertex: &'static str,
    fragment: &'static str,
}

const DARK_GREY: Vec3 = Vec3::new(0.06666666666666667, 0.06666666666666667, 0.06666666666666667);

fn kind_uniform_defs(kind: &str) -> Vec<(&'static str, UniformValue)> {
    match kind {
        "lambert" => vec![("emissive", UniformValue::Vector3(Vec3::ZERO))],
        "phong" => vec![
            ("emissive", UniformValue::Vector3(Vec3::ZERO)),
            ("specular", UniformValue::Vector3(DARK_GREY)),
            ("shininess", UniformValue::Float(30.0)),
        ],
        "standard" => vec![
            ("emissive", UniformValue::Vector3(Vec3::ZERO)),
            ("roughness", UniformValue::Float(0.5)),
            ("metalness", UniformValue::Float(0.5)),
            ("envMapIntensity", UniformValue::Float(1.0)),
        ],
        "matcap" => vec![("matcap", UniformValue::Texture(None))],
        "dashed" => vec![
            ("scale", UniformValue::Float(1.0)),
            ("dashSize", UniformValue::Float(1.0)),
            ("totalSize", UniformValue::Float(2.0)),
        ],
        "normal" => vec![("opacity", UniformValue::Float(1.0))],
        "background" => vec![
            ("uvTransform", UniformValue::Matrix3(Mat3::IDENTITY)),
            ("t2D", UniformValue::Texture(None)),
        ],
        "cube" => vec![
            ("tCube", UniformValue::Texture(None)),
            ("tFlip", UniformValue::Float(-1.0)),
            ("opacity", UniformValue::Float(1.0)),
        ],
        "equirect" => vec![("tEquirect", UniformValue::Texture(None))],
        "distanceRGBA" => vec![
            ("referencePosition", UniformValue::Vector3(Vec3::ZERO)),
            ("nearDistance", UniformValue::Float(1.0)),
            ("farDistance", UniformValue::Float(1000.0)),
        ],
        "shadow" => vec![
            ("color", UniformValue::Vector3(Vec3::ZERO)),
            ("opacity", UniformValue::Float(1.0)),
        ],
        "physical" => vec![
            ("clearCoat", UniformValue::Float(0.0)),
            ("clearCoatRoughness", UniformValue::Float(0.0)),
        ],
        "copy" => vec![
            ("tDiffuse", UniformValue::Texture(None)),
            ("opacity", UniformValue::Float(1.0)),
        ],
        "convolution" => vec![
            ("tDiffuse", UniformValue::Texture(None)),
            (
                "uImageIncrement",
                UniformValue::Vector2(Vec2::new(0.001953125, 0.0)),
            ),
            ("cKernel", UniformValue::FloatArray(Vec::new())),
        ],
        _ => Vec::new(),
    }
}

const KIND_SPECS: &[KindSpec] = &[
    KindSpec {
        kind: "basic",
        lib_uniforms: &["common", "specularmap", "envmap", "aomap", "lightmap", "fog"],
        defines: &[],
        vertex: "meshbasic_vert",
        fragment: "meshbasic_frag",
    },
    KindSpec {
        kind: "lambert",
        lib_uniforms: &[
            "common",
            "specularmap",
            "envmap",
            "aomap",
            "lightmap",
            "emissivemap",
            "fog",
            "lights",
        ],
        defines: &[],
        vertex: "meshlambert_vert",
        fragment: "meshlambert_frag",
    },
    KindSpec {
        kind: "phong",
        lib_uniforms: &[
            "common",
            "specularmap",
            "envmap",
            "aomap",
            "lightmap",
            "emissivemap",
            "bumpmap",
            "normalmap",
            "displacementmap",
            "gradientmap",
            "fog",
            "lights",
        ],
        defines: &[],
        vertex: "meshphong_vert",
        fragment: "meshphong_frag",
    },
    KindSpec {
        kind: "standard",
        lib_uniforms: &[
            "common",
            "envmap",
            "aomap",
            "lightmap",
            "emissivemap",
            "bumpmap",
            "normalmap",
            "displacementmap",
            "roughnessmap",
            "metalnessmap",
            "fog",
            "lights",
        ],
        defines: &[],
        vertex: "meshphysical_vert",
        fragment: "meshphysical_frag",
    },
    KindSpec {
        kind: "matcap",
        lib_uniforms: &["common", "bumpmap", "normalmap", "displacementmap", "fog"],
        defines: &[],
        vertex: "meshmatcap_vert",
        fragment: "meshmatcap_frag",
    },
    KindSpec {
        kind: "points",
        lib_uniforms: &["points", "fog"],
        defines: &[],
        vertex: "points_vert",
        fragment: "points_frag",
    },
    KindSpec {
        kind: "dashed",
        lib_uniforms: &["common", "fog"],
        defines: &[],
        vertex: "linedashed_vert",
        fragment: "linedashed_frag",
    },
    KindSpec {
        kind: "depth",
        lib_uniforms: &["common", "displacementmap"],
        defines: &[],
        vertex: "depth_vert",
        fragment: "depth_frag",
    },
    KindSpec {
        kind: "normal",
        lib_uniforms: &["common", "bumpmap", "normalmap", "displacementmap"],
        defines: &[],
        vertex: "normal_vert",
        fragment: "normal_frag",
    },
    KindSpec {
        kind: "sprite",
        lib_uniforms: &["sprite", "fog"],
        defines: &[],
        vertex: "sprite_vert",
        fragment: "sprite_frag",
    },
    KindSpec {
        kind: "background",
        lib_uniforms: &[],
        defines: &[],
        vertex: "background_vert",
        fragment: "background_frag",
    },
    KindSpec {
        kind: "cube",
        lib_uniforms: &[],
        defines: &[],
        vertex: "cube_vert",
        fragment: "cube_frag",
    },
    KindSpec {
        kind: "equirect",
        lib_uniforms: &[],
        defines: &[],
        vertex: "equirect_vert",
        fragment: "equirect_frag",
    },
    KindSpec {
        kind: "distanceRGBA",
        lib_uniforms: &["common", "displacementmap"],
        defines: &[],
        vertex: "distanceRGBA_vert",
        fragment: "distanceRGBA_frag",
    },
    KindSpec {
        kind: "shadow",
        lib_uniforms: &["lights", "fog"],
        defines: &[],
        vertex: "shadow_vert",
        fragment: "shadow_frag",
    },
    KindSpec {
        kind: "physical",
        lib_uniforms: &[
            "common",
            "envmap",
            "aomap",
            "lightmap",
            "emissivemap",
            "bumpmap",
            "normalmap",
            "displacementmap",
            "roughnessmap",
            "metalnessmap",
            "fog",
            "lights",
        ],
        defines: &[],
        vertex: "meshphysical_vert",
        fragment: "meshphysical_frag",
    },
    KindSpec {
        kind: "copy",
        lib_uniforms: &[],
        defines: &[],
        vertex: "copy_vert",
        fragment: "copy_frag",
    },
    KindSpec {
        kind: "convolution",
        lib_uniforms: &[],
        defines: CONVOLUTION_DEFINES,
        vertex: "convolution_vert",
        fragment: "convolution_frag",
    },
];

impl ShaderLibrary {
    /// Build every built-in kind from `resources`. Building is the one-time
    /// initialization point; a second `new` call simply produces an equal
    /// registry. Fails only when a required template is missing, which means
    /// the resource bundle is corrupt.
    pub fn new(resources: &dyn ShaderResources) -> Result<Self> {
        let mut shaders =
            FxHashMap::with_capacity_and_hasher(KIND_SPECS.len(), Default::default());
        for spec in KIND_SPECS {
            let mut shader = Shader::from_definitions(
                resources,
                spec.lib_uniforms,
                kind_uniform_defs(spec.kind),
                spec.defines,
                spec.vertex,
                spec.fragment,
            )?;
            shader.set_name(spec.kind);
            shaders.insert(spec.kind, shader);
        }
        Ok(Self { shaders })
    }

    /// Borrow the default descriptor for `kind`. Callers that need an
    /// independent copy must clone it. Unknown kinds warn and return `None`.
    pub fn get(&self, kind: &str) -> Option<&Shader> {
        let shader = self.shaders.get(kind);
        if shader.is_none() {
            log::warn!("can't find shader library entry: {kind}");
        }
        shader
    }

    /// `get` + clone: an independent descriptor whose defines and uniforms
    /// can be mutated freely while sharing the library's source text.
    pub fn clone_shader(&self, kind: &str) -> Option<Shader> {
        self.get(kind).cloned()
    }

    /// Kind names present in the registry.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.shaders.keys().copied()
    }
}
