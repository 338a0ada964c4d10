// src/uniform_lib.rs
//! Shared uniform-library fragments.
//!
//! Each built-in shader kind merges a handful of these named fragments before
//! layering its own uniforms on top. Fragment contents mirror the renderer's
//! material model; defaults here are the values a material gets when it never
//! touches the uniform.

use glam::{Mat3, Vec2, Vec3};

use crate::uniforms::{UniformValue, Uniforms};

fn common() -> Uniforms {
    Uniforms::from_entries([
        ("diffuse", UniformValue::Vector3(Vec3::ONE)),
        ("opacity", UniformValue::Float(1.0)),
        ("map", UniformValue::Texture(None)),
        ("uvTransform", UniformValue::Matrix3(Mat3::IDENTITY)),
    ])
}

fn specularmap() -> Uniforms {
    Uniforms::from_entries([("specularMap", UniformValue::Texture(None))])
}

fn envmap() -> Uniforms {
    Uniforms::from_entries([
        ("envMap", UniformValue::Texture(None)),
        ("flipEnvMap", UniformValue::Float(-1.0)),
        ("reflectivity", UniformValue::Float(1.0)),
        ("refractionRatio", UniformValue::Float(0.98)),
        ("maxMipLevel", UniformValue::Int(0)),
    ])
}

fn aomap() -> Uniforms {
    Uniforms::from_entries([
        ("aoMap", UniformValue::Texture(None)),
        ("aoMapIntensity", UniformValue::Float(1.0)),
    ])
}

fn lightmap() -> Uniforms {
    Uniforms::from_entries([
        ("lightMap", UniformValue::Texture(None)),
        ("lightMapIntensity", UniformValue::Float(1.0)),
    ])
}

fn emissivemap() -> Uniforms {
    Uniforms::from_entries([("emissiveMap", UniformValue::Texture(None))])
}

fn bumpmap() -> Uniforms {
    Uniforms::from_entries([
        ("bumpMap", UniformValue::Texture(None)),
        ("bumpScale", UniformValue::Float(1.0)),
    ])
}

fn normalmap() -> Uniforms {
    Uniforms::from_entries([
        ("normalMap", UniformValue::Texture(None)),
        ("normalScale", UniformValue::Vector2(Vec2::ONE)),
    ])
}

fn displacementmap() -> Uniforms {
    Uniforms::from_entries([
        ("displacementMap", UniformValue::Texture(None)),
        ("displacementScale", UniformValue::Float(1.0)),
        ("displacementBias", UniformValue::Float(0.0)),
    ])
}

fn gradientmap() -> Uniforms {
    Uniforms::from_entries([("gradientMap", UniformValue::Texture(None))])
}

fn roughnessmap() -> Uniforms {
    Uniforms::from_entries([("roughnessMap", UniformValue::Texture(None))])
}

fn metalnessmap() -> Uniforms {
    Uniforms::from_entries([("metalnessMap", UniformValue::Texture(None))])
}

fn fog() -> Uniforms {
    Uniforms::from_entries([
        ("fogDensity", UniformValue::Float(0.00025)),
        ("fogNear", UniformValue::Float(1.0)),
        ("fogFar", UniformValue::Float(2000.0)),
        ("fogColor", UniformValue::Vector3(Vec3::ONE)),
    ])
}

/// Light arrays start empty; the renderer grows them to the scene's light
/// counts before resolving locations.
fn lights() -> Uniforms {
    Uniforms::from_entries([
        ("ambientLightColor", UniformValue::Vector3(Vec3::ZERO)),
        ("directionalLights", UniformValue::UniformsArray(Vec::new())),
        ("pointLights", UniformValue::UniformsArray(Vec::new())),
        ("spotLights", UniformValue::UniformsArray(Vec::new())),
    ])
}

fn points() -> Uniforms {
    Uniforms::from_entries([
        ("diffuse", UniformValue::Vector3(Vec3::ONE)),
        ("opacity", UniformValue::Float(1.0)),
        ("size", UniformValue::Float(1.0)),
        ("scale", UniformValue::Float(1.0)),
        ("map", UniformValue::Texture(None)),
        ("uvTransform", UniformValue::Matrix3(Mat3::IDENTITY)),
    ])
}

fn sprite() -> Uniforms {
    Uniforms::from_entries([
        ("diffuse", UniformValue::Vector3(Vec3::ONE)),
        ("opacity", UniformValue::Float(1.0)),
        ("center", UniformValue::Vector2(Vec2::splat(0.5))),
        ("rotation", UniformValue::Float(0.0)),
        ("map", UniformValue::Texture(None)),
        ("uvTransform", UniformValue::Matrix3(Mat3::IDENTITY)),
    ])
}

/// Fetch a named fragment. Unknown names warn and yield `None`.
pub fn uniforms_from_library(name: &str) -> Option<Uniforms> {
    let set = match name {
        "common" => common(),
        "specularmap" => specularmap(),
        "envmap" => envmap(),
        "aomap" => aomap(),
        "lightmap" => lightmap(),
        "emissivemap" => emissivemap(),
        "bumpmap" => bumpmap(),
        "normalmap" => normalmap(),
        "displacementmap" => displacementmap(),
        "gradientmap" => gradientmap(),
        "roughnessmap" => roughnessmap(),
        "metalnessmap" => metalnessmap(),
        "fog" => fog(),
        "lights" => lights(),
        "points" => points(),
        "sprite" => sprite(),
        _ => {
            log::warn!("unknown uniform library fragment: {name}");
            return None;
        }
    };
    Some(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fragments_resolve() {
        for name in [
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
            "roughnessmap",
            "metalnessmap",
            "fog",
            "lights",
            "points",
            "sprite",
        ] {
            assert!(uniforms_from_library(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn unknown_fragment_is_none() {
        assert!(uniforms_from_library("holograms").is_none());
    }

    #[test]
    fn common_defaults() {
        let set = uniforms_from_library("common").unwrap();
        match set.get("opacity").unwrap().value() {
            UniformValue::Float(v) => assert_eq!(*v, 1.0),
            other => panic!("unexpected value {other:?}"),
        }
        assert!(set.get("uvTransform").is_some());
    }
}
