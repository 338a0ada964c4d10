// src/shader.rs
//! Shader descriptors.
//!
//! A [`Shader`] bundles everything needed to compile one program variant: an
//! ordered preprocessor define list, a uniform set, and the fully expanded
//! vertex/fragment source text. The content hash is the renderer's program
//! cache key — descriptors that compare equal always hash equal.
//!
//! Source text is held in `Arc<str>`: cloning a descriptor deep-copies the
//! mutable parts (defines, uniforms) and shares the immutable text, so a
//! clone of a clone still points at the one backing buffer.

use std::sync::Arc;

use smallvec::SmallVec;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{Error, Result};
use crate::preprocess::expand_includes;
use crate::resources::{lib_path, ShaderResources};
use crate::uniform_lib::uniforms_from_library;
use crate::uniforms::{Uniform, UniformValue, Uniforms};

/// Ordered define list, flattened as (key, value, key, value, ...). The
/// pairing means the length must always be even.
pub type DefineList = SmallVec<[String; 8]>;

const DEFAULT_VERTEX: &str =
    "void main() {\n\tgl_Position = projectionMatrix * modelViewMatrix * vec4( position, 1.0 );\n}";
const DEFAULT_FRAGMENT: &str = "void main() {\n\tgl_FragColor = vec4( 1.0, 0.0, 0.0, 1.0 );\n}";

/// A compilable program variant: defines + uniforms + expanded source text.
#[derive(Clone, Debug)]
pub struct Shader {
    name: Option<String>,
    defines: DefineList,
    uniforms: Uniforms,
    vertex_text: Arc<str>,
    fragment_text: Arc<str>,
    hash: u64,
}

fn defines_hash(defines: &[String]) -> u64 {
    defines
        .iter()
        .fold(0, |acc, d| acc ^ xxh3_64(d.as_bytes()))
}

fn content_hash(defines: &[String], vertex: &str, fragment: &str) -> u64 {
    defines_hash(defines) ^ xxh3_64(vertex.as_bytes()) ^ xxh3_64(fragment.as_bytes())
}

impl Shader {
    /// Build a descriptor from already-expanded source text. Passing `None`
    /// for either source falls back to a trivial built-in program.
    pub fn new(
        defines: DefineList,
        uniforms: Uniforms,
        vertex_text: Option<&str>,
        fragment_text: Option<&str>,
    ) -> Self {
        assert!(
            defines.len() % 2 == 0,
            "defines must be (key, value) pairs, got odd length {}",
            defines.len()
        );
        let vertex_text: Arc<str> = vertex_text.unwrap_or(DEFAULT_VERTEX).into();
        let fragment_text: Arc<str> = fragment_text.unwrap_or(DEFAULT_FRAGMENT).into();
        let hash = content_hash(&defines, &vertex_text, &fragment_text);
        Self {
            name: None,
            defines,
            uniforms,
            vertex_text,
            fragment_text,
            hash,
        }
    }

    /// The library construction path: merge named uniform fragments in listed
    /// order (last write wins), layer explicit definitions on top, then load
    /// and expand the named vertex/fragment templates from the `shader_lib`
    /// category. A missing template is a startup fault, not a warning.
    pub fn from_definitions(
        resources: &dyn ShaderResources,
        lib_uniforms: &[&str],
        uniform_defs: Vec<(&'static str, UniformValue)>,
        defines: &[&str],
        vertex_name: &str,
        fragment_name: &str,
    ) -> Result<Self> {
        let mut uniforms = Uniforms::new();
        for lib_name in lib_uniforms {
            if let Some(fragment) = uniforms_from_library(lib_name) {
                uniforms.merge(&fragment);
            }
        }
        for (name, value) in uniform_defs {
            uniforms.insert(Uniform::new(name, value));
        }

        let vertex_text = load_template(resources, vertex_name)?;
        let fragment_text = load_template(resources, fragment_name)?;

        let defines: DefineList = defines.iter().map(|d| d.to_string()).collect();
        Ok(Self::new(
            defines,
            uniforms,
            Some(&vertex_text),
            Some(&fragment_text),
        ))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Replace the define list and recompute the content hash.
    pub fn set_defines(&mut self, defines: DefineList) {
        assert!(
            defines.len() % 2 == 0,
            "defines must be (key, value) pairs, got odd length {}",
            defines.len()
        );
        self.defines = defines;
        self.hash = content_hash(&self.defines, &self.vertex_text, &self.fragment_text);
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    pub fn vertex_text(&self) -> &str {
        &self.vertex_text
    }

    pub fn fragment_text(&self) -> &str {
        &self.fragment_text
    }

    /// Stable content hash for program caching. Equal descriptors hash equal;
    /// the converse is not guaranteed.
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for Shader {
    /// Equal iff the define lists match element-wise and both source strings
    /// match exactly. Shared-buffer identity is a fast path only.
    fn eq(&self, other: &Self) -> bool {
        self.defines == other.defines
            && text_equal(&self.vertex_text, &other.vertex_text)
            && text_equal(&self.fragment_text, &other.fragment_text)
    }
}

fn text_equal(a: &Arc<str>, b: &Arc<str>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

fn load_template(resources: &dyn ShaderResources, name: &str) -> Result<String> {
    let path = lib_path(name);
    let text = resources
        .lookup(&path)
        .ok_or_else(|| Error::MissingResource(path))?;
    Ok(expand_includes(text, resources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn descriptor(defines: DefineList) -> Shader {
        Shader::new(
            defines,
            Uniforms::from_entries([("opacity", UniformValue::Float(1.0))]),
            Some("vertex body"),
            Some("fragment body"),
        )
    }

    #[test]
    fn equal_to_itself_and_to_its_clone() {
        let a = descriptor(smallvec!["USE_MAP".into(), "1".into()]);
        let b = a.clone();
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn clone_shares_text_but_not_defines() {
        let a = descriptor(smallvec!["USE_MAP".into(), "1".into()]);
        let mut b = a.clone();

        assert!(Arc::ptr_eq(&a.vertex_text, &b.vertex_text));
        assert!(Arc::ptr_eq(&a.fragment_text, &b.fragment_text));

        b.set_defines(smallvec!["USE_FOG".into(), "1".into()]);
        assert_eq!(a.defines(), ["USE_MAP", "1"]);
        assert_ne!(a, b);
        assert_ne!(a.hash(), b.hash());
        // Source text is still shared and equal.
        assert_eq!(a.vertex_text(), b.vertex_text());
    }

    #[test]
    fn defines_order_and_length_matter() {
        let a = descriptor(smallvec!["A".into(), "1".into(), "B".into(), "2".into()]);
        let b = descriptor(smallvec!["B".into(), "2".into(), "A".into(), "1".into()]);
        let c = descriptor(smallvec!["A".into(), "1".into()]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn differing_source_text_breaks_equality() {
        let a = descriptor(DefineList::new());
        let b = Shader::new(
            DefineList::new(),
            Uniforms::new(),
            Some("vertex body"),
            Some("other fragment"),
        );
        assert_ne!(a, b);
    }

    #[test]
    fn hash_changes_when_defines_are_replaced() {
        let mut a = descriptor(DefineList::new());
        let before = a.hash();
        a.set_defines(smallvec!["KERNEL_SIZE_INT".into(), "25".into()]);
        assert_ne!(before, a.hash());
        a.set_defines(DefineList::new());
        assert_eq!(before, a.hash());
    }

    #[test]
    fn default_source_is_substituted() {
        let shader = Shader::new(DefineList::new(), Uniforms::new(), None, None);
        assert!(shader.vertex_text().contains("gl_Position"));
        assert!(shader.fragment_text().contains("gl_FragColor"));
    }

    #[test]
    #[should_panic(expected = "defines must be (key, value) pairs")]
    fn odd_define_list_is_a_programming_error() {
        descriptor(smallvec!["USE_MAP".into()]);
    }
}
