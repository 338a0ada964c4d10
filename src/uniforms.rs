// src/uniforms.rs
//! Typed uniform sets and program-location resolution.
//!
//! A [`Uniforms`] set is an insertion-ordered collection of named, typed
//! values. Materials clone the set from their shader descriptor and mutate
//! their copy; the renderer resolves each entry to a [`UniformLocation`] once
//! per linked program and pushes values by location per frame.
//!
//! Naming convention for resolution:
//! - flat array uniforms probe the program with `<name>[0]`
//! - each child of a nested uniforms-array resolves as `<name>[<i>].<child>`

use std::sync::Arc;

use fxhash::FxHashMap;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use parking_lot::Mutex;

use crate::gpu::{ProgramLocations, UniformLocation};
use crate::texture::Texture;

/// Shared handle to a texture referenced from a uniform value. Cloning a
/// uniform set shares the texture, matching renderer-side identity semantics.
pub type TextureRef = Arc<Mutex<Texture>>;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Tagged union of every uniform type the shader library declares.
#[derive(Clone, Debug)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector4(Vec4),
    Matrix3(Mat3),
    Matrix4(Mat4),
    /// Texture slot; `None` until a material assigns one.
    Texture(Option<TextureRef>),
    /// Flat float array (e.g. a convolution kernel).
    FloatArray(Vec<f32>),
    /// Array of structs, one child uniform set per element (e.g. lights).
    UniformsArray(Vec<Uniforms>),
}

impl UniformValue {
    /// Flat arrays resolve through the `<name>[0]` probe.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, UniformValue::FloatArray(_))
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One named uniform. The location stays `None` until resolution runs against
/// a linked program; it also stays `None` when the program simply does not
/// use the uniform, which is not an error.
#[derive(Clone, Debug)]
pub struct Uniform {
    name: String,
    value: UniformValue,
    location: Option<UniformLocation>,
    needs_update: bool,
}

impl Uniform {
    pub fn new(name: impl Into<String>, value: UniformValue) -> Self {
        Self {
            name: name.into(),
            value,
            location: None,
            needs_update: true,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &UniformValue {
        &self.value
    }

    /// Replace the value and mark the entry for re-upload.
    pub fn set_value(&mut self, value: UniformValue) {
        self.value = value;
        self.needs_update = true;
    }

    #[inline]
    pub fn location(&self) -> Option<UniformLocation> {
        self.location
    }

    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Called by the renderer after pushing the value to the program.
    pub fn mark_clean(&mut self) {
        self.needs_update = false;
    }
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

/// Insertion-ordered uniform set with O(1) lookup by name.
#[derive(Clone, Debug, Default)]
pub struct Uniforms {
    entries: Vec<Uniform>,
    lookup: FxHashMap<String, usize>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from (name, value) pairs, preserving order.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, UniformValue)>,
    {
        let mut set = Self::new();
        for (name, value) in entries {
            set.insert(Uniform::new(name, value));
        }
        set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite by name. Overwriting keeps the entry's position in
    /// iteration order; only the value is replaced (last write wins).
    pub fn insert(&mut self, uniform: Uniform) {
        match self.lookup.get(uniform.name()) {
            Some(&idx) => {
                let slot = &mut self.entries[idx];
                slot.value = uniform.value;
                slot.needs_update = true;
            }
            None => {
                self.lookup.insert(uniform.name.clone(), self.entries.len());
                self.entries.push(uniform);
            }
        }
    }

    /// Merge `other` into `self`, entry by entry in `other`'s order.
    /// Colliding names take `other`'s value (last write wins).
    pub fn merge(&mut self, other: &Uniforms) {
        for entry in &other.entries {
            self.insert(entry.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Uniform> {
        self.lookup.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Uniform> {
        self.lookup.get(name).map(|&idx| &mut self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uniform> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Uniform> {
        self.entries.iter_mut()
    }

    /// Resolve every entry's location against `program`.
    ///
    /// Idempotent; call again after relinking to re-resolve. Entries the
    /// program does not declare are left unresolved. Nested uniforms-arrays
    /// resolve their children as `<name>[<i>].<child>`, elements in array
    /// order and children in set order; flat arrays probe `<name>[0]`.
    pub fn resolve_locations(&mut self, program: &dyn ProgramLocations) {
        for entry in &mut self.entries {
            match &mut entry.value {
                UniformValue::UniformsArray(elements) => {
                    for (i, child_set) in elements.iter_mut().enumerate() {
                        for child in &mut child_set.entries {
                            let full_name = format!("{}[{}].{}", entry.name, i, child.name);
                            child.location = program.uniform_location(&full_name);
                        }
                    }
                }
                value => {
                    entry.location = if value.is_array() {
                        program.uniform_location(&format!("{}[0]", entry.name))
                    } else {
                        program.uniform_location(&entry.name)
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Program stub that knows a fixed set of names and records every probe.
    struct FakeProgram {
        known: Vec<(&'static str, i32)>,
        probed: RefCell<Vec<String>>,
    }

    impl FakeProgram {
        fn new(known: Vec<(&'static str, i32)>) -> Self {
            Self {
                known,
                probed: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProgramLocations for FakeProgram {
        fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
            self.probed.borrow_mut().push(name.to_string());
            self.known
                .iter()
                .find(|(n, _)| *n == name)
                .map(|&(_, loc)| UniformLocation(loc))
        }
    }

    fn light_element() -> Uniforms {
        Uniforms::from_entries([
            ("color", UniformValue::Vector3(Vec3::ONE)),
            ("position", UniformValue::Vector3(Vec3::ZERO)),
        ])
    }

    #[test]
    fn merge_is_last_write_wins_and_keeps_order() {
        let mut base = Uniforms::from_entries([
            ("diffuse", UniformValue::Vector3(Vec3::ONE)),
            ("opacity", UniformValue::Float(1.0)),
        ]);
        let overlay = Uniforms::from_entries([
            ("opacity", UniformValue::Float(0.5)),
            ("shininess", UniformValue::Float(30.0)),
        ]);
        base.merge(&overlay);

        let names: Vec<_> = base.iter().map(|u| u.name().to_string()).collect();
        assert_eq!(names, ["diffuse", "opacity", "shininess"]);
        match base.get("opacity").unwrap().value() {
            UniformValue::Float(v) => assert_eq!(*v, 0.5),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn nested_array_resolves_indexed_struct_names() {
        let mut set = Uniforms::from_entries([(
            "spotLights",
            UniformValue::UniformsArray(vec![light_element(), light_element()]),
        )]);
        let program = FakeProgram::new(vec![
            ("spotLights[0].color", 3),
            ("spotLights[1].color", 7),
        ]);

        set.resolve_locations(&program);

        let probed = program.probed.borrow();
        assert!(probed.contains(&"spotLights[0].color".to_string()));
        assert!(probed.contains(&"spotLights[1].color".to_string()));
        assert!(probed.contains(&"spotLights[0].position".to_string()));

        let entry = set.get("spotLights").unwrap();
        let UniformValue::UniformsArray(elements) = entry.value() else {
            panic!("expected a uniforms array");
        };
        assert_eq!(
            elements[0].get("color").unwrap().location(),
            Some(UniformLocation(3))
        );
        assert_eq!(
            elements[1].get("color").unwrap().location(),
            Some(UniformLocation(7))
        );
        // Not declared by the program: stays unresolved, no error.
        assert_eq!(elements[0].get("position").unwrap().location(), None);
    }

    #[test]
    fn flat_array_probes_index_zero() {
        let mut set = Uniforms::from_entries([(
            "cKernel",
            UniformValue::FloatArray(vec![0.25, 0.5, 0.25]),
        )]);
        let program = FakeProgram::new(vec![("cKernel[0]", 11)]);

        set.resolve_locations(&program);

        assert_eq!(
            set.get("cKernel").unwrap().location(),
            Some(UniformLocation(11))
        );
    }

    #[test]
    fn resolution_is_idempotent_and_rerunnable() {
        let mut set = Uniforms::from_entries([("opacity", UniformValue::Float(1.0))]);
        let first = FakeProgram::new(vec![("opacity", 1)]);
        set.resolve_locations(&first);
        assert_eq!(set.get("opacity").unwrap().location(), Some(UniformLocation(1)));

        // Relinked program moved the uniform.
        let second = FakeProgram::new(vec![("opacity", 4)]);
        set.resolve_locations(&second);
        assert_eq!(set.get("opacity").unwrap().location(), Some(UniformLocation(4)));
    }

    #[test]
    fn clone_copies_entries_deeply() {
        let mut original = Uniforms::from_entries([("opacity", UniformValue::Float(1.0))]);
        let mut copy = original.clone();
        copy.get_mut("opacity")
            .unwrap()
            .set_value(UniformValue::Float(0.25));

        match original.get("opacity").unwrap().value() {
            UniformValue::Float(v) => assert_eq!(*v, 1.0),
            other => panic!("unexpected value {other:?}"),
        }
        original
            .get_mut("opacity")
            .unwrap()
            .set_value(UniformValue::Float(0.75));
        match copy.get("opacity").unwrap().value() {
            UniformValue::Float(v) => assert_eq!(*v, 0.25),
            other => panic!("unexpected value {other:?}"),
        }
    }
}
