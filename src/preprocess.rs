// src/preprocess.rs
//! `#include <name>` expansion for shader templates.
//!
//! Each line whose left-trimmed content starts with `#include` is replaced by
//! a one-line attribution comment plus the named chunk's full text from the
//! `shader_chunks` category, followed by a trailing newline. Expansion is
//! single-pass: chunk text is not scanned for further includes. Malformed
//! directives and missing chunks are warnings; the offending line contributes
//! no output and expansion continues.

use crate::resources::{chunk_path, ShaderResources};

const INCLUDE_MARKER: &str = "#include";

/// Expand all include directives in `text`. Every surviving line is emitted
/// with a terminating newline, whether or not the input's final line had one.
pub fn expand_includes(text: &str, resources: &dyn ShaderResources) -> String {
    let mut out = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(directive) = trimmed.strip_prefix(INCLUDE_MARKER) {
            append_include(directive, resources, &mut out);
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

/// Handles the text after the `#include` marker. The chunk name sits between
/// `<` and `>`; anything else on the line is ignored.
fn append_include(directive: &str, resources: &dyn ShaderResources, out: &mut String) {
    let Some(start) = directive.find('<') else {
        log::warn!("no initial '<' in include directive");
        return;
    };
    let rest = &directive[start + 1..];
    let Some(end) = rest.find('>') else {
        log::warn!("no final '>' in include directive");
        return;
    };
    let name = &rest[..end];

    let path = chunk_path(name);
    let Some(chunk) = resources.lookup(&path) else {
        log::warn!("shader chunk {name} not found");
        return;
    };

    out.push_str("// Include: ");
    out.push_str(name);
    out.push('\n');
    out.push_str(chunk);
    out.push('\n');
}
