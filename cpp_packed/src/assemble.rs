//! Rendering of the generated C++ header and source files.
use std::{collections::HashSet, fmt::Write, str::FromStr};

use crate::{
    encode::is_identifier,
    error::{Error, Result},
    manifest::FileEntry,
    pack::PackedFragment,
};

const MAP_TYPE: &str = "std::map<std::string, std::span<const std::byte>>";

const HEADER_PREAMBLE: &[&str] = &[
    "// Auto-generated file.",
    "#pragma once",
    "#include <map>",
    "#include <string>",
    "#include <span>",
    "#include <cstddef>",
];

const SOURCE_PREAMBLE: &[&str] = &[
    "// Auto-generated file, do not modify",
    "#include <array>",
    "#include <map>",
    "#include <string>",
    "#include <span>",
    "#include <cstdint>",
    "#include <cstddef>",
];

/// Which of the two files to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Declaration only: an `extern` map, no data.
    Header,
    /// The byte arrays and the map definition.
    Source,
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "header" => Ok(Self::Header),
            "source" => Ok(Self::Source),
            other => Err(Error::InvalidOutputType(other.to_owned())),
        }
    }
}

/// A nested C++ namespace such as `a::b`, kept as its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub(crate) segments: Vec<String>,
}

impl Namespace {
    /// Splits a `::`-separated scope path into segments.
    ///
    /// # Errors
    /// Returns [`Error::InvalidNamespace`] if any segment is empty or not an
    /// identifier.
    pub fn parse(s: &str) -> Result<Self> {
        let segments: Vec<String> = s.split("::").map(str::to_owned).collect();
        if segments.iter().any(|seg| !is_identifier(seg)) {
            return Err(Error::InvalidNamespace(s.to_owned()));
        }
        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn opening(&self) -> String {
        self.segments
            .iter()
            .map(|seg| format!("namespace {seg} {{"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn closing(&self) -> String {
        "}".repeat(self.segments.len())
    }
}

impl FromStr for Namespace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Checks that `name` can be used as the generated variable name.
///
/// # Errors
/// Returns [`Error::InvalidIdentifier`] otherwise.
pub fn check_varname(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.to_owned()))
    }
}

/// Renders the header: the `extern` declaration of the map.
#[must_use]
pub fn render_header(namespace: &Namespace, varname: &str) -> String {
    let mut lines: Vec<String> = HEADER_PREAMBLE.iter().map(|&l| l.to_owned()).collect();
    lines.push(namespace.opening());
    lines.push(format!("    extern const {MAP_TYPE} {varname};"));
    lines.push(namespace.closing());
    lines.push(String::new());
    lines.join("\n")
}

/// Renders the source: one array per fragment, then the map definition.
///
/// `entries` and `fragments` must be index-aligned, as produced by
/// [`crate::pack::pack_entries`].
///
/// # Errors
/// Returns [`Error::FragmentMismatch`] if the slices differ in length and
/// [`Error::DuplicateAssetPath`] if two entries share a relative path.
pub fn render_source(
    namespace: &Namespace,
    varname: &str,
    entries: &[FileEntry],
    fragments: &[PackedFragment],
) -> Result<String> {
    if entries.len() != fragments.len() {
        return Err(Error::FragmentMismatch {
            entries: entries.len(),
            fragments: fragments.len(),
        });
    }

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.relative.as_str()) {
            return Err(Error::DuplicateAssetPath(entry.relative.clone()));
        }
    }

    let data_len: usize = fragments.iter().map(|f| f.declaration.len() + 1).sum();
    let mut out = String::with_capacity(data_len + 1024);
    for line in SOURCE_PREAMBLE {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&namespace.opening());
    out.push('\n');
    for fragment in fragments {
        out.push_str(&fragment.declaration);
        out.push('\n');
    }

    let map_entries: Vec<&str> = fragments.iter().map(|f| f.map_entry.as_str()).collect();
    if map_entries.is_empty() {
        let _ = writeln!(out, "    extern const {MAP_TYPE} {varname} = {{}};");
    } else {
        let _ = writeln!(
            out,
            "    extern const {MAP_TYPE} {varname} = {{ {} }};",
            map_entries.join(", ")
        );
    }
    out.push_str(&namespace.closing());
    out.push('\n');
    Ok(out)
}

/// Renders the fixed-size array holding one file's compressed bytes.
#[must_use]
pub fn array_declaration(identifier: &str, data: &[u8]) -> String {
    let mut line = String::with_capacity(data.len() * 5 + 64);
    let _ = write!(
        line,
        "    static const std::array<uint8_t, {}> {identifier} = {{ ",
        data.len()
    );
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let _ = write!(line, "0x{byte:02x}");
    }
    line.push_str(" };");
    line
}

/// Renders one map initializer, keyed by the `/`-separated relative path.
#[must_use]
pub fn map_entry(relative: &str, identifier: &str) -> String {
    format!(
        "{{{}, std::as_bytes(std::span({identifier}))}}",
        string_literal(relative)
    )
}

/// Quotes `s` as a C++ string literal.
fn string_literal(s: &str) -> String {
    let mut lit = String::with_capacity(s.len() + 2);
    lit.push('"');
    for c in s.chars() {
        match c {
            '"' => lit.push_str("\\\""),
            '\\' => lit.push_str("\\\\"),
            c if c.is_ascii_control() => {
                let _ = write!(lit, "\\{:03o}", c as u32);
            }
            c => lit.push(c),
        }
    }
    lit.push('"');
    lit
}
