//! Manifest loading and expansion into a deterministic file list.
use std::{
    borrow::Cow,
    cmp::Ordering,
    collections::BTreeSet,
    fs,
    path::{Component, Path, PathBuf},
};

use glob::MatchOptions;
use serde_json::Value;

use crate::error::{Error, Result, Stage};

/// `*` never crosses a separator. Leading dots are checked afterwards by
/// [`dots_allowed`], since `glob` would otherwise reject `.*` outright.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// An ordered list of glob patterns read from a JSON manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    path: PathBuf,
    patterns: Vec<String>,
}

/// A discovered file: its absolute path and its path relative to the root.
///
/// The relative path is stored with `/` separators regardless of host OS and
/// is used verbatim as the generated map key.
///
/// Entries order by the raw bytes of the absolute path, then by the key, so
/// `a.b` sorts before `a/b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    pub absolute: PathBuf,
    pub relative: String,
}

impl Ord for FileEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute
            .as_os_str()
            .as_encoded_bytes()
            .cmp(other.absolute.as_os_str().as_encoded_bytes())
            .then_with(|| self.relative.cmp(&other.relative))
    }
}

impl PartialOrd for FileEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Manifest {
    /// Reads and validates the manifest at `path`.
    ///
    /// # Errors
    /// Returns [`Error::FileAccess`] if the file cannot be read,
    /// [`Error::ManifestSyntax`] for malformed JSON, and
    /// [`Error::InvalidManifest`] if the document is not an array of strings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| Error::file_access(Stage::ManifestRead, path, e))?;
        Self::parse(path, &text)
    }

    /// Parses manifest text; `path` is only used in error messages.
    ///
    /// # Errors
    /// See [`Manifest::load`].
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(source) => return Err(Error::ManifestSyntax { path, source }),
        };
        let Value::Array(items) = value else {
            return Err(Error::InvalidManifest {
                path,
                reason: "expected a list".into(),
            });
        };

        let mut patterns = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::String(pattern) => patterns.push(pattern),
                other => {
                    return Err(Error::InvalidManifest {
                        path,
                        reason: format!("element {index} is not a string: {other}"),
                    });
                }
            }
        }
        Ok(Self { path, patterns })
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Expands every pattern against `root` and returns the matched regular
    /// files, deduplicated and sorted.
    ///
    /// Patterns that match nothing are not an error. Directories, dangling
    /// links and entries that cannot be inspected are skipped.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] for a malformed pattern and
    /// [`Error::Encoding`] for paths that are not valid UTF-8.
    pub fn resolve(&self, root: impl AsRef<Path>) -> Result<Vec<FileEntry>> {
        let root = absolute_root(root.as_ref())?;
        let root_str = root.to_str().ok_or_else(|| Error::Encoding(root.clone()))?;
        let glob_root = PathBuf::from(glob::Pattern::escape(root_str));

        let mut found = BTreeSet::new();
        for pattern in &self.patterns {
            let full = glob_root.join(pattern);
            let full = full.to_str().ok_or_else(|| Error::Encoding(full.clone()))?;
            let pattern_parts = parts(Path::new(pattern));
            let paths = glob::glob_with(full, MATCH_OPTIONS).map_err(|source| {
                Error::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;

            let before = found.len();
            for entry in paths {
                let path = match entry {
                    Ok(path) => path,
                    Err(err) => {
                        tracing::warn!(pattern = %pattern, error = %err, "skipping unreadable entry");
                        continue;
                    }
                };
                if !fs::metadata(&path).is_ok_and(|m| m.is_file()) {
                    continue;
                }
                let allowed = if Path::new(pattern).is_absolute() {
                    dots_allowed(&pattern_parts, &parts(&path))
                } else {
                    path.strip_prefix(&root)
                        .map_or(true, |rel| dots_allowed(&pattern_parts, &parts(rel)))
                };
                if !allowed {
                    continue;
                }
                let absolute = normalize(&path);
                let relative = map_key(&relative_to(&absolute, &root))?;
                found.insert(FileEntry { absolute, relative });
            }
            tracing::debug!(
                pattern = %pattern,
                new = found.len() - before,
                "expanded pattern"
            );
        }

        let entries: Vec<_> = found.into_iter().collect();
        tracing::info!(
            manifest = %self.path.display(),
            root = %root.display(),
            files = entries.len(),
            "resolved manifest"
        );
        Ok(entries)
    }
}

/// Loads the manifest at `manifest` and resolves it against `root`.
///
/// # Errors
/// See [`Manifest::load`] and [`Manifest::resolve`].
pub fn resolve_manifest(root: impl AsRef<Path>, manifest: impl AsRef<Path>) -> Result<Vec<FileEntry>> {
    Manifest::load(manifest)?.resolve(root)
}

/// The `Normal` and `..` components of `path`, as text.
fn parts(path: &Path) -> Vec<Cow<'_, str>> {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect()
}

/// Whether `path` can line up with `pattern` so that every dot-prefixed
/// component meets a pattern component that also starts with `.`.
///
/// `**` spans zero or more components, none of them hidden.
fn dots_allowed<P: AsRef<str>, S: AsRef<str>>(pattern: &[P], path: &[S]) -> bool {
    let hidden = |s: &S| s.as_ref().starts_with('.');
    match (pattern.split_first(), path.split_first()) {
        (None, None) => true,
        (Some((head, rest)), _) if head.as_ref() == "**" => {
            dots_allowed(rest, path)
                || path
                    .split_first()
                    .is_some_and(|(c, tail)| !hidden(c) && dots_allowed(pattern, tail))
        }
        (Some((p, prest)), Some((c, crest))) => {
            (!hidden(c) || p.as_ref().starts_with('.')) && dots_allowed(prest, crest)
        }
        _ => false,
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf> {
    let root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root
    };
    std::path::absolute(root)
        .map(|p| normalize(&p))
        .map_err(|e| Error::file_access(Stage::Discovery, root, e))
}

/// Lexically removes `.` components and folds `..` into its parent.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Computes `path` relative to `base`, both absolute and normalized.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    if let Ok(rel) = path.strip_prefix(base) {
        return rel.to_path_buf();
    }
    let path: Vec<_> = path.components().collect();
    let base: Vec<_> = base.components().collect();
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push(Component::ParentDir);
    }
    for component in &path[common..] {
        rel.push(component);
    }
    rel
}

/// Joins the components of a relative path with `/`.
fn map_key(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                parts.push(part.to_str().ok_or_else(|| Error::Encoding(relative.to_path_buf()))?);
            }
            Component::ParentDir => parts.push(".."),
            _ => {}
        }
    }
    Ok(parts.join("/"))
}
