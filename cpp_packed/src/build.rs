//! Build-script helpers for `cpp_packed`.
use std::{
    env,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::{OutputType, Request, Result, generate};

//
// ==================== PUBLIC BUILDER API ====================
//

/// A builder for packing assets from a `build.rs` script.
///
/// Writes the header and source pair in one go and tells Cargo to rerun the
/// script when the manifest or any packed file changes.
///
/// # Example
/// ```no_run
/// // in build.rs
/// let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
/// cpp_packed::Config::new("assets.json")
///     .root("assets")
///     .namespace("game::res")
///     .varname("assets")
///     .level(6)
///     .build(out_dir.join("assets.hpp"), out_dir.join("assets.cpp"))
///     .expect("Failed to pack assets");
/// ```
#[derive(Debug)]
pub struct Config {
    manifest: PathBuf,
    root: Option<PathBuf>,
    namespace: String,
    varname: String,
    level: u32,
    jobs: Option<NonZeroUsize>,
}

impl Config {
    /// Creates a configuration for the manifest at `manifest`.
    ///
    /// Relative paths (manifest and root) are resolved against the consuming
    /// crate's root (`CARGO_MANIFEST_DIR`) when it is set.
    pub fn new(manifest: impl AsRef<Path>) -> Self {
        Self {
            manifest: manifest.as_ref().to_path_buf(),
            root: None,
            namespace: "assets".into(),
            varname: "assets".into(),
            level: crate::DEFAULT_COMPRESSION_LEVEL,
            jobs: None,
        }
    }

    /// Sets the directory patterns are matched against and keys are relative
    /// to. Defaults to the crate root.
    #[must_use]
    pub fn root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Sets the `::`-separated C++ namespace (default `assets`).
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the name of the generated map variable (default `assets`).
    #[must_use]
    pub fn varname(mut self, varname: impl Into<String>) -> Self {
        self.varname = varname.into();
        self
    }

    /// Sets the gzip level (0-9). Defaults to `9`.
    #[must_use]
    pub const fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Caps the number of packing threads.
    #[must_use]
    pub const fn jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Writes the header to `header` and the source to `source`.
    ///
    /// # Errors
    /// Returns an [`Error`](crate::Error) if the configuration is invalid or
    /// any stage of packing fails. Neither file is touched on invalid input.
    pub fn build(self, header: impl AsRef<Path>, source: impl AsRef<Path>) -> Result<()> {
        let base = env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from);
        let anchor = |p: &Path| match &base {
            Some(base) => base.join(p),
            None => p.to_path_buf(),
        };
        let manifest = anchor(&self.manifest);
        let root = anchor(self.root.as_deref().unwrap_or_else(|| Path::new("")));

        let request = |output: &Path, kind| -> Result<Request> {
            Ok(Request::new(&manifest, output, kind)
                .namespace(&self.namespace)?
                .varname(&self.varname)?
                .level(self.level)?
                .jobs(self.jobs)
                .root(&root))
        };
        let header = request(header.as_ref(), OutputType::Header)?;
        let source = request(source.as_ref(), OutputType::Source)?;

        println!("cargo:rerun-if-changed={}", manifest.display());
        let packed = generate(&source)?;
        for entry in &packed {
            println!("cargo:rerun-if-changed={}", entry.absolute.display());
        }
        generate(&header)?;
        Ok(())
    }
}
