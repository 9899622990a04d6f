//! Compress asset files and embed them in a C++ program as a path-to-bytes map.
//!
//! Given a JSON manifest of glob patterns, this crate finds the matching files,
//! gzips each one and writes C++ source that exposes them as a
//! `std::map<std::string, std::span<const std::byte>>`, keyed by the file's
//! path relative to a root directory.
//!
//! ## How It Works
//!
//! 1.  **Resolve:** [`Manifest::resolve`] expands every pattern against the root,
//!     keeps regular files only, removes duplicates and sorts the result, so the
//!     output never depends on pattern order or directory enumeration order.
//! 2.  **Pack:** [`pack_entries`] compresses the files on a bounded worker pool and
//!     renders one `std::array` declaration plus one map initializer per file,
//!     named by [`encode_path`]. Results keep the resolver's order.
//! 3.  **Assemble:** [`render_header`] and [`render_source`] produce the two
//!     generated files. The header only declares the map `extern`; the source
//!     defines the arrays and the map.
//!
//! The data is stored compressed. Consumers must gunzip it before use.
//!
//! ## Usage
//!
//! From a build step, run the `cpp-pack` tool twice (once per output type), or
//! call [`generate`] directly:
//!
//! ```no_run
//! use cpp_packed::{OutputType, Request};
//!
//! let request = Request::new("assets.json", "assets.cpp", OutputType::Source)
//!     .namespace("game::res")?
//!     .varname("assets")?
//!     .root("assets");
//! cpp_packed::generate(&request)?;
//! # Ok::<(), cpp_packed::Error>(())
//! ```
//!
//! With the `build` feature, a `Config` builder writes both files from a
//! `build.rs` script and emits the matching `cargo:rerun-if-changed` lines.

use std::{
    fs,
    num::NonZeroUsize,
    path::PathBuf,
};

mod assemble;
mod compress;
mod encode;
mod error;
mod manifest;
mod pack;

pub use assemble::{
    Namespace, OutputType, array_declaration, check_varname, map_entry, render_header,
    render_source,
};
pub use compress::{DEFAULT_COMPRESSION_LEVEL, compress, compress_file, compress_path, level};
pub use encode::{encode_path, is_identifier};
pub use error::{Error, Result, Stage};
pub use manifest::{FileEntry, Manifest, resolve_manifest};
pub use pack::{PackOptions, PackedFragment, pack_entries, pack_entry};

/// Everything needed to produce one generated file.
#[derive(Debug, Clone)]
pub struct Request {
    manifest: PathBuf,
    output: PathBuf,
    output_type: OutputType,
    namespace: Namespace,
    varname: String,
    root: PathBuf,
    options: PackOptions,
}

impl Request {
    /// Creates a request with the default namespace `assets`, variable
    /// `assets`, the current directory as root and gzip level 9.
    pub fn new(
        manifest: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        output_type: OutputType,
    ) -> Self {
        Self {
            manifest: manifest.into(),
            output: output.into(),
            output_type,
            namespace: Namespace {
                segments: vec!["assets".to_owned()],
            },
            varname: "assets".to_owned(),
            root: PathBuf::from("."),
            options: PackOptions::default(),
        }
    }

    /// Sets the `::`-separated namespace.
    ///
    /// # Errors
    /// Returns [`Error::InvalidNamespace`] for a malformed namespace.
    pub fn namespace(mut self, namespace: &str) -> Result<Self> {
        self.namespace = Namespace::parse(namespace)?;
        Ok(self)
    }

    /// Sets the name of the generated map variable.
    ///
    /// # Errors
    /// Returns [`Error::InvalidIdentifier`] if `varname` is not an identifier.
    pub fn varname(mut self, varname: &str) -> Result<Self> {
        check_varname(varname)?;
        self.varname = varname.to_owned();
        Ok(self)
    }

    /// Sets the directory patterns and map keys are relative to.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the gzip level (0-9).
    ///
    /// # Errors
    /// Returns [`Error::InvalidLevel`] above 9.
    pub fn level(mut self, level: u32) -> Result<Self> {
        self.options.level = compress::level(level)?;
        Ok(self)
    }

    /// Caps the number of packing threads.
    #[must_use]
    pub const fn jobs(mut self, jobs: Option<NonZeroUsize>) -> Self {
        self.options.jobs = jobs;
        self
    }
}

/// Runs the pipeline for `request` and writes the output file once.
///
/// In header mode the manifest is not read. In source mode nothing is written
/// unless every file was packed successfully.
///
/// # Errors
/// Returns the first error from any stage; see [`Error`].
pub fn generate(request: &Request) -> Result<Vec<FileEntry>> {
    let (text, entries) = match request.output_type {
        OutputType::Header => (render_header(&request.namespace, &request.varname), Vec::new()),
        OutputType::Source => {
            let entries = resolve_manifest(&request.root, &request.manifest)?;
            let fragments = pack_entries(&entries, &request.options)?;
            let text = render_source(&request.namespace, &request.varname, &entries, &fragments)?;
            (text, entries)
        }
    };

    fs::write(&request.output, &text)
        .map_err(|e| Error::file_access(Stage::OutputWrite, &request.output, e))?;
    tracing::info!(
        output = %request.output.display(),
        kind = ?request.output_type,
        bytes = text.len(),
        "wrote generated file"
    );
    Ok(entries)
}

//
// ===== BUILD-SCRIPT HELPERS =====
//

#[cfg(feature = "build")]
mod build;
#[cfg(feature = "build")]
pub use build::Config;
