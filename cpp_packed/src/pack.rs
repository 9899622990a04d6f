//! Parallel compression of resolved files into source fragments.
use std::{num::NonZeroUsize, thread};

use flate2::Compression;
use rayon::prelude::*;

use crate::{
    assemble,
    compress::{self, DEFAULT_COMPRESSION_LEVEL},
    encode::encode_path,
    error::Result,
    manifest::FileEntry,
};

/// Settings for [`pack_entries`].
#[derive(Debug, Clone, Copy)]
pub struct PackOptions {
    pub level: Compression,
    /// Upper bound on worker threads; defaults to the available parallelism.
    pub jobs: Option<NonZeroUsize>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            level: Compression::new(DEFAULT_COMPRESSION_LEVEL),
            jobs: None,
        }
    }
}

/// The generated source pieces for one packed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFragment {
    pub identifier: String,
    /// The `std::array` declaration holding the compressed bytes.
    pub declaration: String,
    /// The `{"key", span}` initializer for the map definition.
    pub map_entry: String,
    pub compressed_len: usize,
}

/// Compresses every entry and renders its fragment.
///
/// Fragments are returned in the same order as `entries`, whatever order the
/// workers finish in. Any single failure fails the whole batch.
///
/// # Errors
/// Returns the first read or compression error, or [`crate::Error::ThreadPool`]
/// if the worker pool cannot be created.
pub fn pack_entries(entries: &[FileEntry], options: &PackOptions) -> Result<Vec<PackedFragment>> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let workers = worker_count(entries.len(), options.jobs);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("cpp-pack-{i}"))
        .build()?;
    tracing::debug!(files = entries.len(), workers, "packing");

    let level = options.level;
    let fragments = pool.install(|| {
        entries
            .par_iter()
            .map(|entry| pack_entry(entry, level))
            .collect::<Result<Vec<_>>>()
    })?;

    tracing::info!(
        files = fragments.len(),
        bytes = fragments.iter().map(|f| f.compressed_len).sum::<usize>(),
        "packed assets"
    );
    Ok(fragments)
}

/// Builds the fragment for a single entry.
///
/// # Errors
/// Returns [`crate::Error::FileAccess`] if the file cannot be read or compressed.
pub fn pack_entry(entry: &FileEntry, level: Compression) -> Result<PackedFragment> {
    let compressed = compress::compress_path(&entry.absolute, level)?;
    let identifier = encode_path(&entry.relative);
    tracing::debug!(
        path = %entry.relative,
        identifier = %identifier,
        bytes = compressed.len(),
        "packed file"
    );

    Ok(PackedFragment {
        declaration: assemble::array_declaration(&identifier, &compressed),
        map_entry: assemble::map_entry(&entry.relative, &identifier),
        compressed_len: compressed.len(),
        identifier,
    })
}

fn worker_count(files: usize, jobs: Option<NonZeroUsize>) -> usize {
    let limit = jobs
        .or_else(|| thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);
    limit.min(files).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::fs;

    fn entries_in(dir: &std::path::Path, files: &[(&str, &[u8])]) -> Vec<FileEntry> {
        files
            .iter()
            .map(|(name, data)| {
                let absolute = dir.join(name);
                fs::write(&absolute, data).unwrap();
                FileEntry {
                    absolute,
                    relative: (*name).to_owned(),
                }
            })
            .collect()
    }

    #[test]
    fn empty_input_skips_the_pool() {
        let options = PackOptions {
            jobs: NonZeroUsize::new(4),
            ..PackOptions::default()
        };
        assert!(pack_entries(&[], &options).unwrap().is_empty());
    }

    #[test]
    fn order_follows_input() {
        let dir = tempfile::tempdir().unwrap();
        // Large first file so later ones tend to finish first.
        let big = vec![7u8; 4 << 20];
        let names: Vec<String> = (0..16).map(|i| format!("f{i:02}")).collect();
        let files: Vec<(&str, &[u8])> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), if i == 0 { &big[..] } else { b"x" as &[u8] }))
            .collect();
        let entries = entries_in(dir.path(), &files);

        let fragments = pack_entries(&entries, &PackOptions::default()).unwrap();
        let idents: Vec<_> = fragments.iter().map(|f| f.identifier.clone()).collect();
        let expected: Vec<_> = names.iter().map(|n| encode_path(n)).collect();
        assert_eq!(idents, expected);
    }

    #[test]
    fn fragment_matches_sequential_output() {
        let dir = tempfile::tempdir().unwrap();
        let entries = entries_in(dir.path(), &[("a.txt", b"hi"), ("b.txt", b"there")]);
        let parallel = pack_entries(&entries, &PackOptions::default()).unwrap();
        let sequential: Vec<_> = entries
            .iter()
            .map(|e| pack_entry(e, PackOptions::default().level).unwrap())
            .collect();
        assert_eq!(parallel, sequential);

        let expected_len = compress::compress(b"hi", PackOptions::default().level)
            .unwrap()
            .len();
        assert_eq!(parallel[0].compressed_len, expected_len);
        assert!(parallel[0]
            .declaration
            .contains(&format!("std::array<uint8_t, {expected_len}> dMEXHI6DU")));
    }

    #[test]
    fn one_missing_file_fails_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut entries = entries_in(dir.path(), &[("a.txt", b"a"), ("b.txt", b"b")]);
        entries.push(FileEntry {
            absolute: dir.path().join("gone.txt"),
            relative: "gone.txt".into(),
        });
        let err = pack_entries(&entries, &PackOptions::default()).unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }

    #[test]
    fn workers_bounded_by_files_and_jobs() {
        assert_eq!(worker_count(1, NonZeroUsize::new(8)), 1);
        assert_eq!(worker_count(10, NonZeroUsize::new(3)), 3);
        assert!(worker_count(2, None) <= 2);
        assert!(worker_count(2, None) >= 1);
    }
}
