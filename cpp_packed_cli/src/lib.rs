//! Shared plumbing for the `cpp-pack` and `gzip-file` binaries.

pub mod logging;
