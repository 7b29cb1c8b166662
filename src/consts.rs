//! Internal tuning knobs. Not part of the external file or KV format.

/// Rows grouped per slice I/O in the bit-matrix reader/writer. Must be a
/// multiple of 8 so a slice never splits a byte across I/Os.
pub const ROWS_PER_SLICE: u64 = 80;

/// Row batch size submitted to the KV store per `set_bitarrays` call during
/// [`crate::large_build::large_build`].
pub const DB_INSERT_BATCH_SIZE: usize = 1000;

const _: () = assert!(ROWS_PER_SLICE % 8 == 0);
