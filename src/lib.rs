//! BIGSI core: a k-mer presence index over Bloom-filter bit matrices.
//!
//! Leaf to root: [`hasher`] and [`bloom`] build one sample's filter;
//! [`matrix`] packs/unpacks bit matrices and horizontally concatenates them
//! without materializing the result; [`merge_blooms`] and [`large_build`]
//! are the two offline producers that populate a [`storage::Storage`]
//! handle; [`metadata`] tracks sample name <-> colour; [`index`] is the
//! query-facing handle tying all of it together.

mod bitrow;
mod bloom;
mod config;
mod consts;
mod error;
mod hasher;
mod index;
mod large_build;
mod matrix;
mod merge_blooms;
mod metadata;
mod storage;

pub use bitrow::BitRow;
pub use bloom::BloomFilter;
pub use config::Config;
pub use error::{Error, Result};
pub use hasher::generate_hashes;
pub use index::{BigsiIndex, SearchHit};
pub use large_build::large_build;
pub use matrix::{BitMatrixGroupReader, BitMatrixReader, BitMatrixWriter, MatrixSink, MatrixSource};
pub use merge_blooms::merge_blooms;
pub use metadata::SampleMetadata;
pub use storage::{
    decode_row_key_fixed, decode_row_key_varint, encode_row_key_fixed, encode_row_key_varint,
    MemoryStorage, Storage,
};
