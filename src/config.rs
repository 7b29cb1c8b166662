//! Build-time parameters. Loading these from YAML, and choosing/constructing
//! a concrete storage adapter from `storage_engine`/`storage_config`, is a
//! collaborator-layer concern; this crate only reads `k`, `m`, `h`.

/// Parameters fixed for the life of an index. `storage_engine` and
/// `storage_config` are opaque to the core — passed straight through to
/// whatever adapter factory the collaborator layer builds.
#[derive(Clone, Debug)]
pub struct Config {
    /// K-mer length.
    pub k: usize,
    /// Bloom filter width (number of matrix rows).
    pub m: u64,
    /// Number of hash functions per k-mer.
    pub h: u32,
    pub storage_engine: String,
    pub storage_config: String,
    pub max_build_mem_bytes: Option<u64>,
    pub nproc: Option<usize>,
}

impl Config {
    pub fn new(k: usize, m: u64, h: u32) -> Self {
        Config {
            k,
            m,
            h,
            storage_engine: String::new(),
            storage_config: String::new(),
            max_build_mem_bytes: None,
            nproc: None,
        }
    }
}
