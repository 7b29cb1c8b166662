//! Abstract key-value capability contract the core requires of any backend
//! (embedded disk, remote KV, or the in-memory store used by this crate's
//! own tests). No ordering guarantee is required across concurrent calls;
//! the core never issues concurrent writes against one handle.

mod memory;
mod rowkey;

pub use memory::MemoryStorage;
pub use rowkey::{
    decode_row_key_fixed, decode_row_key_varint, encode_row_key_fixed, encode_row_key_varint,
};

use crate::bitrow::BitRow;
use crate::error::Result;

pub trait Storage {
    /// Batch put. `keys` and `rows` have equal length.
    fn set_bitarrays(&mut self, keys: &[u64], rows: &[BitRow]) -> Result<()>;

    fn get_bitarray(&self, key: u64) -> Result<Option<BitRow>>;

    /// Returns rows in the same order as `keys`.
    fn get_bitarrays(&self, keys: &[u64]) -> Result<Vec<Option<BitRow>>> {
        keys.iter().map(|&k| self.get_bitarray(k)).collect()
    }

    fn set_integer(&mut self, key: &str, v: i64) -> Result<()>;
    fn get_integer(&self, key: &str) -> Result<Option<i64>>;

    fn set_string(&mut self, key: &str, v: &str) -> Result<()>;
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Durable-enough flush.
    fn sync(&mut self) -> Result<()>;

    fn delete_all(&mut self) -> Result<()>;
}
