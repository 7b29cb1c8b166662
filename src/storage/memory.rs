//! `BTreeMap`-backed [`super::Storage`]: a reference adapter, and the
//! backend this crate's own tests build indexes against.

use std::collections::BTreeMap;

use tracing::trace;

use crate::bitrow::BitRow;
use crate::error::Result;

use super::Storage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    rows: BTreeMap<u64, BitRow>,
    integers: BTreeMap<String, i64>,
    strings: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn set_bitarrays(&mut self, keys: &[u64], rows: &[BitRow]) -> Result<()> {
        assert_eq!(keys.len(), rows.len(), "keys and rows must be equal length");
        for (&key, row) in keys.iter().zip(rows) {
            self.rows.insert(key, row.clone());
        }
        Ok(())
    }

    fn get_bitarray(&self, key: u64) -> Result<Option<BitRow>> {
        Ok(self.rows.get(&key).cloned())
    }

    fn set_integer(&mut self, key: &str, v: i64) -> Result<()> {
        self.integers.insert(key.to_string(), v);
        Ok(())
    }

    fn get_integer(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.integers.get(key).copied())
    }

    fn set_string(&mut self, key: &str, v: &str) -> Result<()> {
        self.strings.insert(key.to_string(), v.to_string());
        Ok(())
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.strings.get(key).cloned())
    }

    fn sync(&mut self) -> Result<()> {
        trace!(rows = self.rows.len(), "memory storage sync (no-op)");
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        self.rows.clear();
        self.integers.clear();
        self.strings.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitarray_roundtrip() {
        let mut s = MemoryStorage::new();
        let row = BitRow::zeros(8);
        s.set_bitarrays(&[3], &[row.clone()]).unwrap();
        assert_eq!(s.get_bitarray(3).unwrap(), Some(row));
        assert_eq!(s.get_bitarray(4).unwrap(), None);
    }

    #[test]
    fn batch_preserves_key_order_independent_lookup() {
        let mut s = MemoryStorage::new();
        let mut a = BitRow::zeros(4);
        a.set(0, true);
        let mut b = BitRow::zeros(4);
        b.set(1, true);
        s.set_bitarrays(&[5, 2], &[a.clone(), b.clone()]).unwrap();
        assert_eq!(s.get_bitarrays(&[2, 5]).unwrap(), vec![Some(b), Some(a)]);
    }

    #[test]
    fn integer_and_string_roundtrip() {
        let mut s = MemoryStorage::new();
        s.set_integer("bloomfilter_size", 1000).unwrap();
        s.set_string("sample:name:s1", "0").unwrap();
        assert_eq!(s.get_integer("bloomfilter_size").unwrap(), Some(1000));
        assert_eq!(s.get_integer("missing").unwrap(), None);
        assert_eq!(s.get_string("sample:name:s1").unwrap(), Some("0".to_string()));
    }

    #[test]
    fn delete_all_clears_everything() {
        let mut s = MemoryStorage::new();
        s.set_bitarrays(&[0], &[BitRow::zeros(1)]).unwrap();
        s.set_integer("k", 1).unwrap();
        s.set_string("s", "v").unwrap();
        s.delete_all().unwrap();
        assert_eq!(s.get_bitarray(0).unwrap(), None);
        assert_eq!(s.get_integer("k").unwrap(), None);
        assert_eq!(s.get_string("s").unwrap(), None);
    }
}
