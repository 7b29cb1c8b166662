//! Per-sample Bloom filter: a length-`m` bit vector tested via `h` hash
//! functions from [`crate::hasher`].

use crate::bitrow::BitRow;
use crate::hasher::generate_hashes;

/// A single sample's Bloom filter.
///
/// Bits are packed MSB-first, one bit per row position, in the same layout
/// [`crate::matrix`] uses for a single-column (c=1) bit matrix — so a
/// filter's [`BloomFilter::bitarray`] can be read back directly by a
/// [`crate::matrix::BitMatrixReader`] with `cols = 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    h: u32,
    bits: BitRow,
}

impl BloomFilter {
    /// Zero-initialized filter of length `m` with `h` hash functions.
    pub fn new(m: u64, h: u32) -> Self {
        BloomFilter {
            h,
            bits: BitRow::zeros(m),
        }
    }

    pub fn m(&self) -> u64 {
        self.bits.len()
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    /// Insert every k-mer of `kmers` into the filter. Idempotent: inserting
    /// the same multiset again leaves the filter bit-identical.
    pub fn update<I, K>(&mut self, kmers: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        for kmer in kmers {
            self.insert(kmer.as_ref());
        }
    }

    /// Insert a single k-mer.
    pub fn insert(&mut self, kmer: &[u8]) {
        for pos in generate_hashes(kmer, self.h, self.bits.len()) {
            self.bits.set(pos, true);
        }
    }

    /// True iff all `h` positions for `kmer` are set (possibly a false
    /// positive; never a false negative).
    pub fn contains(&self, kmer: &[u8]) -> bool {
        generate_hashes(kmer, self.h, self.bits.len())
            .into_iter()
            .all(|pos| self.bits.get(pos))
    }

    /// The underlying bit vector, for serialization as a matrix column.
    pub fn bitarray(&self) -> &BitRow {
        &self.bits
    }
}
