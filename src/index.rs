//! The BIGSI index proper: build-from-blooms, single-sample insert, merge,
//! and the k-mer presence query engine.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, instrument};

use crate::bitrow::BitRow;
use crate::bloom::BloomFilter;
use crate::config::Config;
use crate::consts::DB_INSERT_BATCH_SIZE;
use crate::error::{Error, Result};
use crate::hasher::generate_hashes;
use crate::metadata::SampleMetadata;
use crate::storage::Storage;

/// One matched sample from [`BigsiIndex::search`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub sample_name: String,
    pub percent_kmers_found: f64,
    pub num_kmers: usize,
    /// Contiguous-presence refinement score, present only when requested.
    pub score: Option<f64>,
}

/// A BIGSI index bound to a storage handle. `m` and `h` are fixed for the
/// life of the index.
pub struct BigsiIndex<S: Storage> {
    storage: S,
    m: u64,
    h: u32,
}

impl<S: Storage> BigsiIndex<S> {
    /// Re-open an index whose metadata keys are already populated.
    pub fn open(storage: S) -> Result<Self> {
        let m = storage
            .get_integer("bloomfilter_size")?
            .ok_or_else(|| Error::StorageError("missing bloomfilter_size".into()))? as u64;
        let h = storage
            .get_integer("num_hashes")?
            .ok_or_else(|| Error::StorageError("missing num_hashes".into()))? as u32;
        Ok(BigsiIndex { storage, m, h })
    }

    pub fn m(&self) -> u64 {
        self.m
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn num_samples(&self) -> Result<u64> {
        SampleMetadata::num_samples(&self.storage)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Build-from-blooms path (§4.10): one column per filter, written in
    /// row-batches of [`DB_INSERT_BATCH_SIZE`]. A special case of
    /// `LargeBuild` where every input matrix has exactly one column.
    #[instrument(skip(blooms, sample_names, storage))]
    pub fn build_from_blooms(
        config: &Config,
        blooms: &[BloomFilter],
        sample_names: &[String],
        mut storage: S,
    ) -> Result<Self> {
        assert_eq!(blooms.len(), sample_names.len());
        for bloom in blooms {
            assert_eq!(bloom.m(), config.m, "bloom width must match config.m");
            assert_eq!(bloom.h(), config.h, "bloom hash count must match config.h");
        }
        let n = blooms.len() as u64;

        let mut key_batch = Vec::with_capacity(DB_INSERT_BATCH_SIZE);
        let mut row_batch = Vec::with_capacity(DB_INSERT_BATCH_SIZE);
        for r in 0..config.m {
            let mut row = BitRow::zeros(n);
            for (col, bloom) in blooms.iter().enumerate() {
                if bloom.bitarray().get(r) {
                    row.set(col as u64, true);
                }
            }
            key_batch.push(r);
            row_batch.push(row);
            if key_batch.len() == DB_INSERT_BATCH_SIZE {
                storage.set_bitarrays(&key_batch, &row_batch)?;
                storage.sync()?;
                key_batch.clear();
                row_batch.clear();
            }
        }
        if !key_batch.is_empty() {
            storage.set_bitarrays(&key_batch, &row_batch)?;
            storage.sync()?;
        }

        SampleMetadata::add_samples(&mut storage, sample_names)?;
        storage.set_integer("bloomfilter_size", config.m as i64)?;
        storage.set_integer("num_hashes", config.h as i64)?;
        storage.set_integer("number_of_rows", config.m as i64)?;
        storage.set_integer("number_of_cols", n as i64)?;
        storage.set_integer("ksi:bloomfilter_size", config.m as i64)?;
        storage.set_integer("ksi:num_hashes", config.h as i64)?;
        storage.sync()?;

        debug!(samples = n, m = config.m, "built index from blooms");
        Ok(BigsiIndex {
            storage,
            m: config.m,
            h: config.h,
        })
    }

    /// Append one sample's column. `O(m)` reads and writes — intended for
    /// small additions, not bulk builds.
    #[instrument(skip(self, bloom))]
    pub fn insert_sample(&mut self, name: &str, bloom: &BloomFilter) -> Result<()> {
        assert_eq!(bloom.m(), self.m, "bloom width must match index m");
        if SampleMetadata::get_colour(&self.storage, name)?.is_some() {
            return Err(Error::DuplicateSample {
                name: name.to_string(),
            });
        }
        let old_cols = SampleMetadata::num_samples(&self.storage)?;

        for r in 0..self.m {
            let existing = self
                .storage
                .get_bitarray(r)?
                .unwrap_or_else(|| BitRow::zeros(old_cols));
            let mut grown = BitRow::zeros(old_cols + 1);
            for c in 0..old_cols {
                if existing.get(c) {
                    grown.set(c, true);
                }
            }
            if bloom.bitarray().get(r) {
                grown.set(old_cols, true);
            }
            self.storage.set_bitarrays(&[r], &[grown])?;
        }
        self.storage.sync()?;

        SampleMetadata::add_samples(&mut self.storage, &[name.to_string()])?;
        self.storage.set_integer("number_of_cols", (old_cols + 1) as i64)?;
        self.storage.sync()?;
        debug!(sample = name, "inserted sample");
        Ok(())
    }

    /// Union another index's columns onto this one. Both indices must share
    /// `(m, h)`; colliding sample names are rejected and nothing is written.
    #[instrument(skip(self, other))]
    pub fn merge<OS: Storage>(&mut self, other: &BigsiIndex<OS>) -> Result<()> {
        if self.m != other.m || self.h != other.h {
            return Err(Error::DimensionMismatch {
                left: (self.m, self.h as u64),
                right: (other.m, other.h as u64),
            });
        }
        let other_names = SampleMetadata::list(&other.storage)?;
        for name in &other_names {
            if SampleMetadata::get_colour(&self.storage, name)?.is_some() {
                return Err(Error::DuplicateSample { name: name.clone() });
            }
        }

        let self_cols = SampleMetadata::num_samples(&self.storage)?;
        let other_cols = other_names.len() as u64;
        for r in 0..self.m {
            let left = self
                .storage
                .get_bitarray(r)?
                .unwrap_or_else(|| BitRow::zeros(self_cols));
            let right = other
                .storage
                .get_bitarray(r)?
                .unwrap_or_else(|| BitRow::zeros(other_cols));
            let merged = BitRow::concat(&[left, right]);
            self.storage.set_bitarrays(&[r], &[merged])?;
        }
        self.storage.sync()?;

        SampleMetadata::add_samples(&mut self.storage, &other_names)?;
        self.storage
            .set_integer("number_of_cols", (self_cols + other_cols) as i64)?;
        self.storage.sync()?;
        debug!(merged_samples = other_cols, "merged index");
        Ok(())
    }

    /// Query engine (§4.10). Empty result, not an error, for `query.len() <
    /// k`. `contiguous_score` additionally computes a longest-consecutive-
    /// presence refinement in [`SearchHit::score`].
    #[instrument(skip(self, query))]
    pub fn search(
        &self,
        query: &[u8],
        k: usize,
        threshold: f64,
        contiguous_score: bool,
    ) -> Result<Vec<SearchHit>> {
        if query.len() < k {
            return Ok(Vec::new());
        }
        let kmers: Vec<&[u8]> = (0..=query.len() - k).map(|i| &query[i..i + k]).collect();
        let num_kmers = kmers.len();

        let mut all_keys: BTreeSet<u64> = BTreeSet::new();
        let per_kmer_positions: Vec<BTreeSet<u64>> = kmers
            .iter()
            .map(|kmer| {
                let positions = generate_hashes(kmer, self.h, self.m);
                all_keys.extend(positions.iter().copied());
                positions
            })
            .collect();

        let keys: Vec<u64> = all_keys.into_iter().collect();
        let fetched = self.storage.get_bitarrays(&keys)?;
        let num_cols = SampleMetadata::num_samples(&self.storage)?;
        let mut rows: HashMap<u64, BitRow> = HashMap::with_capacity(keys.len());
        for (key, row) in keys.into_iter().zip(fetched) {
            rows.insert(key, row.unwrap_or_else(|| BitRow::zeros(num_cols)));
        }

        // Only columns that are set in at least one k-mer's presence row are
        // candidates at all — a sample with zero hits never reaches the
        // threshold comparison, matching "threshold=0 matches every sample
        // that hits at least one k-mer" rather than every sample period.
        let mut counts = vec![0u32; num_cols as usize];
        let mut candidate_cols: BTreeSet<u64> = BTreeSet::new();
        let mut presence_rows: Vec<BitRow> = Vec::with_capacity(num_kmers);
        for positions in &per_kmer_positions {
            let mut presence: Option<BitRow> = None;
            for pos in positions {
                let row = &rows[pos];
                presence = Some(match presence {
                    None => row.clone(),
                    Some(acc) => acc.and(row),
                });
            }
            let presence = presence.unwrap_or_else(|| BitRow::zeros(num_cols));
            for c in 0..num_cols {
                if presence.get(c) {
                    counts[c as usize] += 1;
                    candidate_cols.insert(c);
                }
            }
            presence_rows.push(presence);
        }

        let names = SampleMetadata::list(&self.storage)?;
        let mut hits = Vec::new();
        for col in candidate_cols {
            let frac = counts[col as usize] as f64 / num_kmers as f64;
            if frac >= threshold {
                let score = contiguous_score.then(|| longest_contiguous_presence(&presence_rows, col));
                hits.push(SearchHit {
                    sample_name: names[col as usize].clone(),
                    percent_kmers_found: frac,
                    num_kmers,
                    score,
                });
            }
        }
        hits.sort_by(|a, b| {
            b.percent_kmers_found
                .partial_cmp(&a.percent_kmers_found)
                .unwrap()
                .then_with(|| a.sample_name.cmp(&b.sample_name))
        });
        debug!(hits = hits.len(), num_kmers, "search complete");
        Ok(hits)
    }
}

/// Fraction of k-mers, along the longest run of consecutive present
/// k-mers, for `col`.
fn longest_contiguous_presence(presence_rows: &[BitRow], col: u64) -> f64 {
    let mut best = 0usize;
    let mut current = 0usize;
    for row in presence_rows {
        if row.get(col) {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best as f64 / presence_rows.len() as f64
}
