//! Streams a horizontally merged matrix into a row-keyed KV store, in
//! bounded-memory batches, and writes the index metadata keys.

use tracing::{debug, instrument};

use crate::config::Config;
use crate::consts::DB_INSERT_BATCH_SIZE;
use crate::error::Result;
use crate::matrix::{BitMatrixGroupReader, MatrixSource};
use crate::metadata::SampleMetadata;
use crate::storage::Storage;

/// Populate `storage` from `inputs` (ordered `(source, cols)` pairs) under
/// row keys `[0, config.m)`, then register `sample_names` (length must equal
/// `sum(cols)`) and write the reserved metadata keys.
///
/// Any I/O or storage error aborts the build; `storage` is left in an
/// indeterminate but recoverable state — callers may `delete_all` and
/// retry. No partial-commit guarantee is made.
#[instrument(skip(inputs, sample_names, storage))]
pub fn large_build<R, S>(
    config: &Config,
    inputs: Vec<(R, u64)>,
    sample_names: &[String],
    storage: &mut S,
) -> Result<()>
where
    R: MatrixSource,
    S: Storage,
{
    let mut group = BitMatrixGroupReader::new(inputs, config.m)?;
    let num_cols = group.cols();

    let mut key_batch = Vec::with_capacity(DB_INSERT_BATCH_SIZE);
    let mut row_batch = Vec::with_capacity(DB_INSERT_BATCH_SIZE);
    let mut batches_flushed = 0u64;

    for row_index in 0..config.m {
        let row = group
            .next_row()?
            .expect("group reader must yield config.m rows");
        key_batch.push(row_index);
        row_batch.push(row);

        if key_batch.len() == DB_INSERT_BATCH_SIZE {
            flush_batch(storage, &mut key_batch, &mut row_batch)?;
            batches_flushed += 1;
        }
    }
    if !key_batch.is_empty() {
        flush_batch(storage, &mut key_batch, &mut row_batch)?;
        batches_flushed += 1;
    }

    SampleMetadata::add_samples(storage, sample_names)?;

    storage.set_integer("bloomfilter_size", config.m as i64)?;
    storage.set_integer("num_hashes", config.h as i64)?;
    storage.set_integer("number_of_rows", config.m as i64)?;
    storage.set_integer("number_of_cols", num_cols as i64)?;
    storage.set_integer("ksi:bloomfilter_size", config.m as i64)?;
    storage.set_integer("ksi:num_hashes", config.h as i64)?;
    storage.sync()?;

    debug!(rows = config.m, cols = num_cols, batches = batches_flushed, "large build complete");
    Ok(())
}

fn flush_batch<S: Storage>(
    storage: &mut S,
    keys: &mut Vec<u64>,
    rows: &mut Vec<crate::bitrow::BitRow>,
) -> Result<()> {
    storage.set_bitarrays(keys, rows)?;
    storage.sync()?;
    keys.clear();
    rows.clear();
    Ok(())
}
