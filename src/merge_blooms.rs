//! Offline producer: materialize the horizontal concatenation of several bit
//! matrices into a single matrix file. Purely a bit-layout transformation —
//! no metadata is written here.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::matrix::{BitMatrixGroupReader, BitMatrixWriter, MatrixSink, MatrixSource};

/// Concatenate `inputs` (ordered `(source, cols)` pairs, `r` rows each) into
/// `sink`, producing an `r x sum(cols)` matrix. Returns the sink, flushed.
#[instrument(skip(inputs, sink))]
pub fn merge_blooms<R, W>(inputs: Vec<(R, u64)>, rows: u64, sink: W) -> Result<W>
where
    R: MatrixSource,
    W: MatrixSink,
{
    let total_cols: u64 = inputs.iter().map(|(_, c)| *c).sum();
    let mut group = BitMatrixGroupReader::new(inputs, rows)?;
    let mut writer = BitMatrixWriter::new(sink, rows, total_cols)?;

    let mut written = 0u64;
    while let Some(row) = group.next_row()? {
        writer.write(&row)?;
        written += 1;
    }
    let sink = writer.finish_into_sink()?;
    debug!(rows = written, cols = total_cols, "merged bloom matrices");
    Ok(sink)
}
