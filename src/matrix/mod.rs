//! Packed row-major bit-matrix codec, streamed in fixed-row "slices".
//!
//! No header: a matrix file is exactly `ceil(r*c/8)` bytes, MSB-first, rows
//! packed contiguously (row `r`'s column `c` sits at global bit index
//! `r*c + c`). `ROWS_PER_SLICE` rows are buffered per I/O; it is a multiple
//! of 8 precisely so that every full-slice boundary lands on a byte boundary
//! regardless of `c` (only the file's final byte may carry zero padding).

mod group_reader;
mod sink_source;

pub use group_reader::BitMatrixGroupReader;
pub use sink_source::{MatrixSink, MatrixSource};

use crate::bitrow::BitRow;
use crate::consts::ROWS_PER_SLICE;
use crate::error::{Error, Result};

fn is_valid_size(rows: u64, cols: u64, byte_len: u64) -> bool {
    let bits = rows * cols;
    if byte_len == 0 {
        return bits == 0;
    }
    (byte_len - 1) * 8 < bits && bits <= byte_len * 8
}

fn ceil_div(n: u64, d: u64) -> u64 {
    (n + d - 1) / d
}

/// Scoped, append-only writer for an r-row x c-col packed bit matrix.
///
/// The sink must be empty at construction. `write` fails once `r` rows have
/// been written ([`Error::MatrixOverflow`]). A buffered (partial) slice is
/// flushed on normal [`BitMatrixWriter::finish`] or on drop; an abnormal
/// exit (panic unwind) may lose the last, not-yet-flushed partial slice —
/// the file stays consistent up to the last completed slice boundary.
pub struct BitMatrixWriter<W: MatrixSink> {
    sink: Option<W>,
    rows: u64,
    cols: u64,
    rows_written: u64,
    slice_buf: Vec<u8>,
    slice_target_rows: u64,
    slice_rows_buffered: u64,
    slice_bit_pos: u64,
}

impl<W: MatrixSink> BitMatrixWriter<W> {
    pub fn new(mut sink: W, rows: u64, cols: u64) -> Result<Self> {
        let byte_len = sink.byte_len()?;
        if byte_len != 0 {
            return Err(Error::OutputNotEmpty { byte_len });
        }
        Ok(BitMatrixWriter {
            sink: Some(sink),
            rows,
            cols,
            rows_written: 0,
            slice_buf: Vec::new(),
            slice_target_rows: 0,
            slice_rows_buffered: 0,
            slice_bit_pos: 0,
        })
    }

    /// Append one row of exactly `cols` bits.
    pub fn write(&mut self, row: &BitRow) -> Result<()> {
        if self.rows_written >= self.rows {
            return Err(Error::MatrixOverflow { max_rows: self.rows });
        }
        assert_eq!(row.len(), self.cols, "row width must equal declared cols");

        if self.slice_buf.is_empty() {
            self.slice_target_rows = std::cmp::min(ROWS_PER_SLICE, self.rows - self.rows_written);
            let bits = self.slice_target_rows * self.cols;
            self.slice_buf = vec![0u8; ceil_div(bits, 8) as usize];
            self.slice_bit_pos = 0;
            self.slice_rows_buffered = 0;
        }

        write_bits(&mut self.slice_buf, self.slice_bit_pos, row);
        self.slice_bit_pos += self.cols;
        self.slice_rows_buffered += 1;
        self.rows_written += 1;

        if self.slice_rows_buffered == self.slice_target_rows {
            self.flush_slice()?;
        }
        Ok(())
    }

    fn flush_slice(&mut self) -> Result<()> {
        if !self.slice_buf.is_empty() {
            if let Some(sink) = self.sink.as_mut() {
                sink.write_all(&self.slice_buf)?;
            }
            self.slice_buf.clear();
            self.slice_rows_buffered = 0;
            self.slice_bit_pos = 0;
        }
        Ok(())
    }

    /// Flush any buffered partial slice and the sink itself.
    pub fn finish(mut self) -> Result<()> {
        self.flush_slice()?;
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        self.sink = None;
        Ok(())
    }

    /// Like [`Self::finish`], but hands the sink back instead of dropping
    /// it — used by tests and by in-memory callers that want the written
    /// bytes.
    pub(crate) fn finish_into_sink(mut self) -> Result<W> {
        self.flush_slice()?;
        let mut sink = self.sink.take().expect("writer already finished");
        sink.flush()?;
        Ok(sink)
    }
}

impl<W: MatrixSink> Drop for BitMatrixWriter<W> {
    fn drop(&mut self) {
        if self.sink.is_some() {
            let _ = self.flush_slice();
            if let Some(sink) = self.sink.as_mut() {
                let _ = sink.flush();
            }
        }
    }
}

/// Scoped, lazy, non-restartable reader over an r-row x c-col packed bit
/// matrix. Validated against the file's byte size at construction.
pub struct BitMatrixReader<R: MatrixSource> {
    source: R,
    rows: u64,
    cols: u64,
    rows_read: u64,
    slice_buf: Vec<u8>,
    slice_rows_total: u64,
    slice_rows_consumed: u64,
    slice_bit_pos: u64,
}

impl<R: MatrixSource> BitMatrixReader<R> {
    pub fn new(mut source: R, rows: u64, cols: u64) -> Result<Self> {
        let byte_len = source.byte_len()?;
        if !is_valid_size(rows, cols, byte_len) {
            return Err(Error::MalformedMatrixFile {
                rows,
                cols,
                byte_len,
            });
        }
        Ok(BitMatrixReader {
            source,
            rows,
            cols,
            rows_read: 0,
            slice_buf: Vec::new(),
            slice_rows_total: 0,
            slice_rows_consumed: 0,
            slice_bit_pos: 0,
        })
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn cols(&self) -> u64 {
        self.cols
    }

    /// Advance and return the next row, or `None` once all `r` rows have
    /// been produced (end-of-sequence; a second call also returns `None`).
    pub fn next_row(&mut self) -> Result<Option<BitRow>> {
        if self.rows_read >= self.rows {
            return Ok(None);
        }
        if self.slice_rows_consumed == self.slice_rows_total {
            let rows_in_slice = std::cmp::min(ROWS_PER_SLICE, self.rows - self.rows_read);
            let bits = rows_in_slice * self.cols;
            let mut buf = vec![0u8; ceil_div(bits, 8) as usize];
            self.source.read_exact(&mut buf)?;
            self.slice_buf = buf;
            self.slice_rows_total = rows_in_slice;
            self.slice_rows_consumed = 0;
            self.slice_bit_pos = 0;
        }

        let row = read_bits(&self.slice_buf, self.slice_bit_pos, self.cols);
        self.slice_bit_pos += self.cols;
        self.slice_rows_consumed += 1;
        self.rows_read += 1;
        Ok(Some(row))
    }
}

impl<R: MatrixSource> Iterator for BitMatrixReader<R> {
    type Item = Result<BitRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

fn write_bits(buf: &mut [u8], bit_pos: u64, row: &BitRow) {
    for i in 0..row.len() {
        if row.get(i) {
            let global = bit_pos + i;
            let byte = (global / 8) as usize;
            let shift = 7 - (global % 8);
            buf[byte] |= 1 << shift;
        }
    }
}

fn read_bits(buf: &[u8], bit_pos: u64, cols: u64) -> BitRow {
    let mut row = BitRow::zeros(cols);
    for i in 0..cols {
        let global = bit_pos + i;
        let byte = (global / 8) as usize;
        let shift = 7 - (global % 8);
        if buf[byte] & (1 << shift) != 0 {
            row.set(i, true);
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::io::Cursor;

    fn random_row(cols: u64, rng: &mut impl Rng) -> BitRow {
        let mut row = BitRow::zeros(cols);
        for i in 0..cols {
            if rng.gen_bool(0.5) {
                row.set(i, true);
            }
        }
        row
    }

    #[test]
    fn writer_rejects_nonempty_sink() {
        let sink = Cursor::new(vec![0u8; 1]);
        let err = BitMatrixWriter::new(sink, 4, 3).unwrap_err();
        assert!(matches!(err, Error::OutputNotEmpty { byte_len: 1 }));
    }

    #[test]
    fn writer_rejects_overflow() {
        let sink = Cursor::new(Vec::new());
        let mut w = BitMatrixWriter::new(sink, 1, 3).unwrap();
        w.write(&BitRow::zeros(3)).unwrap();
        let err = w.write(&BitRow::zeros(3)).unwrap_err();
        assert!(matches!(err, Error::MatrixOverflow { max_rows: 1 }));
    }

    #[test]
    fn reader_rejects_bad_size() {
        let source = Cursor::new(vec![0u8; 2]);
        let err = BitMatrixReader::new(source, 100, 100).unwrap_err();
        assert!(matches!(err, Error::MalformedMatrixFile { .. }));
    }

    // S4: r=161, c=3 -> 61 bytes; 161 rows come back, last slice is short.
    #[test]
    fn s4_161_rows_3_cols() {
        let mut rng = rand::thread_rng();
        let rows: Vec<BitRow> = (0..161).map(|_| random_row(3, &mut rng)).collect();

        let sink = Cursor::new(Vec::new());
        let mut w = BitMatrixWriter::new(sink, 161, 3).unwrap();
        for row in &rows {
            w.write(row).unwrap();
        }
        let bytes = w.finish_and_take();
        assert_eq!(bytes.len(), 61);

        let reader = BitMatrixReader::new(Cursor::new(bytes), 161, 3).unwrap();
        let read_rows: Vec<BitRow> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 161);
        assert_eq!(read_rows, rows);
    }

    // P1: write(read(x)) == x byte-for-byte.
    #[test]
    fn p1_roundtrip_byte_exact() {
        let mut rng = rand::thread_rng();
        for &(rows, cols) in &[(4u64, 3u64), (80, 1), (81, 5), (1, 1), (17, 33)] {
            let source_rows: Vec<BitRow> = (0..rows).map(|_| random_row(cols, &mut rng)).collect();
            let mut sink = BitMatrixWriter::new(Cursor::new(Vec::new()), rows, cols).unwrap();
            for r in &source_rows {
                sink.write(r).unwrap();
            }
            let bytes = sink.finish_and_take();

            let reader = BitMatrixReader::new(Cursor::new(bytes.clone()), rows, cols).unwrap();
            let mut w2 = BitMatrixWriter::new(Cursor::new(Vec::new()), rows, cols).unwrap();
            for row in reader {
                w2.write(&row.unwrap()).unwrap();
            }
            let bytes2 = w2.finish_and_take();
            assert_eq!(bytes, bytes2, "rows={rows} cols={cols}");
        }
    }

    // P7: advancing past the last row is idempotent end-of-sequence.
    #[test]
    fn p7_end_of_sequence_idempotent() {
        let mut sink = BitMatrixWriter::new(Cursor::new(Vec::new()), 2, 4).unwrap();
        sink.write(&BitRow::zeros(4)).unwrap();
        sink.write(&BitRow::zeros(4)).unwrap();
        let bytes = sink.finish_and_take();

        let mut reader = BitMatrixReader::new(Cursor::new(bytes), 2, 4).unwrap();
        assert!(reader.next_row().unwrap().is_some());
        assert!(reader.next_row().unwrap().is_some());
        assert!(reader.next_row().unwrap().is_none());
        assert!(reader.next_row().unwrap().is_none());
    }

    impl<W: MatrixSink> BitMatrixWriter<W> {
        fn finish_and_take(self) -> Vec<u8>
        where
            W: AsRef<[u8]>,
        {
            self.finish_into_sink().unwrap().as_ref().to_vec()
        }
    }

    #[test]
    fn file_backed_roundtrip() {
        use std::fs::File;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.bin");

        let mut rng = rand::thread_rng();
        let rows: Vec<BitRow> = (0..50).map(|_| random_row(6, &mut rng)).collect();

        let file = File::create(&path).unwrap();
        let mut writer = BitMatrixWriter::new(file, 50, 6).unwrap();
        for row in &rows {
            writer.write(row).unwrap();
        }
        writer.finish().unwrap();

        let file = File::open(&path).unwrap();
        let reader = BitMatrixReader::new(file, 50, 6).unwrap();
        let read_rows: Vec<BitRow> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(read_rows, rows);
    }
}
