//! Virtual horizontal concatenation of several [`super::BitMatrixReader`]s
//! sharing the same row count — never materializes the concatenated matrix.

use crate::bitrow::BitRow;
use crate::error::Result;

use super::{BitMatrixReader, MatrixSource};

/// Reads `rows` rows, each the left-to-right concatenation of one row from
/// every sub-reader, in the order the sub-readers were given.
///
/// All sub-readers are opened on construction and closed together when this
/// reader is dropped — a failure opening any one of them fails the whole
/// group. Each sub-reader enforces its own `(rows, cols_i)` size check, so a
/// mismatched row count between sub-readers surfaces there.
pub struct BitMatrixGroupReader<R: MatrixSource> {
    readers: Vec<BitMatrixReader<R>>,
    rows: u64,
    cols: u64,
}

impl<R: MatrixSource> BitMatrixGroupReader<R> {
    /// `inputs` is an ordered list of `(source, cols)` pairs; every
    /// sub-reader is opened against the shared `rows`.
    pub fn new(inputs: Vec<(R, u64)>, rows: u64) -> Result<Self> {
        let mut readers = Vec::with_capacity(inputs.len());
        let mut cols = 0u64;
        for (source, c) in inputs {
            readers.push(BitMatrixReader::new(source, rows, c)?);
            cols += c;
        }
        Ok(BitMatrixGroupReader {
            readers,
            rows,
            cols,
        })
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn cols(&self) -> u64 {
        self.cols
    }

    /// Advance every sub-reader by one row and concatenate the results.
    /// `None` once all `rows` group-rows have been produced.
    pub fn next_row(&mut self) -> Result<Option<BitRow>> {
        let mut parts = Vec::with_capacity(self.readers.len());
        for reader in &mut self.readers {
            match reader.next_row()? {
                Some(row) => parts.push(row),
                None => return Ok(None),
            }
        }
        Ok(Some(BitRow::concat(&parts)))
    }
}

impl<R: MatrixSource> Iterator for BitMatrixGroupReader<R> {
    type Item = Result<BitRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::matrix::BitMatrixWriter;

    fn build_matrix(rows: u64, cols: u64, bits: &[(u64, u64)]) -> Vec<u8> {
        let mut w = BitMatrixWriter::new(Cursor::new(Vec::new()), rows, cols).unwrap();
        for r in 0..rows {
            let mut row = BitRow::zeros(cols);
            for &(br, bc) in bits {
                if br == r {
                    row.set(bc, true);
                }
            }
            w.write(&row).unwrap();
        }
        w.finish_into_sink().unwrap().into_inner()
    }

    // S5: merging (r=4,c=3) and (r=4,c=5) yields (r=4,c=8); bit (2,6) of the
    // merged matrix equals bit (2,3) of the second input.
    #[test]
    fn s5_group_reader_concatenates_columns() {
        let left = build_matrix(4, 3, &[(2, 1)]);
        let right = build_matrix(4, 5, &[(2, 3)]);

        let readers = vec![
            (Cursor::new(left), 3u64),
            (Cursor::new(right), 5u64),
        ];
        let mut group = BitMatrixGroupReader::new(readers, 4).unwrap();
        assert_eq!(group.cols(), 8);

        let row2 = group.nth(2).unwrap().unwrap();
        assert!(row2.get(6));
        assert_eq!(row2.count_ones(), 1);
    }

    #[test]
    fn mismatched_row_count_is_rejected() {
        let left = build_matrix(4, 3, &[]);
        let right = build_matrix(4, 5, &[]);
        // Declaring a row count the sources don't actually have must fail
        // at the sub-reader's own size check.
        let readers = vec![(Cursor::new(left), 3u64), (Cursor::new(right), 5u64)];
        let err = BitMatrixGroupReader::new(readers, 5).unwrap_err();
        assert!(matches!(err, crate::error::Error::MalformedMatrixFile { .. }));
    }
}
