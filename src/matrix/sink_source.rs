//! Backing store abstraction for [`super::BitMatrixReader`] /
//! [`super::BitMatrixWriter`]: anything that can report its current byte
//! length and be read from / written to — a real file, or an in-memory
//! buffer for tests.

use std::fs::File;
use std::io::{self, Cursor, Read, Write};

pub trait MatrixSource: Read {
    /// Total byte length of the source, queried once at reader construction.
    fn byte_len(&mut self) -> io::Result<u64>;
}

pub trait MatrixSink: Write {
    /// Current byte length of the sink, queried once at writer construction
    /// to check it starts out empty.
    fn byte_len(&mut self) -> io::Result<u64>;
}

impl MatrixSource for File {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl MatrixSink for File {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl MatrixSource for Cursor<Vec<u8>> {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }
}

impl MatrixSink for Cursor<Vec<u8>> {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }
}

impl MatrixSource for &[u8] {
    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}
