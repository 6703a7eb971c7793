use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::{ByteSource, CHUNK_SIZE, SourceError};

/// Source over anything readable: a capture file, stdin or a device node.
pub struct ReaderSource<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, CHUNK_SIZE)
    }

    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            buf: vec![0u8; chunk_size.max(1)],
        }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(0) => return Ok(None),
                Ok(n) => return Ok(Some(self.buf[..n].to_vec())),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SourceError::Io(err)),
            }
        }
    }
}

/// Open a capture file or an already configured serial device node.
pub fn open_device(path: &Path) -> Result<ReaderSource<File>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(ReaderSource::new(file))
}

#[cfg(test)]
mod tests {
    use super::{ReaderSource, open_device};
    use crate::source::{ByteSource, SourceError};
    use std::io::Cursor;
    use std::path::Path;

    #[test]
    fn yields_chunks_then_end() {
        let mut source = ReaderSource::with_chunk_size(Cursor::new(b"abcde".to_vec()), 2);
        assert_eq!(source.next_chunk().unwrap(), Some(b"ab".to_vec()));
        assert_eq!(source.next_chunk().unwrap(), Some(b"cd".to_vec()));
        assert_eq!(source.next_chunk().unwrap(), Some(b"e".to_vec()));
        assert_eq!(source.next_chunk().unwrap(), None);
    }

    #[test]
    fn open_missing_device_fails() {
        let err = match open_device(Path::new("/nonexistent/skygnome-tty")) {
            Ok(_) => panic!("expected open failure"),
            Err(err) => err,
        };
        assert!(matches!(err, SourceError::Open { .. }));
        assert!(err.to_string().contains("skygnome-tty"));
    }
}
