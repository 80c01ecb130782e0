use std::io::{Read, Result, Write};
use wasi::io::streams::{InputStream, OutputStream, StreamError};

/// `blocking-write-and-flush` accepts at most 4096 bytes per call.
const MAX_WRITE: usize = 4096;

/// A blocking reader over a `wasi:io` input stream.
///
/// End-of-stream (the host reports `closed`) surfaces as `Ok(0)`, matching
/// the `std::io::Read` convention.
#[derive(Debug)]
pub struct BlockingInputStream {
    stream: InputStream,
}

impl BlockingInputStream {
    pub fn new(stream: InputStream) -> Self {
        Self { stream }
    }
}

impl Read for BlockingInputStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        // Ideally, the ABI would be able to read directly into buf. However,
        // with the default generated bindings, it returns a newly allocated
        // vec, which we need to copy into buf.
        let read = match self.stream.blocking_read(buf.len() as u64) {
            Ok(r) => r,
            Err(StreamError::Closed) => return Ok(0),
            Err(StreamError::LastOperationFailed(err)) => {
                return Err(std::io::Error::other(err.to_debug_string()))
            }
        };
        let len = read.len();
        buf[0..len].copy_from_slice(&read);
        Ok(len)
    }
}

/// A blocking writer over a `wasi:io` output stream.
///
/// Each write is flushed before returning; there is no internal buffering.
/// A stream closed by the peer surfaces as `Ok(0)`, the writer-side
/// end-of-stream signal, rather than an error.
#[derive(Debug)]
pub struct BlockingOutputStream {
    stream: OutputStream,
}

impl BlockingOutputStream {
    pub fn new(stream: OutputStream) -> Self {
        Self { stream }
    }
}

impl Write for BlockingOutputStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let len = buf.len().min(MAX_WRITE);
        match self.stream.blocking_write_and_flush(&buf[0..len]) {
            Ok(()) => Ok(len),
            Err(StreamError::Closed) => Ok(0),
            Err(StreamError::LastOperationFailed(err)) => {
                Err(std::io::Error::other(err.to_debug_string()))
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream.blocking_flush() {
            // Flushing a stream the peer already closed is a no-op end state.
            Ok(()) | Err(StreamError::Closed) => Ok(()),
            Err(StreamError::LastOperationFailed(err)) => {
                Err(std::io::Error::other(err.to_debug_string()))
            }
        }
    }
}
