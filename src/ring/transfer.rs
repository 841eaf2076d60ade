use super::{RingBuffer, RingError};
use std::io::{self, IoSliceMut};

impl RingBuffer {
    /// Up to `n` unread bytes as two slices in logical order, without consuming.
    ///
    /// The second slice is non-empty only when the unread range wraps.
    #[inline]
    pub fn peek(&self, n: usize) -> (&[u8], &[u8]) {
        let n = n.min(self.len);
        if n == 0 {
            return (&[], &[]);
        }
        let first = (self.capacity() - self.head).min(n);
        (&self.buf[self.head..self.head + first], &self.buf[..n - first])
    }

    #[inline]
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        self.peek(self.len)
    }

    /// Unread bytes linearized into a fresh vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let (first, second) = self.as_slices();
        let mut out = Vec::with_capacity(first.len() + second.len());
        out.extend_from_slice(first);
        out.extend_from_slice(second);
        out
    }

    /// Skips up to `n` unread bytes and returns how many were skipped.
    #[inline]
    pub fn discard(&mut self, n: usize) -> usize {
        let n = n.min(self.len);
        self.commit_read(n);
        n
    }

    /// Moves unread bytes into `dst`, returning how many were copied.
    #[inline]
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        let (first, second) = self.peek(dst.len());
        let n = first.len() + second.len();
        dst[..first.len()].copy_from_slice(first);
        dst[first.len()..n].copy_from_slice(second);
        self.commit_read(n);
        n
    }

    #[inline]
    pub fn read_byte(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let b = self.buf[self.head];
        self.commit_read(1);
        Some(b)
    }

    /// Appends all of `src`, growing the storage when free space runs short.
    ///
    /// # Errors
    ///
    /// Only `RingError::AllocationFailed`, when growth cannot get memory.
    pub fn write(&mut self, src: &[u8]) -> Result<usize, RingError> {
        if src.is_empty() {
            return Ok(0);
        }
        let free = self.available();
        if src.len() > free {
            self.grow(self.capacity() + src.len() - free)?;
        }

        let (first, second) = self.free_segments_mut();
        let split = first.len().min(src.len());
        first[..split].copy_from_slice(&src[..split]);
        second[..src.len() - split].copy_from_slice(&src[split..]);

        self.commit_write(src.len());
        Ok(src.len())
    }

    pub fn write_byte(&mut self, b: u8) -> Result<(), RingError> {
        self.write(&[b]).map(|_| ())
    }

    /// Fills free space from any reader with one vectored read.
    ///
    /// Portable counterpart of [`copy_from_socket`](Self::copy_from_socket);
    /// readers without native vectored I/O only fill the first segment.
    pub fn read_from<R: io::Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<usize> {
        if self.is_full() {
            return Ok(0);
        }
        if self.is_empty() {
            self.reset();
        }

        let (first, second) = self.free_segments_mut();
        let mut bufs = [IoSliceMut::new(first), IoSliceMut::new(second)];
        let n = reader.read_vectored(&mut bufs)?;
        if n > 0 {
            self.commit_write(n);
        }
        Ok(n)
    }

    /// Drains unread bytes into `writer` until it is empty or the writer stops
    /// accepting. A zero-length write or would-block after some progress
    /// reports the progress.
    pub fn write_to<W: io::Write + ?Sized>(&mut self, writer: &mut W) -> io::Result<usize> {
        let mut total = 0;
        while !self.is_empty() {
            let (first, _) = self.as_slices();
            match writer.write(first) {
                Ok(0) if total > 0 => break,
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => {
                    self.commit_read(n);
                    total += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock && total > 0 => break,
                Err(e) => return Err(e),
            }
        }
        Ok(total)
    }

    /// Free space as two slices: tail room after the write cursor, then head
    /// room before the read cursor.
    pub(crate) fn free_segments_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        if self.is_full() {
            return (&mut [], &mut []);
        }
        let (head, tail) = (self.head, self.tail);
        if tail < head {
            (&mut self.buf[tail..head], &mut [])
        } else {
            let (front, back) = self.buf.split_at_mut(tail);
            (back, &mut front[..head])
        }
    }
}

impl io::Read for RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(RingBuffer::read(self, buf))
    }
}

impl io::Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RingBuffer::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
