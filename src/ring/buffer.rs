use super::{RingConfig, RingError};

/// Growable circular byte buffer staging socket reads for one connection.
///
/// Unread bytes live in `[head, tail)`, wrapping past the end of `buf` when
/// `tail <= head`. `len` disambiguates the coinciding-cursor case: zero means
/// empty, `capacity` means full.
pub struct RingBuffer {
    pub(crate) buf: Vec<u8>,
    pub(crate) head: usize,
    pub(crate) tail: usize,
    pub(crate) len: usize,
    pub(crate) config: RingConfig,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Self::with_config(RingConfig::with_capacity(capacity))
    }

    pub fn with_config(config: RingConfig) -> Result<Self, RingError> {
        config.validate()?;
        let buf = alloc_storage(config.initial_capacity)?;
        Ok(Self::from_storage(buf, config))
    }

    fn from_storage(buf: Vec<u8>, config: RingConfig) -> Self {
        Self {
            buf,
            head: 0,
            tail: 0,
            len: 0,
            config,
        }
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn available(&self) -> usize {
        self.capacity() - self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline(always)]
    pub fn read_cursor(&self) -> usize {
        self.head
    }

    #[inline(always)]
    pub fn write_cursor(&self) -> usize {
        self.tail
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Drops all unread bytes; storage is kept.
    #[inline]
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    #[inline(always)]
    pub(crate) fn wrap(&self, pos: usize) -> usize {
        if pos >= self.capacity() {
            pos - self.capacity()
        } else {
            pos
        }
    }

    /// Records `n` bytes landed at the write cursor.
    #[inline]
    pub(crate) fn commit_write(&mut self, n: usize) {
        debug_assert!(n <= self.available());
        self.tail = self.wrap(self.tail + n);
        self.len += n;
    }

    /// Releases `n` bytes at the read cursor.
    #[inline]
    pub(crate) fn commit_read(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.head = self.wrap(self.head + n);
        self.len -= n;
    }
}

/// Aborts on allocation failure like any `Vec`; use
/// [`RingBuffer::with_config`] to get the error instead.
impl Default for RingBuffer {
    fn default() -> Self {
        let config = RingConfig::default();
        Self::from_storage(vec![0; config.initial_capacity], config)
    }
}

pub(crate) fn alloc_storage(capacity: usize) -> Result<Vec<u8>, RingError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| RingError::AllocationFailed {
            requested: capacity,
        })?;
    buf.resize(capacity, 0);
    Ok(buf)
}
