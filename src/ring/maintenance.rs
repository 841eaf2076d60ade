use super::RingBuffer;
use super::RingError;
use super::buffer::alloc_storage;

impl RingBuffer {
    /// Moves unread bytes to the front of storage so the next socket read
    /// gets one contiguous free region, growing instead when the head room
    /// cannot hold them.
    ///
    /// Returns the bytes moved, or the extra space requested when it grew.
    /// `0` means nothing was done. Whatever it does leaves at least
    /// `min_growth` bytes of tail room, so a second call is a no-op.
    pub fn rewind(&mut self) -> Result<usize, RingError> {
        if self.is_empty() {
            self.reset();
            return Ok(0);
        }

        let capacity = self.capacity();
        let unread = self.len;
        if self.is_full() {
            self.grow_for_unread()?;
            return Ok(unread);
        }

        // Wrapped data with tail != 0 already leaves one contiguous free
        // region in [tail, head); only the two unwrapped layouts qualify.
        let needs_room = self.tail == 0
            || (self.tail > self.head && capacity - self.tail < self.config.min_growth);
        if !needs_room {
            return Ok(0);
        }

        if self.head < unread || capacity - unread < self.config.min_growth {
            self.grow_for_unread()?;
            return Ok(unread);
        }

        self.buf.copy_within(self.head..self.head + unread, 0);
        self.head = 0;
        self.tail = unread;
        tracing::debug!(
            target: "sockring::ring",
            moved = unread,
            capacity,
            "rewound unread bytes to front"
        );
        Ok(unread)
    }

    /// Grows by at least the unread length, and far enough that the tail
    /// room after the linearized bytes clears `min_growth`.
    fn grow_for_unread(&mut self) -> Result<(), RingError> {
        let unread = self.len;
        let wanted = (self.capacity() + unread).max(unread + self.config.min_growth);
        self.grow(wanted)
    }

    /// Reallocates to at least `new_capacity`, linearizing unread bytes at
    /// offset 0. Never shrinks.
    ///
    /// # Errors
    ///
    /// Returns `RingError::AllocationFailed` if the new storage cannot be
    /// allocated; the buffer is left unchanged.
    pub fn grow(&mut self, new_capacity: usize) -> Result<(), RingError> {
        let old_capacity = self.capacity();
        if new_capacity <= old_capacity {
            return Ok(());
        }

        let target = self.amortized_capacity(new_capacity);
        let mut storage = alloc_storage(target)?;

        let unread = self.len;
        let (first, second) = self.as_slices();
        storage[..first.len()].copy_from_slice(first);
        storage[first.len()..unread].copy_from_slice(second);

        self.buf = storage;
        self.head = 0;
        self.tail = unread;

        tracing::debug!(
            target: "sockring::ring",
            old_capacity,
            requested = new_capacity,
            new_capacity = target,
            unread,
            "grew ring storage"
        );
        Ok(())
    }

    fn amortized_capacity(&self, requested: usize) -> usize {
        let mut n = self.capacity();
        let doubled = n.saturating_mul(2);
        if requested > doubled {
            return requested;
        }
        if n < self.config.grow_threshold {
            return doubled;
        }
        while n < requested {
            n = n.saturating_add((n / 4).max(1));
        }
        n
    }
}
