//! Process-wide pools of transfer buffers.
//!
//! A rented buffer goes back to its pool when the [`PooledBuffer`] guard is
//! dropped, so it is returned on every exit path, error paths included.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Maximum number of idle buffers a pool keeps.
const MAX_RETAINED: usize = 8;

/// Shared pool for byte transfers.
pub static BYTE_POOL: BufferPool<u8> = BufferPool::new(MAX_RETAINED);

/// Shared pool for character transfers.
pub static CHAR_POOL: BufferPool<char> = BufferPool::new(MAX_RETAINED);

/// Pool of reusable buffers.
pub struct BufferPool<T> {
    free: Mutex<Vec<Vec<T>>>,
    max_retained: usize,
}

impl<T: Copy + Default> BufferPool<T> {
    pub const fn new(max_retained: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_retained,
        }
    }

    /// Rent a zero-filled buffer of exactly `len` units.
    pub fn rent(&self, len: usize) -> PooledBuffer<'_, T> {
        let recycled = {
            let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
            free.iter()
                .position(|b| b.capacity() >= len)
                .map(|idx| free.swap_remove(idx))
        };
        let mut buf = recycled.unwrap_or_else(|| Vec::with_capacity(len));
        buf.clear();
        buf.resize(len, T::default());
        PooledBuffer { pool: self, buf }
    }

    /// Number of idle buffers.
    pub fn idle(&self) -> usize {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn give_back(&self, buf: Vec<T>) {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_retained {
            free.push(buf);
        }
    }
}

/// A buffer on loan from a [`BufferPool`].
pub struct PooledBuffer<'p, T: Copy + Default> {
    pool: &'p BufferPool<T>,
    buf: Vec<T>,
}

impl<T: Copy + Default> Deref for PooledBuffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<T: Copy + Default> DerefMut for PooledBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T: Copy + Default> Drop for PooledBuffer<'_, T> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}
