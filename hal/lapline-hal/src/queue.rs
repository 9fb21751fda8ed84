//! In-memory byte queue
//!
//! A fixed-capacity FIFO implementing both [`ByteSink`] and [`ByteSource`].
//! Wiring one queue as the transmitter's sink and the receiver's source
//! gives a lossless loopback link for host-side simulation and tests.

use heapless::Deque;

use crate::uart::{ByteSink, ByteSource};

/// Errors from writing into a [`ByteQueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// Queue is full; bytes from the failing write onward were dropped
    Overflow,
}

/// Fixed-capacity byte FIFO
#[derive(Debug, Clone)]
pub struct ByteQueue<const N: usize> {
    bytes: Deque<u8, N>,
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteQueue<N> {
    pub const fn new() -> Self {
        Self {
            bytes: Deque::new(),
        }
    }

    /// Create a queue pre-filled with `data`
    pub fn from_slice(data: &[u8]) -> Result<Self, QueueError> {
        let mut queue = Self::new();
        queue.write_bytes(data)?;
        Ok(queue)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Pop the oldest byte
    pub fn pop(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }

    /// Iterate over queued bytes, oldest first, without consuming them
    pub fn iter(&self) -> impl Iterator<Item = &u8> {
        self.bytes.iter()
    }
}

impl<const N: usize> ByteSource for ByteQueue<N> {
    type Error = core::convert::Infallible;

    fn bytes_available(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.bytes.is_empty())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.bytes.pop_front())
    }
}

impl<const N: usize> ByteSink for ByteQueue<N> {
    type Error = QueueError;

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.bytes
                .push_back(byte)
                .map_err(|_| QueueError::Overflow)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = ByteQueue::<8>::new();
        queue.write_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.read_byte(), Ok(Some(1)));
        assert_eq!(queue.read_byte(), Ok(Some(2)));
        assert_eq!(queue.read_byte(), Ok(Some(3)));
        assert_eq!(queue.read_byte(), Ok(None));
        assert_eq!(queue.bytes_available(), Ok(false));
    }

    #[test]
    fn test_queue_overflow() {
        let mut queue = ByteQueue::<2>::new();
        assert_eq!(queue.write_bytes(&[1, 2, 3]), Err(QueueError::Overflow));
        // Bytes that fit are kept
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_from_slice() {
        let queue = ByteQueue::<4>::from_slice(&[9, 8]).unwrap();
        let collected: heapless::Vec<u8, 4> = queue.iter().copied().collect();
        assert_eq!(collected.as_slice(), &[9, 8]);
    }
}
