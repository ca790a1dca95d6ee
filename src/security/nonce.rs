use crate::constants::{NONCE_BUFFER_POOL_SIZE, NONCE_BYTE_LENGTH};
use getrandom::getrandom;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
    ops::{Deref, DerefMut},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

#[derive(Debug)]
pub struct NonceGenerator {
    byte_length: AtomicUsize,
    buffer_pool: Arc<Mutex<SmallVec<[Vec<u8>; NONCE_BUFFER_POOL_SIZE]>>>,
}

impl Clone for NonceGenerator {
    fn clone(&self) -> Self {
        Self {
            byte_length: AtomicUsize::new(self.byte_length.load(Ordering::Relaxed)),
            buffer_pool: self.buffer_pool.clone(),
        }
    }
}

impl NonceGenerator {
    #[inline]
    pub fn new(byte_length: usize) -> Self {
        Self {
            byte_length: AtomicUsize::new(byte_length),
            buffer_pool: Arc::new(Mutex::new(SmallVec::new())),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize, byte_length: usize) -> Self {
        let buffer_pool = Arc::new(Mutex::new({
            let mut buffers = SmallVec::new();
            for _ in 0..capacity.min(NONCE_BUFFER_POOL_SIZE) {
                buffers.push(vec![0u8; byte_length]);
            }
            buffers
        }));

        Self {
            byte_length: AtomicUsize::new(byte_length),
            buffer_pool,
        }
    }

    // Hex doubles the length, so the default 16 bytes yield 32 characters.
    #[inline]
    pub fn generate(&self) -> String {
        let byte_length = self.byte_length.load(Ordering::Relaxed);
        let mut buffer = {
            let mut pool = self.buffer_pool.lock();
            if let Some(mut buf) = pool.pop() {
                buf.clear();
                buf.resize(byte_length, 0);
                buf
            } else {
                vec![0u8; byte_length]
            }
        };

        getrandom(&mut buffer).expect("Failed to generate random bytes");
        let encoded = hex::encode(&buffer);

        {
            let mut pool = self.buffer_pool.lock();
            if pool.len() < NONCE_BUFFER_POOL_SIZE {
                pool.push(buffer);
            }
        }

        encoded
    }

    #[inline]
    pub fn set_byte_length(&self, byte_length: usize) {
        self.byte_length.store(byte_length, Ordering::Relaxed);
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.byte_length.load(Ordering::Relaxed)
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new(NONCE_BYTE_LENGTH)
    }
}

#[derive(Debug, Clone)]
pub struct RequestNonce(pub String);

impl Deref for RequestNonce {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RequestNonce {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
