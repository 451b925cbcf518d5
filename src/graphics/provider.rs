use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    error::InstantiateError,
    resources::{Buffer, BufferDesc, Texture, TextureDesc},
};

/// Allocator that turns texture proxies into backed textures.
pub trait ResourceProvider {
    fn create_texture(&self, desc: &TextureDesc) -> Result<Texture, InstantiateError>;
}

/// Bytes reserved from a [`BudgetedResourceProvider`], returned when the
/// owning resource is dropped.
#[derive(Debug)]
pub(crate) struct Allocation {
    used: Arc<Mutex<u64>>,
    size: u64,
}

impl Drop for Allocation {
    fn drop(&mut self) {
        let mut used = self.used.lock();
        *used -= self.size;

        tracing::trace!(size = self.size, used = *used, "released allocation");
    }
}

/// Hands out textures and buffers until a fixed byte budget runs out. Bytes
/// go back to the budget when the last handle to a resource is dropped.
#[derive(Debug)]
pub struct BudgetedResourceProvider {
    budget: u64,
    used: Arc<Mutex<u64>>,
}

impl BudgetedResourceProvider {
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            used: Arc::new(Mutex::new(0)),
        }
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn used(&self) -> u64 {
        *self.used.lock()
    }

    pub fn remaining(&self) -> u64 {
        self.budget - self.used()
    }

    pub fn create_buffer(&self, desc: BufferDesc) -> Result<Buffer, InstantiateError> {
        let allocation = self.reserve(desc.size)?;

        Ok(Buffer::with_allocation(desc, allocation))
    }

    fn reserve(&self, requested: u64) -> Result<Allocation, InstantiateError> {
        let mut used = self.used.lock();
        let available = self.budget - *used;

        if requested > available {
            tracing::warn!(requested, available, "resource budget exhausted");
            return Err(InstantiateError::OutOfBudget {
                requested,
                available,
            });
        }

        *used += requested;

        Ok(Allocation {
            used: self.used.clone(),
            size: requested,
        })
    }
}

impl ResourceProvider for BudgetedResourceProvider {
    fn create_texture(&self, desc: &TextureDesc) -> Result<Texture, InstantiateError> {
        let allocation = self.reserve(desc.byte_size())?;

        Ok(Texture::with_allocation(desc.clone(), allocation))
    }
}
