use std::{ops::Deref, sync::Arc};

use crate::graphics::{
    provider::Allocation,
    types::{BufferUsage, ResourceId},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferDesc {
    pub size: u64,
    pub usage: BufferUsage,
    pub label: Option<String>,
}

impl BufferDesc {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            usage: BufferUsage::COPY_SRC | BufferUsage::COPY_DST,
            label: None,
        }
    }

    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn readback(self) -> Self {
        self.with_usage(BufferUsage::COPY_DST | BufferUsage::MAP_READ)
    }
}

#[derive(Clone, Debug)]
pub struct Buffer(Arc<BufferInner>);

impl Deref for Buffer {
    type Target = BufferInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct BufferInner {
    id: ResourceId,
    desc: BufferDesc,
    allocation: Option<Allocation>,
}

impl Buffer {
    /// Resource whose memory is owned outside any budget.
    pub fn new(desc: BufferDesc) -> Self {
        Self(Arc::new(BufferInner {
            id: ResourceId::next(),
            desc,
            allocation: None,
        }))
    }

    pub(crate) fn with_allocation(desc: BufferDesc, allocation: Allocation) -> Self {
        Self(Arc::new(BufferInner {
            id: ResourceId::next(),
            desc,
            allocation: Some(allocation),
        }))
    }

    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles, the backing memory is released with the last one.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl BufferInner {
    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn size(&self) -> u64 {
        self.desc.size
    }

    pub fn usage(&self) -> BufferUsage {
        self.desc.usage
    }

    pub fn desc(&self) -> &BufferDesc {
        &self.desc
    }

    /// Whether the memory counts against a provider budget.
    pub fn is_budgeted(&self) -> bool {
        self.allocation.is_some()
    }
}
