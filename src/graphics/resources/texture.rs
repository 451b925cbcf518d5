use std::{ops::Deref, sync::Arc};

use glam::UVec2;

use crate::graphics::{
    provider::Allocation,
    types::{ResourceId, TextureFormat},
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureDesc {
    pub dimensions: UVec2,
    pub format: TextureFormat,
    pub label: Option<String>,
}

impl TextureDesc {
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            dimensions: UVec2::new(width, height),
            format,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Bytes of tightly packed storage for a single mip.
    pub fn byte_size(&self) -> u64 {
        self.dimensions.x as u64 * self.dimensions.y as u64 * self.format.bytes_per_pixel() as u64
    }
}

/// Instantiated texture. Holding a handle keeps the backing memory alive.
#[derive(Clone, Debug)]
pub struct Texture(Arc<TextureInner>);

impl Deref for Texture {
    type Target = TextureInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct TextureInner {
    id: ResourceId,
    desc: TextureDesc,
    allocation: Option<Allocation>,
}

impl Texture {
    /// Resource whose memory is owned outside any budget.
    pub fn new(desc: TextureDesc) -> Self {
        Self(Arc::new(TextureInner {
            id: ResourceId::next(),
            desc,
            allocation: None,
        }))
    }

    pub(crate) fn with_allocation(desc: TextureDesc, allocation: Allocation) -> Self {
        Self(Arc::new(TextureInner {
            id: ResourceId::next(),
            desc,
            allocation: Some(allocation),
        }))
    }

    pub fn ptr_eq(&self, other: &Texture) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl TextureInner {
    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    pub fn dimensions(&self) -> UVec2 {
        self.desc.dimensions
    }

    pub fn format(&self) -> TextureFormat {
        self.desc.format
    }

    /// Whether the memory counts against a provider budget.
    pub fn is_budgeted(&self) -> bool {
        self.allocation.is_some()
    }
}
