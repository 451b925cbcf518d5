use smallvec::SmallVec;

use crate::graphics::{
    error::BackendError,
    resources::{Buffer, Texture},
    types::{Point, Rect},
};

use super::CommandBuffer;

#[derive(Clone, Debug)]
pub enum CopyCommand {
    BufferToBuffer {
        src: Buffer,
        src_offset: u64,
        dst: Buffer,
        dst_offset: u64,
        size: u64,
    },
    TextureToBuffer {
        texture: Texture,
        region: Rect,
        buffer: Buffer,
        offset: u64,
        row_bytes: u64,
    },
    TextureToTexture {
        src: Texture,
        region: Rect,
        dst: Texture,
        dst_point: Point,
    },
}

/// [`CommandBuffer`] that keeps copies in submission order for a backend to
/// encode later.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: SmallVec<[CopyCommand; 8]>,
    capacity: Option<usize>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder that rejects commands past `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: SmallVec::new(),
            capacity: Some(capacity),
        }
    }

    pub fn commands(&self) -> &[CopyCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn finish(self) -> Vec<CopyCommand> {
        self.commands.into_vec()
    }

    fn push(&mut self, command: CopyCommand) -> Result<(), BackendError> {
        if let Some(capacity) = self.capacity {
            if self.commands.len() >= capacity {
                return Err(BackendError::OutOfCommandSpace { capacity });
            }
        }

        tracing::trace!(index = self.commands.len(), "recorded copy command");
        self.commands.push(command);

        Ok(())
    }
}

impl CommandBuffer for CommandRecorder {
    fn copy_buffer_to_buffer(
        &mut self,
        src: Buffer,
        src_offset: u64,
        dst: Buffer,
        dst_offset: u64,
        size: u64,
    ) -> Result<(), BackendError> {
        self.push(CopyCommand::BufferToBuffer {
            src,
            src_offset,
            dst,
            dst_offset,
            size,
        })
    }

    fn copy_texture_to_buffer(
        &mut self,
        texture: Texture,
        region: Rect,
        buffer: Buffer,
        offset: u64,
        row_bytes: u64,
    ) -> Result<(), BackendError> {
        self.push(CopyCommand::TextureToBuffer {
            texture,
            region,
            buffer,
            offset,
            row_bytes,
        })
    }

    fn copy_texture_to_texture(
        &mut self,
        src: Texture,
        region: Rect,
        dst: Texture,
        dst_point: Point,
    ) -> Result<(), BackendError> {
        self.push(CopyCommand::TextureToTexture {
            src,
            region,
            dst,
            dst_point,
        })
    }
}
