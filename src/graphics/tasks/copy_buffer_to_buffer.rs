use crate::graphics::{
    commands::CommandBuffer,
    error::TaskError,
    provider::ResourceProvider,
    resources::Buffer,
    types::BufferUsage,
};

use super::task::{backend_error, Lifecycle, Task, TaskKind, TaskState};

/// Copies the whole of one buffer into another of the same size.
#[derive(Debug)]
pub struct CopyBufferToBufferTask {
    src: Buffer,
    dst: Buffer,
    lifecycle: Lifecycle,
}

impl CopyBufferToBufferTask {
    /// # Panics
    ///
    /// Panics if the buffers differ in size.
    pub fn new(src: Buffer, dst: Buffer) -> Self {
        assert_eq!(
            src.size(),
            dst.size(),
            "buffer-to-buffer copy needs equally sized buffers"
        );
        debug_assert!(src.usage().contains(BufferUsage::COPY_SRC));
        debug_assert!(dst.usage().contains(BufferUsage::COPY_DST));

        Self {
            src,
            dst,
            lifecycle: Lifecycle::new(TaskKind::BufferToBuffer),
        }
    }

    pub fn src(&self) -> &Buffer {
        &self.src
    }

    pub fn dst(&self) -> &Buffer {
        &self.dst
    }
}

impl Task for CopyBufferToBufferTask {
    fn kind(&self) -> TaskKind {
        TaskKind::BufferToBuffer
    }

    fn state(&self) -> TaskState {
        self.lifecycle.state()
    }

    // Buffers are always backed.
    fn prepare_resources(&mut self, _provider: &dyn ResourceProvider) -> Result<(), TaskError> {
        self.lifecycle.prepare(|| Ok(()))
    }

    fn add_commands(&mut self, command_buffer: &mut dyn CommandBuffer) -> Result<(), TaskError> {
        let src = &self.src;
        let dst = &self.dst;

        self.lifecycle.record(|| {
            command_buffer
                .copy_buffer_to_buffer(src.clone(), 0, dst.clone(), 0, dst.size())
                .map_err(backend_error(TaskKind::BufferToBuffer))
        })
    }
}
