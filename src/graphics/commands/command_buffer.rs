use crate::graphics::{
    error::BackendError,
    resources::{Buffer, Texture},
    types::{Point, Rect},
};

/// Backend-facing recorder for copy commands.
///
/// Handles are passed by value so the implementation can keep them alive
/// until the GPU is done with the command.
pub trait CommandBuffer {
    fn copy_buffer_to_buffer(
        &mut self,
        src: Buffer,
        src_offset: u64,
        dst: Buffer,
        dst_offset: u64,
        size: u64,
    ) -> Result<(), BackendError>;

    fn copy_texture_to_buffer(
        &mut self,
        texture: Texture,
        region: Rect,
        buffer: Buffer,
        offset: u64,
        row_bytes: u64,
    ) -> Result<(), BackendError>;

    fn copy_texture_to_texture(
        &mut self,
        src: Texture,
        region: Rect,
        dst: Texture,
        dst_point: Point,
    ) -> Result<(), BackendError>;
}
