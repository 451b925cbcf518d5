use crate::graphics::{
    commands::CommandBuffer,
    error::TaskError,
    provider::ResourceProvider,
    resources::TextureProxy,
    types::{Point, Rect},
};

use super::task::{
    backend_error, instantiate_proxy, resolved_texture, Lifecycle, Side, Task, TaskKind,
    TaskState,
};

/// Copies a region of one texture to a point in another.
#[derive(Debug)]
pub struct CopyTextureToTextureTask {
    src_proxy: Option<TextureProxy>,
    src_rect: Rect,
    dst_proxy: Option<TextureProxy>,
    dst_point: Point,
    lifecycle: Lifecycle,
}

impl CopyTextureToTextureTask {
    pub fn new(
        src_proxy: Option<TextureProxy>,
        src_rect: Rect,
        dst_proxy: Option<TextureProxy>,
        dst_point: Point,
    ) -> Self {
        Self {
            src_proxy,
            src_rect,
            dst_proxy,
            dst_point,
            lifecycle: Lifecycle::new(TaskKind::TextureToTexture),
        }
    }

    pub fn src_proxy(&self) -> Option<&TextureProxy> {
        self.src_proxy.as_ref()
    }

    pub fn dst_proxy(&self) -> Option<&TextureProxy> {
        self.dst_proxy.as_ref()
    }

    pub fn src_rect(&self) -> Rect {
        self.src_rect
    }

    pub fn dst_point(&self) -> Point {
        self.dst_point
    }
}

impl Task for CopyTextureToTextureTask {
    fn kind(&self) -> TaskKind {
        TaskKind::TextureToTexture
    }

    fn state(&self) -> TaskState {
        self.lifecycle.state()
    }

    fn prepare_resources(&mut self, provider: &dyn ResourceProvider) -> Result<(), TaskError> {
        const TASK: TaskKind = TaskKind::TextureToTexture;

        let src_proxy = self.src_proxy.as_ref();
        let dst_proxy = self.dst_proxy.as_ref();
        let src_rect = self.src_rect;
        let dst_rect = src_rect.with_origin(self.dst_point);

        self.lifecycle.prepare(|| {
            let src = instantiate_proxy(TASK, Side::Src, src_proxy, provider)?;
            let dst = instantiate_proxy(TASK, Side::Dst, dst_proxy, provider)?;

            for (side, rect, dimensions) in [
                (Side::Src, src_rect, src.dimensions()),
                (Side::Dst, dst_rect, dst.dimensions()),
            ] {
                if !rect.fits_in(dimensions) {
                    return Err(TaskError::RegionOutOfBounds {
                        task: TASK,
                        side,
                        region: rect,
                        dimensions,
                    });
                }
            }

            Ok(())
        })
    }

    fn add_commands(&mut self, command_buffer: &mut dyn CommandBuffer) -> Result<(), TaskError> {
        const TASK: TaskKind = TaskKind::TextureToTexture;

        let src_proxy = self.src_proxy.as_ref();
        let dst_proxy = self.dst_proxy.as_ref();
        let (src_rect, dst_point) = (self.src_rect, self.dst_point);

        self.lifecycle.record(|| {
            let src = resolved_texture(TASK, Side::Src, src_proxy)?;
            let dst = resolved_texture(TASK, Side::Dst, dst_proxy)?;

            command_buffer
                .copy_texture_to_texture(src, src_rect, dst, dst_point)
                .map_err(backend_error(TASK))
        })
    }
}
