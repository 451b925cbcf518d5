use crate::graphics::{
    commands::CommandBuffer,
    error::TaskError,
    provider::ResourceProvider,
    resources::{Buffer, Texture, TextureProxy},
    types::{BufferUsage, Rect},
};

use super::task::{
    backend_error, instantiate_proxy, resolved_texture, Lifecycle, Side, Task, TaskKind,
    TaskState,
};

/// Reads a region of a texture back into a linear buffer.
#[derive(Debug)]
pub struct CopyTextureToBufferTask {
    proxy: Option<TextureProxy>,
    src_rect: Rect,
    buffer: Buffer,
    buffer_offset: u64,
    buffer_row_bytes: u64,
    lifecycle: Lifecycle,
}

impl CopyTextureToBufferTask {
    pub fn new(
        proxy: Option<TextureProxy>,
        src_rect: Rect,
        buffer: Buffer,
        buffer_offset: u64,
        buffer_row_bytes: u64,
    ) -> Self {
        debug_assert!(buffer.usage().contains(BufferUsage::COPY_DST));

        Self {
            proxy,
            src_rect,
            buffer,
            buffer_offset,
            buffer_row_bytes,
            lifecycle: Lifecycle::new(TaskKind::TextureToBuffer),
        }
    }

    pub fn proxy(&self) -> Option<&TextureProxy> {
        self.proxy.as_ref()
    }

    pub fn src_rect(&self) -> Rect {
        self.src_rect
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}

fn validate(
    texture: &Texture,
    src_rect: Rect,
    buffer: &Buffer,
    offset: u64,
    row_bytes: u64,
) -> Result<(), TaskError> {
    const TASK: TaskKind = TaskKind::TextureToBuffer;

    if !src_rect.fits_in(texture.dimensions()) {
        return Err(TaskError::RegionOutOfBounds {
            task: TASK,
            side: Side::Src,
            region: src_rect,
            dimensions: texture.dimensions(),
        });
    }

    let bpp = texture.format().bytes_per_pixel() as u64;
    let min_row_bytes = src_rect.width as u64 * bpp;

    if row_bytes < min_row_bytes {
        return Err(TaskError::RowBytesTooSmall {
            task: TASK,
            row_bytes,
            min_row_bytes,
        });
    }

    // The last row only needs its tight width.
    let required = if src_rect.is_empty() {
        offset
    } else {
        let rows = src_rect.height as u64 - 1;
        offset
            .saturating_add(row_bytes.saturating_mul(rows))
            .saturating_add(min_row_bytes)
    };

    if required > buffer.size() {
        return Err(TaskError::BufferTooSmall {
            task: TASK,
            required,
            size: buffer.size(),
        });
    }

    Ok(())
}

impl Task for CopyTextureToBufferTask {
    fn kind(&self) -> TaskKind {
        TaskKind::TextureToBuffer
    }

    fn state(&self) -> TaskState {
        self.lifecycle.state()
    }

    fn prepare_resources(&mut self, provider: &dyn ResourceProvider) -> Result<(), TaskError> {
        let proxy = self.proxy.as_ref();
        let src_rect = self.src_rect;
        let buffer = &self.buffer;
        let (offset, row_bytes) = (self.buffer_offset, self.buffer_row_bytes);

        self.lifecycle.prepare(|| {
            let texture =
                instantiate_proxy(TaskKind::TextureToBuffer, Side::Src, proxy, provider)?;

            validate(&texture, src_rect, buffer, offset, row_bytes)
        })
    }

    fn add_commands(&mut self, command_buffer: &mut dyn CommandBuffer) -> Result<(), TaskError> {
        let proxy = self.proxy.as_ref();
        let src_rect = self.src_rect;
        let buffer = &self.buffer;
        let (offset, row_bytes) = (self.buffer_offset, self.buffer_row_bytes);

        self.lifecycle.record(|| {
            let texture = resolved_texture(TaskKind::TextureToBuffer, Side::Src, proxy)?;

            command_buffer
                .copy_texture_to_buffer(texture, src_rect, buffer.clone(), offset, row_bytes)
                .map_err(backend_error(TaskKind::TextureToBuffer))
        })
    }
}

#[cfg(test)]
#[allow(unused)]
mod tests {
    use super::CopyTextureToBufferTask;
    use crate::graphics::{
        commands::{CommandRecorder, CopyCommand},
        error::{InstantiateError, TaskError},
        provider::BudgetedResourceProvider,
        resources::{Buffer, BufferDesc, Texture, TextureDesc, TextureProxy},
        tasks::{Side, Task, TaskState},
        types::{Rect, TextureFormat},
    };

    const fn is_send<T: Send>() {}

    const _: () = is_send::<CopyTextureToBufferTask>();

    fn desc() -> TextureDesc {
        TextureDesc::new(64, 64, TextureFormat::Rgba8Unorm)
    }

    fn readback(size: u64) -> Buffer {
        Buffer::new(BufferDesc::new(size).readback())
    }

    #[test]
    fn missing_proxy_fails_prepare() {
        let mut task =
            CopyTextureToBufferTask::new(None, Rect::new(0, 0, 4, 4), readback(64), 0, 16);
        let mut recorder = CommandRecorder::new();

        let err = task
            .prepare_resources(&BudgetedResourceProvider::new(0))
            .unwrap_err();

        assert!(matches!(
            err,
            TaskError::MissingProxy {
                side: Side::Src,
                ..
            }
        ));
        assert_eq!(task.state(), TaskState::Failed);
        assert!(task.add_commands(&mut recorder).is_err());
        assert!(recorder.is_empty());
    }

    #[test]
    fn instantiation_failure_fails_prepare() {
        let proxy = TextureProxy::new(desc());
        let mut task = CopyTextureToBufferTask::new(
            Some(proxy.clone()),
            Rect::new(0, 0, 64, 64),
            readback(64 * 64 * 4),
            0,
            256,
        );

        let err = task
            .prepare_resources(&BudgetedResourceProvider::new(1024))
            .unwrap_err();

        assert!(matches!(
            err,
            TaskError::Instantiate {
                side: Side::Src,
                source: InstantiateError::OutOfBudget { .. },
                ..
            }
        ));
        assert!(!proxy.is_instantiated());
    }

    #[test]
    fn records_resolved_texture() {
        let texture = Texture::new(desc());
        let buffer = readback(32 * 256);
        let mut task = CopyTextureToBufferTask::new(
            Some(TextureProxy::wrap(texture.clone())),
            Rect::new(8, 8, 32, 32),
            buffer.clone(),
            0,
            256,
        );
        let mut recorder = CommandRecorder::new();

        task.prepare_resources(&BudgetedResourceProvider::new(0))
            .unwrap();
        task.add_commands(&mut recorder).unwrap();

        match recorder.commands() {
            [CopyCommand::TextureToBuffer {
                texture: t,
                region,
                buffer: b,
                offset: 0,
                row_bytes: 256,
            }] => {
                assert!(t.ptr_eq(&texture));
                assert!(b.ptr_eq(&buffer));
                assert_eq!(*region, Rect::new(8, 8, 32, 32));
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn region_outside_texture_fails() {
        let mut task = CopyTextureToBufferTask::new(
            Some(TextureProxy::wrap(Texture::new(desc()))),
            Rect::new(32, 32, 64, 64),
            readback(1 << 20),
            0,
            256,
        );

        assert!(matches!(
            task.prepare_resources(&BudgetedResourceProvider::new(0)),
            Err(TaskError::RegionOutOfBounds {
                side: Side::Src,
                ..
            })
        ));
    }

    #[test]
    fn row_stride_and_buffer_size_are_checked() {
        let proxy = TextureProxy::wrap(Texture::new(desc()));
        let provider = BudgetedResourceProvider::new(0);

        let mut narrow = CopyTextureToBufferTask::new(
            Some(proxy.clone()),
            Rect::new(0, 0, 64, 1),
            readback(1024),
            0,
            255,
        );
        assert!(matches!(
            narrow.prepare_resources(&provider),
            Err(TaskError::RowBytesTooSmall {
                min_row_bytes: 256,
                ..
            })
        ));

        // offset 16 + 3 full rows + one tight row
        let mut short = CopyTextureToBufferTask::new(
            Some(proxy.clone()),
            Rect::new(0, 0, 16, 4),
            readback(16 + 3 * 128 + 63),
            16,
            128,
        );
        assert!(matches!(
            short.prepare_resources(&provider),
            Err(TaskError::BufferTooSmall {
                required: 464,
                size: 463,
                ..
            })
        ));

        let mut exact = CopyTextureToBufferTask::new(
            Some(proxy),
            Rect::new(0, 0, 16, 4),
            readback(16 + 3 * 128 + 64),
            16,
            128,
        );
        exact.prepare_resources(&provider).unwrap();
    }
}
