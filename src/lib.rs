pub mod graphics;

pub use graphics::{
    commands::{CommandBuffer, CommandRecorder, CopyCommand},
    error::{BackendError, InstantiateError, TaskError},
    provider::{BudgetedResourceProvider, ResourceProvider},
    resources::{Buffer, BufferDesc, Texture, TextureDesc, TextureProxy},
    tasks::{
        CopyBufferToBufferTask, CopyTextureToBufferTask, CopyTextureToTextureTask, Side, Task,
        TaskKind, TaskList, TaskState,
    },
    types::{BufferUsage, Point, Rect, TextureFormat},
};
