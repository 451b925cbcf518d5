use std::fmt;

use crate::graphics::{
    commands::CommandBuffer,
    error::{BackendError, TaskError},
    provider::ResourceProvider,
    resources::{Texture, TextureProxy},
};

/// Unit of deferred GPU work, prepared once and then recorded once.
pub trait Task: fmt::Debug + Send {
    fn kind(&self) -> TaskKind;

    fn state(&self) -> TaskState;

    /// Binds every resource the task refers to. A failed task can never be
    /// recorded.
    fn prepare_resources(&mut self, provider: &dyn ResourceProvider) -> Result<(), TaskError>;

    /// Emits the task's single backend command. Only valid after a
    /// successful [`Task::prepare_resources`].
    fn add_commands(&mut self, command_buffer: &mut dyn CommandBuffer) -> Result<(), TaskError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskState {
    Created,
    Prepared,
    Failed,
    Recorded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    BufferToBuffer,
    TextureToBuffer,
    TextureToTexture,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskKind::BufferToBuffer => "buffer-to-buffer copy",
            TaskKind::TextureToBuffer => "texture-to-buffer copy",
            TaskKind::TextureToTexture => "texture-to-texture copy",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Src,
    Dst,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Src => "src",
            Side::Dst => "dst",
        })
    }
}

/// State machine shared by the copy tasks.
#[derive(Debug)]
pub(super) struct Lifecycle {
    kind: TaskKind,
    state: TaskState,
}

impl Lifecycle {
    pub(super) fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            state: TaskState::Created,
        }
    }

    pub(super) fn state(&self) -> TaskState {
        self.state
    }

    pub(super) fn prepare(
        &mut self,
        prepare: impl FnOnce() -> Result<(), TaskError>,
    ) -> Result<(), TaskError> {
        self.ensure_state(TaskState::Created, "prepare")?;

        match prepare() {
            Ok(()) => {
                self.state = TaskState::Prepared;
                Ok(())
            }
            Err(err) => {
                self.state = TaskState::Failed;
                match err.side() {
                    Some(side) => tracing::error!(task = %self.kind, %side, "{err}"),
                    None => tracing::error!(task = %self.kind, "{err}"),
                }
                Err(err)
            }
        }
    }

    /// Runs `record` at most once; the task is terminal afterwards whatever
    /// the backend reports.
    pub(super) fn record(
        &mut self,
        record: impl FnOnce() -> Result<(), TaskError>,
    ) -> Result<(), TaskError> {
        self.ensure_state(TaskState::Prepared, "record")?;
        self.state = TaskState::Recorded;

        tracing::trace!(task = %self.kind, "adding commands");
        record()
    }

    fn ensure_state(&self, expected: TaskState, operation: &'static str) -> Result<(), TaskError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(TaskError::InvalidState {
                task: self.kind,
                state: self.state,
                operation,
            })
        }
    }
}

pub(super) fn instantiate_proxy(
    task: TaskKind,
    side: Side,
    proxy: Option<&TextureProxy>,
    provider: &dyn ResourceProvider,
) -> Result<Texture, TaskError> {
    let proxy = proxy.ok_or(TaskError::MissingProxy { task, side })?;

    proxy
        .instantiate(provider)
        .map_err(|source| TaskError::Instantiate { task, side, source })?;

    proxy.texture().ok_or(TaskError::Unresolved { task, side })
}

pub(super) fn resolved_texture(
    task: TaskKind,
    side: Side,
    proxy: Option<&TextureProxy>,
) -> Result<Texture, TaskError> {
    proxy
        .and_then(|proxy| proxy.texture())
        .ok_or(TaskError::Unresolved { task, side })
}

pub(super) fn backend_error(task: TaskKind) -> impl FnOnce(BackendError) -> TaskError {
    move |source| TaskError::Backend { task, source }
}
