use glam::UVec2;
use thiserror::Error;

use super::{
    tasks::{Side, TaskKind, TaskState},
    types::Rect,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum InstantiateError {
    #[error("texture needs {requested} bytes but only {available} remain in the budget")]
    OutOfBudget { requested: u64, available: u64 },
    #[error("lazy instantiation callback produced no texture")]
    LazyCallbackFailed,
    #[error("lazy instantiation callback was already consumed")]
    CallbackConsumed,
    #[error("resource provider rejected the texture: {0}")]
    Rejected(String),
    #[error(
        "instantiated texture is {}x{} but the proxy expects {}x{}",
        .actual.x, .actual.y, .expected.x, .expected.y
    )]
    DescMismatch { expected: UVec2, actual: UVec2 },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend rejected the copy: {reason}")]
    Rejected { reason: String },
    #[error("command buffer is full ({capacity} commands)")]
    OutOfCommandSpace { capacity: usize },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    #[error("no {side} texture proxy specified for {task}")]
    MissingProxy { task: TaskKind, side: Side },
    #[error("could not instantiate {side} texture proxy for {task}")]
    Instantiate {
        task: TaskKind,
        side: Side,
        #[source]
        source: InstantiateError,
    },
    #[error("{side} texture proxy of {task} is not instantiated")]
    Unresolved { task: TaskKind, side: Side },
    #[error("{side} region {region} of {task} exceeds texture bounds {}x{}", .dimensions.x, .dimensions.y)]
    RegionOutOfBounds {
        task: TaskKind,
        side: Side,
        region: Rect,
        dimensions: UVec2,
    },
    #[error("{task} needs {required} bytes of destination buffer, it has {size}")]
    BufferTooSmall { task: TaskKind, required: u64, size: u64 },
    #[error("{task} row stride {row_bytes} is below the {min_row_bytes} bytes a row needs")]
    RowBytesTooSmall {
        task: TaskKind,
        row_bytes: u64,
        min_row_bytes: u64,
    },
    #[error("cannot {operation} {task} in state {state:?}")]
    InvalidState {
        task: TaskKind,
        state: TaskState,
        operation: &'static str,
    },
    #[error("backend failed to encode {task}")]
    Backend {
        task: TaskKind,
        #[source]
        source: BackendError,
    },
}

impl TaskError {
    pub fn task(&self) -> TaskKind {
        match self {
            TaskError::MissingProxy { task, .. }
            | TaskError::Instantiate { task, .. }
            | TaskError::Unresolved { task, .. }
            | TaskError::RegionOutOfBounds { task, .. }
            | TaskError::BufferTooSmall { task, .. }
            | TaskError::RowBytesTooSmall { task, .. }
            | TaskError::InvalidState { task, .. }
            | TaskError::Backend { task, .. } => *task,
        }
    }

    /// The side of the copy the failure is attributed to, when there is one.
    pub fn side(&self) -> Option<Side> {
        match self {
            TaskError::MissingProxy { side, .. }
            | TaskError::Instantiate { side, .. }
            | TaskError::Unresolved { side, .. }
            | TaskError::RegionOutOfBounds { side, .. } => Some(*side),
            TaskError::BufferTooSmall { .. } | TaskError::RowBytesTooSmall { .. } => {
                Some(Side::Dst)
            }
            TaskError::InvalidState { .. } | TaskError::Backend { .. } => None,
        }
    }
}
