use crate::graphics::{
    commands::CommandBuffer, error::TaskError, provider::ResourceProvider,
};

use super::Task;

/// Ordered tasks walked front to back, prepare pass first.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Box<dyn Task>>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, task: impl Task + 'static) {
        self.tasks.push(Box::new(task));
    }

    pub fn add_boxed(&mut self, task: Box<dyn Task>) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Task> {
        self.tasks.iter().map(|task| task.as_ref())
    }

    /// Fails on the first task that cannot be prepared; the list should then
    /// be dropped without recording.
    pub fn prepare_resources(&mut self, provider: &dyn ResourceProvider) -> Result<(), TaskError> {
        tracing::trace!(tasks = self.tasks.len(), "preparing task list");

        self.tasks
            .iter_mut()
            .try_for_each(|task| task.prepare_resources(provider))
    }

    pub fn add_commands(&mut self, command_buffer: &mut dyn CommandBuffer) -> Result<(), TaskError> {
        tracing::trace!(tasks = self.tasks.len(), "recording task list");

        self.tasks
            .iter_mut()
            .try_for_each(|task| task.add_commands(&mut *command_buffer))
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
