mod copy_buffer_to_buffer;
mod copy_texture_to_buffer;
mod copy_texture_to_texture;
mod task;
mod task_list;

pub use copy_buffer_to_buffer::*;
pub use copy_texture_to_buffer::*;
pub use copy_texture_to_texture::*;
pub use task::{Side, Task, TaskKind, TaskState};
pub use task_list::*;
