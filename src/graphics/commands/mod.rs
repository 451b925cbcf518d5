mod command_buffer;
mod recorder;

pub use command_buffer::*;
pub use recorder::*;
