mod buffer;
mod texture;
mod texture_proxy;

pub use buffer::*;
pub use texture::*;
pub use texture_proxy::*;
