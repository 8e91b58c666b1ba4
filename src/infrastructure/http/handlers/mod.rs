//! HTTP Handlers

mod ping;
mod podcast;
mod upload;

pub use ping::*;
pub use podcast::*;
pub use upload::*;
