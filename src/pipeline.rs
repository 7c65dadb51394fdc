mod collector;
mod queue;
mod uploader;

pub use collector::*;
pub use queue::*;
pub use uploader::*;
