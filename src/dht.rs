mod decoder;
mod family;
mod frame;
mod hal;
mod pin;
mod trace;

pub use decoder::*;
pub use family::*;
pub use frame::*;
pub use hal::*;
pub use pin::*;
pub use trace::*;
