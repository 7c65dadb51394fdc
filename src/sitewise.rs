mod batch;
mod channel;
mod encoder;
mod endpoint;
mod reading;
mod signer;
mod transport;

pub use batch::*;
pub use channel::*;
pub use encoder::*;
pub use endpoint::*;
pub use reading::*;
pub use signer::*;
pub use transport::*;
