pub mod clock;
pub mod dht;
pub mod pipeline;
pub mod sitewise;
