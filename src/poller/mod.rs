pub mod device;
pub mod task;

pub use device::{Device, DeviceState};
pub use task::{spawn, PollPolicy, PollerHandle};
