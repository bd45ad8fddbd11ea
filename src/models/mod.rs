pub mod device;
pub mod reading;

pub use device::{Axis, DeviceKind, Frame, Metric};
pub use reading::Reading;
