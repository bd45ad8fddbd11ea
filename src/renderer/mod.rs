pub(crate) mod colours;
pub(crate) mod drawing;
pub mod fonts;
pub mod format;
pub mod surface;
pub mod widgets;

pub use surface::{Slot, Surface, SurfaceHandle};
