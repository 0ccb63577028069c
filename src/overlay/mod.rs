//! Overlay lifecycle: activation state, the positioning surface and the
//! scoped side effects (focus trap, scroll lock, target elevation) it owns.

pub mod focus_trap;
pub mod guards;
pub mod scroll_lock;
pub mod state;
pub mod surface;

pub use focus_trap::{FocusDirection, FocusTrap};
pub use guards::{Elevation, Timer};
pub use scroll_lock::ScrollLock;
pub use state::{Activation, DismissHandler, OverlayContext, require};
pub use surface::{OverlaySurface, Phase, SurfaceInput};
