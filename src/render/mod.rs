pub mod canvas;
pub mod review;
pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

pub use canvas::{Canvas, Panel, ViewCamera};
pub use review::{draw_review, pick_samples};
pub use skeleton::{EDGE_COLORS, UPPER_BODY_EDGES};
#[cfg(feature = "desktop")]
pub use minifb::Key;
#[cfg(feature = "desktop")]
pub use window::MinifbViewer;
