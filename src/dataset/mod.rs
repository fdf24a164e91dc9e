pub mod builder;
pub mod frame;
pub mod store;

pub use builder::{generate_dataset, DatasetBuilder};
pub use frame::{Body, Frame, FrameFile};
pub use store::PoseDataset;
