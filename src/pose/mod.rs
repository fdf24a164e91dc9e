pub mod joint;
pub mod normalize;
pub mod project;
pub mod rotate;

pub use joint::{
    joint_position, raw_joint, raw_skeleton_from_flat, shoulder_distance, Joint, JointIndex, RawSkeleton,
    Skeleton2d, Skeleton3d, RAW_VALUE_COUNT,
};
pub use normalize::{frontal_yaw, normalize_positions, normalize_skeleton};
pub use project::project_skeleton;
pub use rotate::{rotate_by_quaternion, rotate_skeleton};
