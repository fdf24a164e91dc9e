use crate::pose::JointIndex;

/// 上半身の骨格接続 (開始関節, 終了関節)
pub const UPPER_BODY_EDGES: [(JointIndex, JointIndex); 7] = [
    (JointIndex::Neck, JointIndex::Nose),
    // 左腕
    (JointIndex::Neck, JointIndex::LeftShoulder),
    (JointIndex::LeftShoulder, JointIndex::LeftElbow),
    (JointIndex::LeftElbow, JointIndex::LeftWrist),
    // 右腕
    (JointIndex::Neck, JointIndex::RightShoulder),
    (JointIndex::RightShoulder, JointIndex::RightElbow),
    (JointIndex::RightElbow, JointIndex::RightWrist),
];

/// 接続ごとの線の色 (RGB)
pub const EDGE_COLORS: [u32; 7] = [
    0x0000FF, // 青
    0x8B0000, // 暗赤
    0xFF0000, // 赤
    0xFFD700, // 金
    0x006400, // 暗緑
    0x008000, // 緑
    0x90EE90, // 薄緑
];

/// 背景色 (RGB)
pub const BACKGROUND_COLOR: u32 = 0xFFFFFF;

/// パネル枠の色 (RGB)
pub const FRAME_COLOR: u32 = 0xC0C0C0;
