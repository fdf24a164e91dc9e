use tracing_subscriber::EnvFilter;

/// `RUST_LOG` が無ければこのクレートの info 以上を出す
const DEFAULT_DIRECTIVE: &str = "panoptic_pose_dataset=info";

/// tracing の購読者を初期化（バイナリの先頭で1回だけ呼ぶ）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
