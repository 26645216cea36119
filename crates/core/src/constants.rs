use std::time::Duration;

/// Storage key holding the persisted self QR envelope
pub const SELF_QR_STORAGE_KEY: &str = "self_qr";

/// Storage key holding the cached tag map
pub const TAG_MAP_STORAGE_KEY: &str = "tag_map";

/// Self QR younger than this is NORMAL
pub const QR_OUTDATE_AFTER_SECS: i64 = 3 * 60;

/// Self QR at least this old is EXPIRE
pub const QR_EXPIRE_AFTER_SECS: i64 = 10 * 60;

/// Delay before the next automatic refresh after a successful fetch
pub const QR_REFRESH_INTERVAL: Duration = Duration::from_secs(2 * 60);

/// Delay before retrying after a failed fetch
pub const QR_RETRY_INTERVAL: Duration = Duration::from_secs(10);
