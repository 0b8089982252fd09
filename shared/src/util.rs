/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Parse a boolean flag the way the configuration screen stores it.
///
/// Accepts `true`, `1`, `si`, `yes` and `on` (case-insensitive); everything
/// else is `false`.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "si" | "sí" | "yes" | "on"
    )
}
