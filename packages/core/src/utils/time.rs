// Время

/// Текущее время, секунды с эпохи Unix (UTC)
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
