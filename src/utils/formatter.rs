/// 把字节数格式化为人类可读的字符串（1024 进制）
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "kB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// 毫秒数保留两位小数
pub fn format_ms(ms: f64) -> String {
    format!("{:.2}ms", ms)
}
