// Display formatting shared by every panel
use chrono::{DateTime, Utc};

/// Formatting callable handed to the rendering sink for axis and tooltip text.
pub type Formatter = fn(f64) -> String;

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Axis formatter: `2_500_000 -> "2.5M"`, `1500 -> "1.5K"`, `999 -> "999"`.
pub fn format_compact(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value)
    }
}

/// Binary byte sizes with two decimals above one kilobyte.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} Bytes", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, BYTE_UNITS[unit])
}

/// Decimal size used by the size-chart tooltips.
pub fn format_size(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.2} MB", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.2} KB", value / 1_000.0)
    } else {
        format!("{} bytes", value)
    }
}

pub fn format_fee_rate(value: f64) -> String {
    format!("{:.2} sat/vB", value)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Rounds to an integer and groups thousands.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let grouped = format_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_btc(satoshis: u64) -> String {
    format!("{:.8} BTC", satoshis as f64 / 100_000_000.0)
}

pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);
    if seconds < 60 {
        return plural(seconds, "sec");
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "min");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }

    plural(hours / 24, "day")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {} ago", n, unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Keeps both ends of long hashes: `truncate_middle("abcdefghij", 7) == "ab...ij"`.
pub fn truncate_middle(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }

    let ellipsis = "...";
    let visible = max_len.saturating_sub(ellipsis.len());
    let front = visible.div_ceil(2);
    let back = visible / 2;

    let head: String = chars[..front].iter().collect();
    let tail: String = chars[chars.len() - back..].iter().collect();
    format!("{}{}{}", head, ellipsis, tail)
}

pub fn transaction_type_label(kind: u8) -> &'static str {
    match kind {
        1 => "Standard",
        2 => "SegWit",
        3 => "Taproot",
        4 => "Multisig",
        5 => "Lightning",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(999.0), "999");
        assert_eq!(format_compact(1500.0), "1.5K");
        assert_eq!(format_compact(2_500_000.0), "2.5M");
        assert_eq!(format_compact(12.5), "12.5");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(1_572_864), "1.50 MB");
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(45), now), "45 secs ago");
        assert_eq!(time_ago(now - Duration::seconds(1), now), "1 sec ago");
        assert_eq!(time_ago(now - Duration::seconds(90), now), "1 min ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2 days ago");
        assert_eq!(time_ago(now + Duration::seconds(5), now), "0 secs ago");
    }

    #[test]
    fn test_truncate_middle() {
        assert_eq!(truncate_middle("short", 20), "short");
        assert_eq!(truncate_middle("abcdefghij", 7), "ab...ij");
        assert_eq!(truncate_middle("0123456789abcdef0123", 10), "0123...123");
    }

    #[test]
    fn test_amount_and_count_formatting() {
        assert_eq!(format_btc(150_000_000), "1.50000000 BTC");
        assert_eq!(format_thousands(800_000), "800,000");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_count(1_234_567.4), "1,234,567");
        assert_eq!(format_fee_rate(12.346), "12.35 sat/vB");
        assert_eq!(format_percent(72.26), "72.3%");
        assert_eq!(format_size(1_500_000.0), "1.50 MB");
        assert_eq!(transaction_type_label(3), "Taproot");
        assert_eq!(transaction_type_label(42), "Unknown");
    }
}
