//! Host resource probing

use std::fs;

use crate::registry::GB;

/// Assumed capacity when the host memory cannot be determined
const FALLBACK_MEMORY: u64 = 8 * GB;

/// Available system memory in bytes.
///
/// Reads `MemAvailable` from /proc/meminfo, falling back to `MemTotal` and
/// finally to a conservative 8 GiB on hosts without a readable meminfo.
pub fn available_memory() -> u64 {
    let Ok(meminfo) = fs::read_to_string("/proc/meminfo") else {
        return FALLBACK_MEMORY;
    };

    parse_meminfo_kb(&meminfo, "MemAvailable")
        .or_else(|| parse_meminfo_kb(&meminfo, "MemTotal"))
        .map_or(FALLBACK_MEMORY, |kb| kb * 1024)
}

fn parse_meminfo_kb(meminfo: &str, field: &str) -> Option<u64> {
    meminfo
        .lines()
        .find(|line| line.starts_with(field))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse().ok())
}

/// Human-readable byte count with one decimal, e.g. "6.0 GB"
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}
