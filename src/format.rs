// src/format.rs

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

pub fn gib(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / GIB)
}

/// Compact form used in the storage table.
pub fn gib_short(bytes: u64) -> String {
    format!("{:.1}G", bytes as f64 / GIB)
}

pub fn mib(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / MIB)
}

pub fn ghz(mhz: Option<u64>) -> String {
    match mhz {
        Some(mhz) if mhz > 0 => format!("{:.1} GHz", mhz as f64 / 1000.0),
        _ => "N/A".to_string(),
    }
}

pub fn celsius(temp: Option<f32>) -> String {
    temp.map(|t| format!("{t:.1}°C"))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn percent(value: f32) -> String {
    format!("{value:.1}%")
}

pub fn cores(physical: Option<usize>, logical: usize) -> String {
    match physical {
        Some(physical) => format!("{physical}/{logical}"),
        None => format!("?/{logical}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_units() {
        assert_eq!(gib(8 * 1024 * 1024 * 1024), "8.0 GB");
        assert_eq!(gib_short(3 * 1024 * 1024 * 1024 / 2), "1.5G");
        assert_eq!(mib(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
        assert_eq!(mib(0), "0.0 MB");
    }

    #[test]
    fn frequency_missing_or_zero_is_na() {
        assert_eq!(ghz(Some(3600)), "3.6 GHz");
        assert_eq!(ghz(Some(0)), "N/A");
        assert_eq!(ghz(None), "N/A");
    }

    #[test]
    fn temperature_and_cores() {
        assert_eq!(celsius(Some(47.0)), "47.0°C");
        assert_eq!(celsius(None), "N/A");
        assert_eq!(cores(Some(4), 8), "4/8");
        assert_eq!(cores(None, 8), "?/8");
    }
}
