// src/sensors.rs

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::{ComponentExt, CpuExt, System, SystemExt};

const CPUINFO: &str = "/proc/cpuinfo";
const THERMAL_ROOT: &str = "/sys/class/thermal";

pub fn clean_model(raw: &str) -> String {
    raw.replace("(R)", "")
        .replace("(TM)", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn model_from_cpuinfo(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("model name"))
        .find_map(|line| line.split_once(':').map(|(_, v)| clean_model(v)))
        .filter(|model| !model.is_empty())
}

pub fn cpu_model(system: &System) -> String {
    if let Some(model) = fs::read_to_string(CPUINFO)
        .ok()
        .and_then(|text| model_from_cpuinfo(&text))
    {
        return model;
    }

    system
        .cpus()
        .first()
        .map(|cpu| clean_model(cpu.brand()))
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Thermal zones report millidegrees Celsius.
pub fn parse_millidegrees(text: &str) -> Option<f32> {
    text.trim().parse::<i64>().ok().map(|m| m as f32 / 1000.0)
}

pub fn cpu_temperature(system: &System) -> Option<f32> {
    thermal_zone_temperature(Path::new(THERMAL_ROOT)).or_else(|| {
        system
            .components()
            .iter()
            .map(|c| c.temperature())
            .filter(|t| t.is_finite() && *t > 0.0)
            .reduce(f32::max)
    })
}

pub(crate) fn thermal_zone_temperature(root: &Path) -> Option<f32> {
    let mut zones: Vec<PathBuf> = fs::read_dir(root)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("thermal_zone"))
        })
        .collect();
    zones.sort();

    zones
        .iter()
        .find_map(|zone| {
            fs::read_to_string(zone.join("temp"))
                .ok()
                .and_then(|text| parse_millidegrees(&text))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "processor\t: 0\n\
vendor_id\t: GenuineIntel\n\
model name\t: Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz\n\
processor\t: 1\n\
model name\t: Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz\n";

    #[test]
    fn model_name_is_cleaned() {
        assert_eq!(
            model_from_cpuinfo(SAMPLE).as_deref(),
            Some("Intel Core i7-8650U CPU @ 1.90GHz")
        );
        assert_eq!(model_from_cpuinfo("processor : 0\n"), None);
    }

    #[test]
    fn millidegrees() {
        assert_eq!(parse_millidegrees("45000\n"), Some(45.0));
        assert_eq!(parse_millidegrees("garbage"), None);
    }

    fn write_zone(root: &Path, zone: &str, temp: &str) {
        fs::create_dir_all(root.join(zone)).unwrap();
        fs::write(root.join(zone).join("temp"), temp).unwrap();
    }

    #[test]
    fn first_thermal_zone_wins() {
        let root = tempfile::tempdir().unwrap();
        write_zone(root.path(), "thermal_zone1", "60000");
        write_zone(root.path(), "thermal_zone0", "42500");
        fs::create_dir_all(root.path().join("cooling_device0")).unwrap();

        assert_eq!(thermal_zone_temperature(root.path()), Some(42.5));
    }

    #[test]
    fn unreadable_zone_falls_through_to_next() {
        let root = tempfile::tempdir().unwrap();
        write_zone(root.path(), "thermal_zone0", "N/A");
        write_zone(root.path(), "thermal_zone1", "51000");

        assert_eq!(thermal_zone_temperature(root.path()), Some(51.0));
    }

    #[test]
    fn missing_thermal_root() {
        assert_eq!(thermal_zone_temperature(Path::new("/nonexistent/thermal")), None);
    }
}
