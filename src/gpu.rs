// src/gpu.rs

use std::process::Command;

use tracing::debug;

use crate::data_structures::GpuInfo;
use crate::error::{MonitorError, Result};

const NVIDIA_SMI: &str = "nvidia-smi";
const QUERY: &str = "--query-gpu=name,memory.used,memory.total,utilization.gpu,temperature.gpu";

/// Lists NVIDIA GPUs. A host without `nvidia-smi` simply has no GPUs.
pub fn query_gpus() -> Vec<GpuInfo> {
    query_gpus_with(NVIDIA_SMI)
}

pub(crate) fn query_gpus_with(program: &str) -> Vec<GpuInfo> {
    let output = match Command::new(program)
        .args([QUERY, "--format=csv,noheader,nounits"])
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            debug!("{} unavailable: {}", program, e);
            return Vec::new();
        }
    };

    if !output.status.success() {
        debug!("{} exited with {}", program, output.status);
        return Vec::new();
    }

    match parse_nvidia_smi(&String::from_utf8_lossy(&output.stdout)) {
        Ok(gpus) => gpus,
        Err(e) => {
            debug!("{}", e);
            Vec::new()
        }
    }
}

pub fn parse_nvidia_smi(output: &str) -> Result<Vec<GpuInfo>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Result<GpuInfo> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 5 {
        return Err(MonitorError::GpuParse {
            line: line.to_string(),
            message: format!("expected 5 fields, got {}", fields.len()),
        });
    }

    Ok(GpuInfo {
        name: fields[0].to_string(),
        memory_used_mb: number(fields[1]).unwrap_or(0.0),
        memory_total_mb: number(fields[2]).unwrap_or(0.0),
        load: number(fields[3]).unwrap_or(0.0),
        temperature_c: number(fields[4]),
    })
}

// nvidia-smi prints "[N/A]" or "[Not Supported]" for unavailable readings.
fn number(field: &str) -> Option<f32> {
    field.parse::<f32>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows() {
        let out = "NVIDIA GeForce RTX 3060, 512, 12288, 7, 41\n\n\
                   Tesla T4, 0, 15360, [N/A], [N/A]\n";
        let gpus = parse_nvidia_smi(out).unwrap();
        assert_eq!(gpus.len(), 2);
        assert_eq!(gpus[0].name, "NVIDIA GeForce RTX 3060");
        assert_eq!(gpus[0].memory_total_mb, 12288.0);
        assert_eq!(gpus[0].temperature_c, Some(41.0));
        assert_eq!(gpus[1].load, 0.0);
        assert_eq!(gpus[1].temperature_c, None);
    }

    #[test]
    fn short_row_is_rejected() {
        let err = parse_nvidia_smi("GPU 0, 100").unwrap_err();
        assert!(matches!(err, MonitorError::GpuParse { .. }));
    }

    #[test]
    fn missing_binary_means_no_gpus() {
        assert!(query_gpus_with("/nonexistent/bin/nvidia-smi").is_empty());
    }

    #[test]
    fn failing_binary_means_no_gpus() {
        assert!(query_gpus_with("false").is_empty());
    }

    #[test]
    fn empty_output_means_no_gpus() {
        assert!(parse_nvidia_smi("").unwrap().is_empty());
    }
}
