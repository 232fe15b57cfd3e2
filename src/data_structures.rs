// src/data_structures.rs

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CpuInfo {
    pub model: String,
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub frequency_mhz: Option<u64>,
    pub temperature_c: Option<f32>,
    pub load: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuInfo {
    pub name: String,
    pub memory_used_mb: f32,
    pub memory_total_mb: f32,
    pub load: f32,
    pub temperature_c: Option<f32>,
}

/// Physical memory, in bytes.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

impl MemoryInfo {
    pub fn percent(&self) -> f32 {
        percent_of(self.used, self.total)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskInfo {
    pub device: String,
    pub mount_point: String,
    pub total: u64,
    pub used: u64,
}

impl DiskInfo {
    pub fn free(&self) -> u64 {
        self.total.saturating_sub(self.used)
    }

    pub fn percent(&self) -> f32 {
        percent_of(self.used, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessInfo {
    pub pid: i32,
    pub user: String,
    pub cpu_usage: f32,
    /// Resident set size in bytes.
    pub memory_usage: u64,
    pub command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkInterface {
    pub name: String,
    pub addresses: Vec<String>,
    pub is_up: bool,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemSnapshot {
    pub cpu: CpuInfo,
    pub gpus: Vec<GpuInfo>,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskInfo>,
    pub processes: Vec<ProcessInfo>,
    pub network: Vec<NetworkInterface>,
    pub cpu_history: Vec<f32>,
    pub memory_history: Vec<f32>,
}

fn percent_of(part: u64, whole: u64) -> f32 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64 * 100.0) as f32
    }
}
