// src/process_handler.rs

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use nix::ifaddrs::getifaddrs;
use nix::net::if_::InterfaceFlags;
use nix::sys::signal::{kill, Signal};
use nix::unistd::{Pid as NixPid, Uid, User};
use sysinfo::{
    CpuExt, DiskExt, NetworkExt, NetworksExt, Pid, PidExt, Process, ProcessExt, System, SystemExt,
};
use tracing::{debug, info};

use crate::data_structures::{
    CpuInfo, DiskInfo, MemoryInfo, NetworkInterface, ProcessInfo, SystemSnapshot,
};
use crate::error::{MonitorError, Result};
use crate::history::{UsageHistory, DEFAULT_HISTORY_LEN};
use crate::{gpu, sensors};

/// CPU usage is a delta between two refreshes; shorter gaps read as noise.
pub const CPU_SETTLE_INTERVAL: Duration = Duration::from_millis(250);

pub struct ProcessHandler {
    system: System,
    cpu_usage_history: UsageHistory,
    memory_usage_history: UsageHistory,
    cpu_model: String,
    user_names: HashMap<u32, String>,
}

impl ProcessHandler {
    pub fn new() -> Self {
        Self::with_history_len(DEFAULT_HISTORY_LEN)
    }

    pub fn with_history_len(history_len: usize) -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        let cpu_model = sensors::cpu_model(&system);
        debug!("cpu model: {}", cpu_model);
        Self {
            system,
            cpu_usage_history: UsageHistory::new(history_len),
            memory_usage_history: UsageHistory::new(history_len),
            cpu_model,
            user_names: HashMap::new(),
        }
    }

    /// Refreshes every source and records one history sample.
    pub fn refresh(&mut self) {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.system.refresh_disks_list();
        self.system.refresh_networks_list();
        self.system.refresh_components();
        self.system.refresh_processes();

        // Update usage history
        let cpu_usage = self.system.global_cpu_info().cpu_usage();
        self.cpu_usage_history.push(cpu_usage);
        self.memory_usage_history.push(self.memory().percent());
    }

    /// Takes a second CPU reading after a short pause so that usage
    /// figures are meaningful on a freshly created handler.
    pub fn settle(&mut self) {
        std::thread::sleep(CPU_SETTLE_INTERVAL);
        self.refresh();
    }

    pub fn get_cpu_usage_history(&self) -> Vec<f32> {
        self.cpu_usage_history.values().to_vec()
    }

    pub fn get_memory_usage_history(&self) -> Vec<f32> {
        self.memory_usage_history.values().to_vec()
    }

    pub fn cpu(&self) -> CpuInfo {
        let frequency = self
            .system
            .cpus()
            .first()
            .map(|cpu| cpu.frequency())
            .filter(|mhz| *mhz > 0);

        CpuInfo {
            model: self.cpu_model.clone(),
            physical_cores: self.system.physical_core_count(),
            logical_cores: self.system.cpus().len(),
            frequency_mhz: frequency,
            temperature_c: sensors::cpu_temperature(&self.system),
            load: self.system.global_cpu_info().cpu_usage(),
        }
    }

    pub fn memory(&self) -> MemoryInfo {
        MemoryInfo {
            total: self.system.total_memory(),
            used: self.system.used_memory(),
            available: self.system.available_memory(),
        }
    }

    pub fn disks(&self) -> Vec<DiskInfo> {
        self.system
            .disks()
            .iter()
            .filter(|disk| !disk.mount_point().as_os_str().is_empty())
            .map(|disk| {
                let total = disk.total_space();
                DiskInfo {
                    device: device_name(&disk.name().to_string_lossy()),
                    mount_point: disk.mount_point().display().to_string(),
                    total,
                    used: total.saturating_sub(disk.available_space()),
                }
            })
            .collect()
    }

    pub fn network(&self) -> Vec<NetworkInterface> {
        let mut interfaces: HashMap<String, NetworkInterface> = self
            .system
            .networks()
            .iter()
            .map(|(name, data)| {
                (
                    name.clone(),
                    NetworkInterface {
                        name: name.clone(),
                        addresses: Vec::new(),
                        is_up: false,
                        bytes_sent: data.total_transmitted(),
                        bytes_received: data.total_received(),
                    },
                )
            })
            .collect();

        match getifaddrs() {
            Ok(addrs) => {
                for ifaddr in addrs {
                    let entry = interfaces
                        .entry(ifaddr.interface_name.clone())
                        .or_insert_with(|| NetworkInterface {
                            name: ifaddr.interface_name.clone(),
                            addresses: Vec::new(),
                            is_up: false,
                            bytes_sent: 0,
                            bytes_received: 0,
                        });
                    entry.is_up |= ifaddr.flags.contains(InterfaceFlags::IFF_UP);

                    let ip = ifaddr.address.as_ref().and_then(|addr| {
                        if let Some(v4) = addr.as_sockaddr_in() {
                            Some(IpAddr::V4(Ipv4Addr::from(v4.ip())))
                        } else {
                            addr.as_sockaddr_in6().map(|v6| IpAddr::V6(v6.ip()))
                        }
                    });
                    if let Some(ip) = ip {
                        let ip = ip.to_string();
                        if !entry.addresses.contains(&ip) {
                            entry.addresses.push(ip);
                        }
                    }
                }
            }
            Err(e) => debug!("getifaddrs failed: {}", e),
        }

        let mut interfaces: Vec<NetworkInterface> = interfaces.into_values().collect();
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        interfaces
    }

    pub fn refresh_processes(&mut self) -> Vec<ProcessInfo> {
        self.system.refresh_processes();
        self.processes()
    }

    pub fn processes(&mut self) -> Vec<ProcessInfo> {
        let Self {
            system, user_names, ..
        } = self;
        system
            .processes()
            .iter()
            .filter(|(_, process)| !process.name().is_empty())
            .map(|(pid, process)| to_info(*pid, process, user_names))
            .collect()
    }

    /// Looks up a single process, refreshing only that entry.
    pub fn process(&mut self, pid: i32) -> Option<ProcessInfo> {
        let sys_pid = Pid::from_u32(u32::try_from(pid).ok()?);
        if !self.system.refresh_process(sys_pid) {
            return None;
        }
        let Self {
            system, user_names, ..
        } = self;
        system
            .process(sys_pid)
            .map(|process| to_info(sys_pid, process, user_names))
    }

    pub fn snapshot(&mut self) -> SystemSnapshot {
        SystemSnapshot {
            cpu: self.cpu(),
            gpus: gpu::query_gpus(),
            memory: self.memory(),
            disks: self.disks(),
            processes: self.processes(),
            network: self.network(),
            cpu_history: self.get_cpu_usage_history(),
            memory_history: self.get_memory_usage_history(),
        }
    }

    /// Refresh followed by a full snapshot.
    pub fn sample(&mut self) -> SystemSnapshot {
        self.refresh();
        self.snapshot()
    }

    pub fn kill_process(pid: i32, signal: Signal) -> Result<()> {
        // kill(2) treats 0 and negative PIDs as process groups.
        if pid <= 0 {
            return Err(MonitorError::NoSuchProcess { pid });
        }
        match kill(NixPid::from_raw(pid), signal) {
            Ok(_) => {
                info!("sent {} to pid {}", signal, pid);
                Ok(())
            }
            Err(e) => Err(MonitorError::from_kill(pid, e)),
        }
    }
}

impl Default for ProcessHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_signal(name: &str) -> Result<Signal> {
    let upper = name.trim().to_uppercase();
    let full = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };
    match full.as_str() {
        "SIGTERM" => Ok(Signal::SIGTERM),
        "SIGKILL" => Ok(Signal::SIGKILL),
        "SIGHUP" => Ok(Signal::SIGHUP),
        "SIGINT" => Ok(Signal::SIGINT),
        _ => Err(MonitorError::UnsupportedSignal(name.to_string())),
    }
}

/// "/dev/nvme0n1p2" is shown as "nvme0n1p2".
pub fn device_name(raw: &str) -> String {
    Path::new(raw)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw.to_string())
}

fn to_info(pid: Pid, process: &Process, user_names: &mut HashMap<u32, String>) -> ProcessInfo {
    ProcessInfo {
        pid: pid.as_u32() as i32,
        user: process
            .user_id()
            .map(|uid| user_name(**uid, user_names))
            .unwrap_or_else(|| "Unknown".into()),
        cpu_usage: process.cpu_usage(),
        memory_usage: process.memory(),
        command: process.name().to_string(),
    }
}

fn user_name(uid: u32, cache: &mut HashMap<u32, String>) -> String {
    cache
        .entry(uid)
        .or_insert_with(|| match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => user.name,
            _ => uid.to_string(),
        })
        .clone()
}
