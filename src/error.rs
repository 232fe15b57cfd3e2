// src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("process {pid} does not exist")]
    NoSuchProcess { pid: i32 },

    #[error("permission denied while signalling process {pid}")]
    PermissionDenied { pid: i32 },

    #[error("failed to signal process {pid}: {source}")]
    Signal { pid: i32, source: nix::Error },

    #[error("unsupported signal: {0}")]
    UnsupportedSignal(String),

    #[error("malformed nvidia-smi row `{line}`: {message}")]
    GpuParse { line: String, message: String },

    #[error("background sampler failed: {0}")]
    Worker(String),
}

impl MonitorError {
    /// Maps a `kill(2)` errno onto the variant the UI reports.
    pub fn from_kill(pid: i32, errno: nix::Error) -> Self {
        match errno {
            nix::errno::Errno::ESRCH => MonitorError::NoSuchProcess { pid },
            nix::errno::Errno::EPERM => MonitorError::PermissionDenied { pid },
            other => MonitorError::Signal { pid, source: other },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;

    #[test]
    fn kill_errno_mapping() {
        assert!(matches!(
            MonitorError::from_kill(7, Errno::ESRCH),
            MonitorError::NoSuchProcess { pid: 7 }
        ));
        assert!(matches!(
            MonitorError::from_kill(7, Errno::EPERM),
            MonitorError::PermissionDenied { pid: 7 }
        ));
        assert!(matches!(
            MonitorError::from_kill(7, Errno::EINVAL),
            MonitorError::Signal { pid: 7, .. }
        ));
    }

    #[test]
    fn messages_name_the_pid() {
        let msg = MonitorError::NoSuchProcess { pid: 4242 }.to_string();
        assert!(msg.contains("4242"));
    }
}
