//! src/memory/procfs.rs
//! procfs-backed memory readings (Linux); unavailable elsewhere

use crate::memory::MemorySampler;
use std::path::Path;

/// Reads this process's `VmRSS` from `/proc/self/status`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcSampler;

impl MemorySampler for ProcSampler {
    fn resident_mb(&self) -> Option<f64> {
        read_kib_field(Path::new("/proc/self/status"), "VmRSS:").map(kib_to_mb)
    }
}

/// Total system memory from `/proc/meminfo`, in MB.
#[must_use]
pub fn system_total_mb() -> Option<u64> {
    read_kib_field(Path::new("/proc/meminfo"), "MemTotal:").map(|kib| kib / 1024)
}

fn kib_to_mb(kib: u64) -> f64 {
    kib as f64 / 1024.0
}

fn read_kib_field(path: &Path, field: &str) -> Option<u64> {
    if !cfg!(target_os = "linux") {
        return None;
    }
    let content = std::fs::read_to_string(path).ok()?;
    parse_kib_field(&content, field)
}

/// Finds `field` (including its colon) and parses the `<n> kB` value after it.
fn parse_kib_field(content: &str, field: &str) -> Option<u64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix(field))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
}
