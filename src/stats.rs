//! Mining statistics and the peak-memory probe
//!
//! The probe is advisory: its values never influence mining behavior.

use std::time::Duration;

/// Figures reported after a completed mining run
#[derive(Debug, Clone)]
pub struct MiningStats {
    /// Wall-clock time of the whole run
    pub elapsed: Duration,
    /// Number of closed patterns emitted
    pub pattern_count: usize,
    /// Best-effort peak resident memory, `None` where unavailable
    pub peak_memory_bytes: Option<u64>,
}

impl MiningStats {
    /// Print the statistics banner to stderr
    pub fn print_summary(&self) {
        eprintln!("=============  CERRADO - STATISTICS =============");
        eprintln!(" Total time ~ {} ms", self.elapsed.as_millis());
        eprintln!(
            " Closed sequential patterns count : {}",
            self.pattern_count
        );
        match self.peak_memory_bytes {
            Some(bytes) => eprintln!(
                " Max memory (mb) : {:.2}",
                bytes as f64 / (1024.0 * 1024.0)
            ),
            None => eprintln!(" Max memory : unavailable"),
        }
        eprintln!("=================================================");
    }
}

/// Peak resident set size of this process, read from `/proc/self/status`
/// (`VmHWM`, reported in kB). Returns `None` off Linux or on parse failure.
pub fn peak_rss_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmHWM:") {
            let kb: u64 = rest.trim().trim_end_matches("kB").trim().parse().ok()?;
            return Some(kb * 1024);
        }
    }
    None
}
