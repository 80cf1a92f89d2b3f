// calx-core - Host capabilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Host capabilities consumed by the runtime.
//!
//! The runtime never touches the file system, environment or clock directly;
//! it goes through a [`Host`], so embedders and tests can swap in their own.

use std::time::{SystemTime, UNIX_EPOCH};

use calx_data::{Error, Result};

/// Capabilities the runtime needs from its environment.
pub trait Host: Send + Sync {
    /// Read the full contents of a named resource.
    fn read_resource(&self, name: &str) -> Result<Vec<u8>>;

    /// Replace the contents of a named resource.
    fn write_resource(&self, name: &str, bytes: &[u8]) -> Result<()>;

    fn env_var(&self, name: &str) -> Option<String>;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u128;

    fn exit(&self, code: i32) -> !;
}

/// [`Host`] backed by the process: files, environment and system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdHost;

impl Host for StdHost {
    fn read_resource(&self, name: &str) -> Result<Vec<u8>> {
        std::fs::read(name).map_err(|e| Error::Host(format!("read {name}: {e}")))
    }

    fn write_resource(&self, name: &str, bytes: &[u8]) -> Result<()> {
        std::fs::write(name, bytes).map_err(|e| Error::Host(format!("write {name}: {e}")))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn now_millis(&self) -> u128 {
        // A clock set before the epoch reads as zero.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }

    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_host_missing_file() {
        let err = StdHost
            .read_resource("/definitely/not/here.cirru")
            .unwrap_err();
        assert!(matches!(err, Error::Host(ref msg) if msg.contains("not/here.cirru")));
    }

    #[test]
    fn test_std_host_clock_moves_forward() {
        let a = StdHost.now_millis();
        let b = StdHost.now_millis();
        assert!(a > 0);
        assert!(b >= a);
    }
}
