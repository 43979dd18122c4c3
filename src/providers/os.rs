use super::{HostOs, OsProvider};

/// Reports the OS this binary was compiled for
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOs;

impl OsProvider for SystemOs {
    fn os(&self) -> HostOs {
        if cfg!(target_os = "windows") {
            HostOs::Windows
        } else if cfg!(target_os = "macos") {
            HostOs::Mac
        } else {
            HostOs::Linux
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_store_support() {
        assert!(HostOs::Windows.has_trust_store());
        assert!(HostOs::Mac.has_trust_store());
        assert!(!HostOs::Linux.has_trust_store());
        assert!(HostOs::Windows.is_windows());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_host_has_no_trust_store() {
        assert_eq!(SystemOs.os(), HostOs::Linux);
    }
}
