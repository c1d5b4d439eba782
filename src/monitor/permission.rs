//! Input observation permission checks

/// Outcome of a permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    Granted,
    /// Denied, with a reason to show the user
    Denied(String),
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// Capability check queried before any capture source is installed
pub trait PermissionGate: Send + Sync {
    fn check(&self) -> Permission;
}

/// Gate for backends that need no special permission
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

impl PermissionGate for AlwaysGranted {
    fn check(&self) -> Permission {
        Permission::Granted
    }
}

/// Requires read access to at least one raw keyboard device
///
/// Only meaningful on Linux; elsewhere raw devices are not used and the
/// check always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceAccessGate;

impl PermissionGate for DeviceAccessGate {
    #[cfg(target_os = "linux")]
    fn check(&self) -> Permission {
        use crate::keyboard::{evdev_status, find_keyboard_devices};
        use std::fs::File;

        let readable = find_keyboard_devices()
            .map(|paths| paths.iter().any(|path| File::open(path).is_ok()))
            .unwrap_or(false);
        if readable {
            Permission::Granted
        } else {
            Permission::Denied(evdev_status())
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn check(&self) -> Permission {
        Permission::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_granted_grants() {
        assert!(AlwaysGranted.check().is_granted());
    }

    #[test]
    fn denied_is_not_granted() {
        assert!(!Permission::Denied("no access".to_string()).is_granted());
    }

    #[test]
    fn device_access_check_does_not_panic() {
        match DeviceAccessGate.check() {
            Permission::Granted => {}
            Permission::Denied(reason) => assert!(!reason.is_empty()),
        }
    }
}
