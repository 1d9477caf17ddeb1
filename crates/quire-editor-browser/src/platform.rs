//! Platform detection for browser-specific behaviour.
//!
//! Only the answers the editor actually uses are detected: whether the
//! command key stands in for Ctrl, and whether this is a touch device.

use std::sync::OnceLock;

/// Cached platform detection results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    pub ios: bool,
    pub mac: bool,
    pub android: bool,
    pub mobile: bool,
}

impl Platform {
    /// Apple platforms map the `ctrlKey` shortcut modifier onto the command key.
    pub fn uses_command_key(&self) -> bool {
        self.mac || self.ios
    }

    /// Detect from a user agent and `navigator.platform` string.
    pub fn from_strings(user_agent: &str, platform: &str, touch_points: i32) -> Self {
        let user_agent = user_agent.to_lowercase();
        let platform = platform.to_lowercase();

        // iOS detection: iPhone/iPad/iPod in UA, or Mac platform with touch
        let ios = user_agent.contains("iphone")
            || user_agent.contains("ipad")
            || user_agent.contains("ipod")
            || (platform.contains("mac") && touch_points > 0);
        let mac = platform.contains("mac") && !ios;
        let android = user_agent.contains("android");
        let mobile = ios || android || user_agent.contains("mobile");

        Self {
            ios,
            mac,
            android,
            mobile,
        }
    }
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

/// Get cached platform info. Detection runs once on first call.
pub fn platform() -> &'static Platform {
    PLATFORM.get_or_init(detect_platform)
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
fn detect_platform() -> Platform {
    let Some(window) = web_sys::window() else {
        return Platform::default();
    };
    let navigator = window.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default();
    let platform = navigator.platform().unwrap_or_default();
    let detected = Platform::from_strings(&user_agent, &platform, navigator.max_touch_points());
    tracing::debug!(?detected, "platform detected");
    detected
}

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
fn detect_platform() -> Platform {
    Platform::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_mac() {
        let p = Platform::from_strings(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15",
            "MacIntel",
            0,
        );
        assert!(p.mac);
        assert!(!p.ios);
        assert!(p.uses_command_key());
    }

    #[test]
    fn test_ipad_reports_as_mac_with_touch() {
        let p = Platform::from_strings("Mozilla/5.0 (Macintosh)", "MacIntel", 5);
        assert!(p.ios);
        assert!(!p.mac);
        assert!(p.mobile);
    }

    #[test]
    fn test_linux_uses_ctrl() {
        let p = Platform::from_strings("Mozilla/5.0 (X11; Linux x86_64)", "Linux x86_64", 0);
        assert_eq!(p, Platform::default());
        assert!(!p.uses_command_key());
    }
}
