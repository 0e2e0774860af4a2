//! Device and environment probes
//!
//! Resolves static host information (platform string, touch points, the
//! OS tablet-mode media feature) into a [`DeviceClass`] and a tablet-mode
//! posture. Anything the host does not report falls back to the most
//! conservative value: desktop, not touch-capable, not in tablet mode.

use crate::modality::DeviceClass;

/// Platform-string fragments only phones send
const MOBILE_MARKERS: [&str; 8] = [
    "mobi",
    "iphone",
    "ipod",
    "windows phone",
    "blackberry",
    "opera mini",
    "iemobile",
    "webos",
];

/// Platform-string fragments tablets send
const TABLET_MARKERS: [&str; 6] = ["ipad", "tablet", "kindle", "silk", "playbook", "nexus 7"];

/// Desktop platform strings that some tablets report (iPadOS identifies as
/// a Mac unless touch points give it away)
const MASQUERADING_DESKTOP_MARKERS: [&str; 1] = ["macintosh"];

/// Read-only host capabilities, queried on demand
pub trait EnvironmentProbe {
    /// User-agent or platform string
    fn platform_hint(&self) -> Option<&str>;

    /// Maximum simultaneous touch points the host supports
    fn max_touch_points(&self) -> Option<u32>;

    /// Explicit touch capability, when the host reports it directly
    fn touch_capable(&self) -> Option<bool>;

    /// Result of the OS-level tablet-mode media query
    fn tablet_mode_media(&self) -> Option<bool>;
}

/// Probe answering from fixed values, typically loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticProbe {
    pub platform: Option<String>,
    pub max_touch_points: Option<u32>,
    pub touch_capable: Option<bool>,
    pub tablet_mode_media: Option<bool>,
}

impl EnvironmentProbe for StaticProbe {
    fn platform_hint(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    fn max_touch_points(&self) -> Option<u32> {
        self.max_touch_points
    }

    fn touch_capable(&self) -> Option<bool> {
        self.touch_capable
    }

    fn tablet_mode_media(&self) -> Option<bool> {
        self.tablet_mode_media
    }
}

/// Static inputs to [`detect_device_class`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformHints<'a> {
    pub platform: Option<&'a str>,
    pub max_touch_points: Option<u32>,
}

/// Derive the device class from the platform string and touch-point count
pub fn detect_device_class(hints: PlatformHints<'_>) -> DeviceClass {
    let Some(platform) = hints.platform else {
        return DeviceClass::Desktop;
    };
    let platform = platform.to_ascii_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| platform.contains(m));

    let mobile = has(&MOBILE_MARKERS[..]);
    // Android tablets drop the "Mobile" token that Android phones carry.
    let tablet = has(&TABLET_MARKERS[..]) || (platform.contains("android") && !mobile);
    let touch_points = hints.max_touch_points.unwrap_or(0);

    if mobile && !tablet {
        DeviceClass::Mobile
    } else if tablet || (touch_points > 1 && has(&MASQUERADING_DESKTOP_MARKERS[..])) {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    }
}

/// Whether touch input should be read as a convertible folded into tablet
/// posture rather than a plain touchscreen
pub fn is_tablet_mode_posture(
    device_class: DeviceClass,
    touch_capable: bool,
    tablet_mode_media: bool,
) -> bool {
    tablet_mode_media || (device_class.is_handheld() && touch_capable)
}

/// Resolved environment context for one surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub device_class: DeviceClass,
    pub touch_capable: bool,
    pub tablet_mode_media: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            device_class: DeviceClass::Desktop,
            touch_capable: false,
            tablet_mode_media: false,
        }
    }
}

impl Environment {
    /// Query every probe once
    pub fn detect(probe: &dyn EnvironmentProbe) -> Self {
        let max_touch_points = probe.max_touch_points();
        let device_class = detect_device_class(PlatformHints {
            platform: probe.platform_hint(),
            max_touch_points,
        });
        let touch_capable = probe
            .touch_capable()
            .unwrap_or_else(|| max_touch_points.map_or(false, |n| n > 0));

        Self {
            device_class,
            touch_capable,
            tablet_mode_media: probe.tablet_mode_media().unwrap_or(false),
        }
    }

    pub fn tablet_mode(&self) -> bool {
        is_tablet_mode_posture(self.device_class, self.touch_capable, self.tablet_mode_media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
    const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Chrome/120.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) Chrome/120.0 Safari/537.36";
    const IPAD_DESKTOP_MODE: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15";
    const WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0 Safari/537.36";

    fn class_of(platform: &str, touch_points: u32) -> DeviceClass {
        detect_device_class(PlatformHints {
            platform: Some(platform),
            max_touch_points: Some(touch_points),
        })
    }

    #[test]
    fn test_phones_are_mobile() {
        assert_eq!(class_of(IPHONE, 5), DeviceClass::Mobile);
        assert_eq!(class_of(ANDROID_PHONE, 5), DeviceClass::Mobile);
    }

    #[test]
    fn test_tablets() {
        assert_eq!(class_of(ANDROID_TABLET, 10), DeviceClass::Tablet);
        assert_eq!(class_of("Mozilla/5.0 (iPad; CPU OS 12_0) Mobile/15E148", 5), DeviceClass::Tablet);
    }

    #[test]
    fn test_touch_enabled_mac_signature_is_tablet() {
        assert_eq!(class_of(IPAD_DESKTOP_MODE, 5), DeviceClass::Tablet);
        assert_eq!(class_of(IPAD_DESKTOP_MODE, 0), DeviceClass::Desktop);
    }

    #[test]
    fn test_desktop_and_absent_hints() {
        assert_eq!(class_of(WINDOWS, 10), DeviceClass::Desktop);
        assert_eq!(detect_device_class(PlatformHints::default()), DeviceClass::Desktop);
    }

    #[test]
    fn test_tablet_mode_posture() {
        assert!(is_tablet_mode_posture(DeviceClass::Desktop, false, true));
        assert!(is_tablet_mode_posture(DeviceClass::Mobile, true, false));
        assert!(!is_tablet_mode_posture(DeviceClass::Mobile, false, false));
        assert!(!is_tablet_mode_posture(DeviceClass::Desktop, true, false));
        assert!(!is_tablet_mode_posture(DeviceClass::Unknown, true, false));
    }

    #[test]
    fn test_environment_conservative_fallback() {
        let env = Environment::detect(&StaticProbe::default());
        assert_eq!(env, Environment::default());
        assert!(!env.tablet_mode());
    }

    #[test]
    fn test_environment_touch_from_touch_points() {
        let probe = StaticProbe {
            platform: Some(IPHONE.to_string()),
            max_touch_points: Some(5),
            ..Default::default()
        };
        let env = Environment::detect(&probe);
        assert_eq!(env.device_class, DeviceClass::Mobile);
        assert!(env.touch_capable);
        assert!(env.tablet_mode());
    }
}
