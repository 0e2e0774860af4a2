//! Configuration loading and management
//!
//! Defaults are overridden by `MODALITY_*` environment variables. The
//! classifier thresholds are heuristic tuning constants and are all
//! overridable.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::classifier::StaticProbe;

/// Heuristic constants used by the classifier and the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Consecutive virtual-leaning key events that commit `VirtualKeyboard`
    pub virtual_evidence_threshold: u32,
    /// Inter-event gap below which a touch-capable device looks synthetic
    pub touch_burst_gap_ms: u64,
    /// Inter-key gap below which an ambiguous key joins a virtual burst
    pub fast_typing_gap_ms: u64,
    /// Quiet period after a blur before the virtual keyboard is released
    pub blur_debounce_ms: u64,
    /// Gap after which the recent event-source history is forgotten
    pub source_window_ms: u64,
    /// Virtual score required on desktop-class devices
    pub desktop_virtual_score: u32,
    /// Virtual score required on mobile and tablet devices
    pub handheld_virtual_score: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            virtual_evidence_threshold: 3,
            touch_burst_gap_ms: 20,
            fast_typing_gap_ms: 50,
            blur_debounce_ms: 500,
            source_window_ms: 1000,
            desktop_virtual_score: 2,
            handheld_virtual_score: 1,
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Trace file to read events from; stdin when unset
    pub input_path: Option<PathBuf>,

    /// Static environment probe values
    pub probe: StaticProbe,

    pub thresholds: Thresholds,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Thresholds::default();
        let parse_u64 = |key: &str, default: u64| -> Result<u64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid value for {key}: {raw:?}")),
                None => Ok(default),
            }
        };
        let parse_u32 = |key: &str, default: u32| -> Result<u32> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid value for {key}: {raw:?}")),
                None => Ok(default),
            }
        };
        let parse_bool = |key: &str| -> Result<Option<bool>> {
            lookup(key)
                .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                    "1" | "true" | "yes" | "on" => Ok(true),
                    "0" | "false" | "no" | "off" => Ok(false),
                    _ => Err(anyhow::anyhow!("invalid value for {key}: {raw:?}")),
                })
                .transpose()
        };

        let thresholds = Thresholds {
            virtual_evidence_threshold: parse_u32(
                "MODALITY_VIRTUAL_EVIDENCE_THRESHOLD",
                defaults.virtual_evidence_threshold,
            )?,
            touch_burst_gap_ms: parse_u64("MODALITY_TOUCH_BURST_GAP_MS", defaults.touch_burst_gap_ms)?,
            fast_typing_gap_ms: parse_u64("MODALITY_FAST_TYPING_GAP_MS", defaults.fast_typing_gap_ms)?,
            blur_debounce_ms: parse_u64("MODALITY_BLUR_DEBOUNCE_MS", defaults.blur_debounce_ms)?,
            source_window_ms: parse_u64("MODALITY_SOURCE_WINDOW_MS", defaults.source_window_ms)?,
            desktop_virtual_score: parse_u32(
                "MODALITY_DESKTOP_VIRTUAL_SCORE",
                defaults.desktop_virtual_score,
            )?,
            handheld_virtual_score: parse_u32(
                "MODALITY_HANDHELD_VIRTUAL_SCORE",
                defaults.handheld_virtual_score,
            )?,
        };

        let max_touch_points = lookup("MODALITY_MAX_TOUCH_POINTS")
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .with_context(|| format!("invalid value for MODALITY_MAX_TOUCH_POINTS: {raw:?}"))
            })
            .transpose()?;

        let probe = StaticProbe {
            platform: lookup("MODALITY_USER_AGENT").filter(|ua| !ua.trim().is_empty()),
            max_touch_points,
            touch_capable: parse_bool("MODALITY_TOUCH_CAPABLE")?,
            tablet_mode_media: parse_bool("MODALITY_TABLET_MODE")?,
        };

        Ok(Self {
            input_path: lookup("MODALITY_INPUT")
                .filter(|p| !p.trim().is_empty() && p != "-")
                .map(PathBuf::from),
            probe,
            thresholds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.thresholds, Thresholds::default());
        assert!(config.input_path.is_none());
        assert_eq!(config.probe, StaticProbe::default());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("MODALITY_BLUR_DEBOUNCE_MS", "250"),
            ("MODALITY_VIRTUAL_EVIDENCE_THRESHOLD", " 5 "),
            ("MODALITY_MAX_TOUCH_POINTS", "5"),
            ("MODALITY_TABLET_MODE", "yes"),
            ("MODALITY_USER_AGENT", "Mozilla/5.0 (iPhone)"),
            ("MODALITY_INPUT", "trace.jsonl"),
        ]))
        .unwrap();

        assert_eq!(config.thresholds.blur_debounce_ms, 250);
        assert_eq!(config.thresholds.virtual_evidence_threshold, 5);
        assert_eq!(config.thresholds.touch_burst_gap_ms, 20);
        assert_eq!(config.probe.max_touch_points, Some(5));
        assert_eq!(config.probe.tablet_mode_media, Some(true));
        assert_eq!(config.probe.touch_capable, None);
        assert_eq!(config.probe.platform.as_deref(), Some("Mozilla/5.0 (iPhone)"));
        assert_eq!(config.input_path, Some(PathBuf::from("trace.jsonl")));
    }

    #[test]
    fn test_stdin_marker() {
        let config = Config::from_lookup(lookup_from(&[("MODALITY_INPUT", "-")])).unwrap();
        assert!(config.input_path.is_none());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = Config::from_lookup(lookup_from(&[("MODALITY_FAST_TYPING_GAP_MS", "fast")]))
            .unwrap_err();
        assert!(err.to_string().contains("MODALITY_FAST_TYPING_GAP_MS"));

        assert!(Config::from_lookup(lookup_from(&[("MODALITY_TOUCH_CAPABLE", "maybe")])).is_err());
    }
}
