// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport configuration and the settings it is loaded from.
//!
//! Settings are read through the small [`SettingsSource`] trait so hosts can
//! back them with whatever store they already have. [`MapSettings`] is an
//! in-memory source used by tests and simple hosts.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;

use hashbrown::HashMap;

use crate::error::ConfigError;

/// Settings group holding the viewport keys.
pub const APPEARANCE_GROUP: &str = "Appearance";
/// Key selecting the [`UcsApplyPolicy`] (`0`, `1` or `2`).
pub const UCS_APPLY_POLICY_KEY: &str = "UCSApplyPolicy";
/// Key enabling [`ViewportConfig::modify_on_zoom`].
pub const MODIFY_ON_VIEW_CHANGE_KEY: &str = "ModifyOnViewChange";

/// What the viewport does after switching to a different UCS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UcsApplyPolicy {
    /// Refit the document extents in the new frame.
    #[default]
    ZoomAuto,
    /// Keep the scale and pan so the UCS origin sits in the centre of the view.
    PanOriginCenter,
    /// Keep the scale and pan so the UCS origin sits at the lower-left corner.
    PanOriginLowerLeft,
}

impl UcsApplyPolicy {
    /// Maps the stored integer form to a policy.
    #[must_use]
    pub fn from_setting(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::ZoomAuto),
            1 => Some(Self::PanOriginCenter),
            2 => Some(Self::PanOriginLowerLeft),
            _ => None,
        }
    }
}

/// Read-only access to grouped key/value settings.
pub trait SettingsSource {
    /// Returns the raw value of `group/key`, or `None` if it is unset.
    fn value(&self, group: &str, key: &str) -> Option<&str>;
}

/// Policy knobs of a [`Viewport`](crate::Viewport).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Behaviour after a UCS switch.
    pub ucs_apply_policy: UcsApplyPolicy,
    /// Direction (radians, absolute) the user treats as angle zero.
    pub angles_base: f64,
    /// Whether user angles grow counter-clockwise.
    pub angles_counter_clockwise: bool,
    /// Whether saving a view marks the document modified.
    pub modify_on_zoom: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            ucs_apply_policy: UcsApplyPolicy::ZoomAuto,
            angles_base: 0.0,
            angles_counter_clockwise: true,
            modify_on_zoom: true,
        }
    }
}

impl ViewportConfig {
    /// Builds a configuration from defaults overlaid with `source`.
    pub fn from_settings(source: &dyn SettingsSource) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_settings(source)?;
        Ok(config)
    }

    /// Overwrites the fields for which `source` holds a value.
    ///
    /// On error `self` is left unchanged.
    pub fn apply_settings(&mut self, source: &dyn SettingsSource) -> Result<(), ConfigError> {
        let mut next = *self;
        if let Some(raw) = source.value(APPEARANCE_GROUP, UCS_APPLY_POLICY_KEY) {
            next.ucs_apply_policy = raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(UcsApplyPolicy::from_setting)
                .ok_or_else(|| invalid(APPEARANCE_GROUP, UCS_APPLY_POLICY_KEY, raw))?;
        }
        if let Some(raw) = source.value(APPEARANCE_GROUP, MODIFY_ON_VIEW_CHANGE_KEY) {
            next.modify_on_zoom = parse_bool(raw)
                .ok_or_else(|| invalid(APPEARANCE_GROUP, MODIFY_ON_VIEW_CHANGE_KEY, raw))?;
        }
        *self = next;
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "True" | "TRUE" => Some(true),
        "0" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn invalid(group: &str, key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        group: group.to_owned(),
        key: key.to_owned(),
        value: value.to_owned(),
    }
}

/// In-memory [`SettingsSource`].
#[derive(Clone, Debug, Default)]
pub struct MapSettings {
    values: HashMap<String, String>,
}

impl MapSettings {
    /// Creates an empty settings map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `group/key`, replacing any previous value.
    pub fn insert(&mut self, group: &str, key: &str, value: impl Into<String>) {
        self.values.insert(format!("{group}/{key}"), value.into());
    }

    /// Removes `group/key`.
    pub fn remove(&mut self, group: &str, key: &str) {
        self.values.remove(&format!("{group}/{key}"));
    }
}

impl SettingsSource for MapSettings {
    fn value(&self, group: &str, key: &str) -> Option<&str> {
        self.values.get(&format!("{group}/{key}")).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ViewportConfig::from_settings(&MapSettings::new()).unwrap();
        assert_eq!(config, ViewportConfig::default());
    }

    #[test]
    fn reads_policy_and_modify_flag() {
        let mut s = MapSettings::new();
        s.insert(APPEARANCE_GROUP, UCS_APPLY_POLICY_KEY, "2");
        s.insert(APPEARANCE_GROUP, MODIFY_ON_VIEW_CHANGE_KEY, "false");
        let config = ViewportConfig::from_settings(&s).unwrap();
        assert_eq!(config.ucs_apply_policy, UcsApplyPolicy::PanOriginLowerLeft);
        assert!(!config.modify_on_zoom);
    }

    #[test]
    fn bad_values_are_reported_and_leave_config_alone() {
        let mut s = MapSettings::new();
        s.insert(APPEARANCE_GROUP, MODIFY_ON_VIEW_CHANGE_KEY, "0");
        s.insert(APPEARANCE_GROUP, UCS_APPLY_POLICY_KEY, "7");
        let mut config = ViewportConfig::default();
        let err = config.apply_settings(&s).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                group: "Appearance".into(),
                key: "UCSApplyPolicy".into(),
                value: "7".into(),
            }
        );
        assert!(config.modify_on_zoom);

        s.remove(APPEARANCE_GROUP, UCS_APPLY_POLICY_KEY);
        config.apply_settings(&s).unwrap();
        assert!(!config.modify_on_zoom);
    }
}
