//! Feature gate: which features a user may reach, by tier and role.
//!
//! Rules come from the admin-settings blob. The editor core never consults
//! the gate itself; the host checks it before invoking gated operations.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const PLATFORM_VARIANTS: &str = "platformVariants";
pub const BACKGROUND_REMOVAL: &str = "backgroundRemoval";
pub const HD_EXPORT: &str = "hdExport";
pub const TEMPLATE_BINDING: &str = "templateBinding";
pub const SHAPE_MASKS: &str = "shapeMasks";

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("malformed feature settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Subscription tier, ordered from least to most entitled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

fn default_enabled() -> bool {
    true
}

/// Admin-configured switch for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRule {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub min_tier: Tier,
}

impl Default for FeatureRule {
    fn default() -> Self {
        Self { enabled: true, min_tier: Tier::Free }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsBlob {
    #[serde(default)]
    features: BTreeMap<String, FeatureRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureGate {
    rules: BTreeMap<String, FeatureRule>,
}

impl FeatureGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rule(mut self, feature: &str, rule: FeatureRule) -> Self {
        self.rules.insert(feature.to_owned(), rule);
        self
    }

    /// Parse the admin-settings blob: `{"features": {"<key>": {"enabled": .., "minTier": ..}}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not valid JSON of that shape.
    pub fn from_json(raw: &str) -> Result<Self, GateError> {
        let blob: SettingsBlob = serde_json::from_str(raw)?;
        Ok(Self { rules: blob.features })
    }

    #[must_use]
    pub fn rule(&self, feature: &str) -> Option<&FeatureRule> {
        self.rules.get(feature)
    }

    /// Admins reach every feature; features without a rule are on for
    /// everyone; otherwise the rule must be enabled and the tier high enough.
    #[must_use]
    pub fn is_enabled(&self, feature: &str, tier: Tier, role: Role) -> bool {
        if role == Role::Admin {
            return true;
        }
        match self.rules.get(feature) {
            None => true,
            Some(rule) => rule.enabled && tier >= rule.min_tier,
        }
    }
}
