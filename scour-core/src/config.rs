//! Configuration management for `scour-core`.
//!
//! This module defines the core data structures for detection rules and the
//! sensitive-file list. It handles serialization/deserialization of YAML
//! catalogs and provides utilities for loading, merging, and validating them.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::bytes::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::errors::ScourError;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// The intent a detection rule carries. Categories only classify findings
/// for reporting; they never change how a rule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    ApiKey,
    Secret,
    Password,
    Token,
    CredentialedUrl,
    EnvAssignment,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            RuleCategory::ApiKey => "api_key",
            RuleCategory::Secret => "secret",
            RuleCategory::Password => "password",
            RuleCategory::Token => "token",
            RuleCategory::CredentialedUrl => "credentialed_url",
            RuleCategory::EnvAssignment => "env_assignment",
        };
        write!(f, "{}", s)
    }
}

/// Represents a single detection rule applied to historical content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionRule {
    /// Unique identifier for the rule (e.g., "aws_access_key").
    pub id: String,
    /// The regex pattern string, applied byte-for-byte to content.
    pub pattern: String,
    /// What kind of sensitive data the rule targets.
    pub category: RuleCategory,
    /// Human-readable description of what the rule matches.
    pub description: Option<String>,
    /// If false, the pattern is matched case-insensitively.
    pub case_sensitive: bool,
    /// If true, the rule is skipped for content detected as binary.
    pub text_only: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl Default for DetectionRule {
    fn default() -> Self {
        Self {
            id: String::new(),
            pattern: String::new(),
            category: RuleCategory::Secret,
            description: None,
            case_sensitive: false,
            text_only: false,
            enabled: None,
        }
    }
}

/// Represents the top-level catalog structure for scour.
///
/// The rule sequence is ordered: order decides reporting order and the order
/// of redaction passes, never which rules apply.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// An ordered list of detection rules.
    pub rules: Vec<DetectionRule>,
    /// Path globs whose matching files are deleted from every historical
    /// tree instead of redacted in place (e.g. ".env", "*.pem").
    pub sensitive_files: Vec<String>,
}

impl CatalogConfig {
    /// Loads a catalog from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom catalog from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let config: CatalogConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;

        validate_rules(&config.rules)?;
        info!(
            "Loaded {} rules and {} sensitive-file globs from {}.",
            config.rules.len(),
            config.sensitive_files.len(),
            path.display()
        );

        Ok(config)
    }

    /// Loads the default catalog from the embedded configuration.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default catalog from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: CatalogConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default catalog")?;

        debug!(
            "Loaded {} default rules and {} sensitive-file globs.",
            config.rules.len(),
            config.sensitive_files.len()
        );
        Ok(config)
    }

    /// Filters active rules based on enable/disable lists provided via CLI.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_ids: HashSet<&str> = self.rules.iter().map(|r| r.id.as_str()).collect();

        for rule_id in enable_set.difference(&all_rule_ids) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_id);
        }

        for rule_id in disable_set.difference(&all_rule_ids) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_id);
        }

        self.rules.retain(|rule| {
            let id = rule.id.as_str();
            if disable_set.contains(id) {
                return false;
            }
            if !enable_set.is_empty() {
                return enable_set.contains(id);
            }
            rule.enabled != Some(false)
        });

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }
}

/// Merges a user-defined catalog over the defaults.
///
/// Rules are keyed by id: a user rule replaces the default with the same id
/// in place, so the default pass order survives; unknown user rules are
/// appended after the defaults. A non-empty user sensitive-file list
/// replaces the default list wholesale.
pub fn merge_catalogs(
    default_config: CatalogConfig,
    user_config: Option<CatalogConfig>,
) -> CatalogConfig {
    debug!(
        "merge_catalogs called. Initial default rules count: {}",
        default_config.rules.len()
    );

    let Some(user_cfg) = user_config else {
        return default_config;
    };

    debug!("User catalog provided. Merging {} user rules.", user_cfg.rules.len());

    let mut merged = default_config.rules;
    for user_rule in user_cfg.rules {
        match merged.iter_mut().find(|r| r.id == user_rule.id) {
            Some(existing) => *existing = user_rule,
            None => merged.push(user_rule),
        }
    }

    let sensitive_files = if user_cfg.sensitive_files.is_empty() {
        default_config.sensitive_files
    } else {
        user_cfg.sensitive_files
    };

    debug!("Final total rules after merge: {}", merged.len());

    CatalogConfig {
        rules: merged,
        sensitive_files,
    }
}

/// Validates rule integrity (ids, patterns, regex compilation).
///
/// Every violation is fatal at load time; scanning never sees an invalid
/// rule.
fn validate_rules(rules: &[DetectionRule]) -> Result<()> {
    let mut rule_ids = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.id.is_empty() {
            errors.push("A rule has an empty `id` field.".to_string());
        } else if !rule_ids.insert(rule.id.clone()) {
            errors.push(format!("Duplicate rule id found: '{}'.", rule.id));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.id));
            continue;
        }

        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                rule.id,
                rule.pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        if let Err(e) = RegexBuilder::new(&rule.pattern)
            .case_insensitive(!rule.case_sensitive)
            .unicode(false)
            .build()
        {
            errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.id, e));
        }
    }

    if !errors.is_empty() {
        let full_error_message = errors.join("\n");
        Err(ScourError::InvalidRule("catalog".to_string(), full_error_message).into())
    } else {
        Ok(())
    }
}
