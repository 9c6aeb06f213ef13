//! catalog.rs - Compiles a `CatalogConfig` into matcher form.
//!
//! This module converts the declarative rule catalog into `CompiledCatalog`,
//! the immutable value threaded through the scanner and the rewriter. There
//! is no process-wide cache: callers own the compiled catalog and pass it
//! explicitly.
//!
//! License: MIT OR APACHE 2.0

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use regex::bytes::{Regex, RegexBuilder};
use std::path::Path;

use crate::config::{CatalogConfig, DetectionRule, RuleCategory, MAX_PATTERN_LENGTH};
use crate::errors::ScourError;

/// The fixed token substituted for every matched sensitive span.
pub const REDACTION_MARKER: &[u8] = b"***REMOVED***";

/// Represents a single compiled detection rule.
///
/// Patterns compile through the byte-level regex API with Unicode mode off,
/// so a rule applies to arbitrary blob content without assuming any text
/// encoding.
#[derive(Debug)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// The unique id of the detection rule.
    pub id: String,
    pub category: RuleCategory,
    /// Skip this rule for content detected as binary.
    pub text_only: bool,
}

/// The full compiled catalog: detection rules in pass order plus the
/// sensitive-path glob set.
#[derive(Debug)]
pub struct CompiledCatalog {
    /// Compiled rules, in catalog order.
    pub rules: Vec<CompiledRule>,
    sensitive_paths: GlobSet,
    sensitive_glob_count: usize,
}

impl CompiledCatalog {
    /// Compiles every enabled rule and every sensitive-file glob.
    ///
    /// Besides syntactic validity this enforces one semantic invariant: no
    /// pattern may match the redaction marker itself. That guarantee is what
    /// makes a second rewrite over already-redacted history a no-op.
    pub fn compile(config: &CatalogConfig) -> Result<Self, ScourError> {
        debug!("Starting compilation of {} rules.", config.rules.len());

        let mut compiled_rules = Vec::new();
        let mut compilation_errors = Vec::new();

        for rule in config.rules.iter().filter(|r| r.enabled != Some(false)) {
            match compile_rule(rule) {
                Ok(compiled) => compiled_rules.push(compiled),
                Err(e) => compilation_errors.push(e),
            }
        }

        if !compilation_errors.is_empty() {
            let error_message = compilation_errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<String>>()
                .join("\n");
            return Err(ScourError::CatalogCompilation(
                compilation_errors.len(),
                error_message,
            ));
        }

        let mut glob_builder = GlobSetBuilder::new();
        for glob in &config.sensitive_files {
            let compiled = Glob::new(glob).map_err(|e| {
                ScourError::InvalidRule(glob.clone(), format!("invalid path glob: {}", e))
            })?;
            glob_builder.add(compiled);
        }
        let sensitive_paths = glob_builder
            .build()
            .map_err(|e| ScourError::InvalidRule("sensitive_files".to_string(), e.to_string()))?;

        debug!(
            "Finished compiling catalog. Rules: {}, sensitive-file globs: {}.",
            compiled_rules.len(),
            config.sensitive_files.len()
        );

        Ok(CompiledCatalog {
            rules: compiled_rules,
            sensitive_paths,
            sensitive_glob_count: config.sensitive_files.len(),
        })
    }

    /// True when the repository-relative path names a sensitive file.
    ///
    /// A glob matches either the full path or the bare file name, so `.env`
    /// catches `service/.env` as well as the top-level one.
    pub fn is_sensitive_path(&self, path: &str) -> bool {
        if self.sensitive_glob_count == 0 {
            return false;
        }
        if self.sensitive_paths.is_match(path) {
            return true;
        }
        Path::new(path)
            .file_name()
            .map(|name| self.sensitive_paths.is_match(name))
            .unwrap_or(false)
    }

    pub fn sensitive_glob_count(&self) -> usize {
        self.sensitive_glob_count
    }
}

fn compile_rule(rule: &DetectionRule) -> Result<CompiledRule, ScourError> {
    debug!("Attempting to compile rule '{}'", &rule.id);

    if rule.pattern.is_empty() {
        return Err(ScourError::InvalidRule(
            rule.id.clone(),
            "pattern is empty".to_string(),
        ));
    }

    if rule.pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ScourError::PatternLengthExceeded(
            rule.id.clone(),
            rule.pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    let regex = RegexBuilder::new(&rule.pattern)
        .case_insensitive(!rule.case_sensitive)
        .unicode(false)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| ScourError::RuleCompilation(rule.id.clone(), e))?;

    if regex.is_match(REDACTION_MARKER) {
        return Err(ScourError::InvalidRule(
            rule.id.clone(),
            "pattern matches the redaction marker; redaction would never converge".to_string(),
        ));
    }

    Ok(CompiledRule {
        regex,
        id: rule.id.clone(),
        category: rule.category,
        text_only: rule.text_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn catalog_with(rules: Vec<DetectionRule>, globs: Vec<&str>) -> CatalogConfig {
        CatalogConfig {
            rules,
            sensitive_files: globs.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn compile_rejects_marker_matching_pattern() {
        let config = catalog_with(
            vec![DetectionRule {
                id: "greedy".to_string(),
                pattern: r"\*{3}[A-Z]+\*{3}".to_string(),
                ..Default::default()
            }],
            vec![],
        );
        let err = CompiledCatalog::compile(&config).unwrap_err();
        assert!(err.to_string().contains("redaction marker"));
    }

    #[test]
    fn compile_skips_disabled_rules() {
        let config = catalog_with(
            vec![DetectionRule {
                id: "off".to_string(),
                pattern: "x+".to_string(),
                enabled: Some(false),
                ..Default::default()
            }],
            vec![],
        );
        let compiled = CompiledCatalog::compile(&config).unwrap();
        assert!(compiled.rules.is_empty());
    }

    #[test]
    fn sensitive_path_matches_basename_at_any_depth() {
        let config = catalog_with(vec![], vec![".env", "*.pem"]);
        let compiled = CompiledCatalog::compile(&config).unwrap();
        assert!(compiled.is_sensitive_path(".env"));
        assert!(compiled.is_sensitive_path("service/api/.env"));
        assert!(compiled.is_sensitive_path("certs/server.pem"));
        assert!(!compiled.is_sensitive_path(".environment"));
        assert!(!compiled.is_sensitive_path("src/main.rs"));
    }

    #[test]
    fn compile_rejects_bad_glob() {
        let config = catalog_with(vec![], vec!["a[unterminated"]);
        assert!(CompiledCatalog::compile(&config).is_err());
    }

    #[test]
    fn default_catalog_compiles() {
        let config = CatalogConfig::load_default().unwrap();
        let compiled = CompiledCatalog::compile(&config).unwrap();
        assert!(!compiled.rules.is_empty());
        assert!(compiled.sensitive_glob_count() > 0);
    }
}
