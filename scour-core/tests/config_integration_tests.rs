// scour-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

// Import the specific types and functions needed from the main crate's config module
use scour_core::config::{self, CatalogConfig, RuleCategory};

#[test]
fn test_load_default_catalog() {
    let config = CatalogConfig::load_default().unwrap();
    assert!(!config.rules.is_empty());
    assert!(config.rules.iter().any(|r| r.id == "api_key_assignment"));
    assert!(config.sensitive_files.iter().any(|g| g == ".env"));
    // Broad env-file rule must never run against binary content.
    let env_rule = config.rules.iter().find(|r| r.id == "env_assignment").unwrap();
    assert!(env_rule.text_only);
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
rules:
  - id: badge_number
    pattern: "BDG-[0-9]{6}"
    category: secret
    case_sensitive: true
    description: "Internal badge numbers"
sensitive_files:
  - "id_rsa"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = CatalogConfig::load_from_file(file.path())?;
    assert_eq!(config.rules.len(), 1);
    assert_eq!(config.rules[0].id, "badge_number");
    assert_eq!(config.rules[0].category, RuleCategory::Secret);
    assert!(config.rules[0].case_sensitive);
    assert!(!config.rules[0].text_only); // omitted, defaults to false
    assert_eq!(config.sensitive_files, vec!["id_rsa".to_string()]);
    Ok(())
}

#[test]
fn test_load_from_file_rejects_invalid_pattern() -> Result<()> {
    let yaml_content = r#"
rules:
  - id: broken
    pattern: "([unclosed"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let err = CatalogConfig::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("broken"));
    Ok(())
}

#[test]
fn test_load_from_file_with_only_sensitive_files() -> Result<()> {
    let yaml_content = r#"
sensitive_files:
  - "*.p8"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = CatalogConfig::load_from_file(file.path())?;
    assert!(config.rules.is_empty());
    assert_eq!(config.sensitive_files, vec!["*.p8".to_string()]);
    Ok(())
}

#[test]
fn test_merge_overrides_default_rule_in_place() {
    let defaults = CatalogConfig::load_default().unwrap();
    let position = defaults
        .rules
        .iter()
        .position(|r| r.id == "password_assignment")
        .unwrap();

    let user = CatalogConfig {
        rules: vec![scour_core::DetectionRule {
            id: "password_assignment".to_string(),
            pattern: "passwd=[0-9a-f]{8,}".to_string(),
            category: RuleCategory::Password,
            ..Default::default()
        }],
        sensitive_files: vec![],
    };

    let merged = config::merge_catalogs(defaults, Some(user));
    assert_eq!(merged.rules[position].pattern, "passwd=[0-9a-f]{8,}");
    // Default sensitive files survive an empty user list.
    assert!(merged.sensitive_files.iter().any(|g| g == "*.pem"));
}
