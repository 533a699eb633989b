//! Registry configuration from TOML

use crate::common::*;

#[test]
fn test_toml_config_drives_registry() {
    let config = MockConfig::from_toml_str(
        r#"
        identity_keys = "typed"
        duplicate_ids = "reject"
        strict_attributes = false
        "#,
    )
    .unwrap();
    let registry = fixture_registry_with(config);
    let users = model(&registry, "User");

    // Lenient attributes
    let user = users.create([("nickname", "al")]).unwrap();
    assert_eq!(user.read_attribute("nickname"), Value::from("al"));

    // Typed keys: Int 1 and "1" coexist without tripping reject
    users.create([("id", "1")]).unwrap();
    assert!(users.create([("id", 1)]).is_err());
    assert_eq!(users.count(), 2);
}

#[test]
fn test_default_toml_round_trip() {
    let parsed = MockConfig::from_toml_str(MockConfig::default_toml()).unwrap();
    assert_eq!(parsed, MockConfig::default());
}

#[test]
fn test_bad_mode_is_config_error() {
    let err = MockConfig::from_toml_str("identity_keys = \"fuzzy\"").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
