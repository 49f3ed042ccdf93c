use std::path::{Path, PathBuf};

use cairn_primitives::Priority;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_config_uses_defaults() {
	let config = Config::parse(Path::new("cairn.toml"), "").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.datapacks.priority.value(), Priority::Low.value());
}

#[test]
fn full_config_resolves_relative_paths() {
	let text = r#"
log_level = "debug"
reload_on_start = true

[datapacks]
directory = "packs"
priority = 300

[[plugins]]
name = "minigames"
path = "plugins/minigames"
priority = "high"

[[plugins]]
name = "cosmetics"
path = "/opt/cosmetics"
"#;
	let config = Config::parse(Path::new("/srv/cairn/cairn.toml"), text).unwrap();

	assert_eq!(config.log_level, "debug");
	assert!(config.reload_on_start);
	assert_eq!(config.datapacks.directory, PathBuf::from("/srv/cairn/packs"));
	assert_eq!(config.datapacks.priority, PrioritySetting::Value(300));
	assert_eq!(
		config.plugins,
		vec![
			PluginPack {
				name: "minigames".into(),
				path: PathBuf::from("/srv/cairn/plugins/minigames"),
				priority: PrioritySetting::Named(Priority::High),
			},
			PluginPack {
				name: "cosmetics".into(),
				path: PathBuf::from("/opt/cosmetics"),
				priority: PrioritySetting::Named(Priority::Normal),
			},
		]
	);
}

#[test]
fn unknown_keys_are_rejected() {
	let error = Config::parse(Path::new("cairn.toml"), "log_levle = \"debug\"").unwrap_err();
	assert!(matches!(error, ConfigError::Parse { .. }));
}

#[test]
fn duplicate_plugins_are_rejected() {
	let text = r#"
[[plugins]]
name = "a"
path = "one"

[[plugins]]
name = "a"
path = "two"
"#;
	let error = Config::parse(Path::new("cairn.toml"), text).unwrap_err();
	assert!(matches!(error, ConfigError::DuplicatePlugin(name) if name == "a"));
}

#[test]
fn explicit_missing_file_is_an_error() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("nope.toml");
	assert!(matches!(Config::load(Some(&missing)), Err(ConfigError::Io { .. })));
}

#[test]
fn explicit_file_is_loaded() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("cairn.toml");
	std::fs::write(&path, "reload_on_start = true").unwrap();

	let (config, origin) = Config::load(Some(&path)).unwrap();
	assert!(config.reload_on_start);
	assert_eq!(config.datapacks.directory, dir.path().join("datapacks"));
	assert_eq!(origin, ConfigOrigin::File(path));
}
