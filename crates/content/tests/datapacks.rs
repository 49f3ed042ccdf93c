use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cairn_content::{Lifecycle, core_pack};
use cairn_data::{DataManager, DirectorySource, EntryOutcome, PackError};
use cairn_primitives::{Priority, ResourceId};
use cairn_registry::{Registry, RegistryLifecycle};
use pretty_assertions::assert_eq;
use serde_json::json;

fn id(raw: &str) -> ResourceId {
	ResourceId::parse(raw).unwrap()
}

fn write(root: &Path, path: &str, value: serde_json::Value) {
	let file = root.join(path);
	fs::create_dir_all(file.parent().unwrap()).unwrap();
	fs::write(file, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
}

fn pack(root: &Path, name: &str) {
	write(
		root,
		"pack.json",
		json!({ "name": name, "version": "1.0", "authors": ["tests"] }),
	);
}

#[test]
fn directory_pack_overrides_core_and_isolates_bad_files() {
	let dir = tempfile::tempdir().unwrap();
	pack(dir.path(), "server");
	write(
		dir.path(),
		"data/cairn/item/stick.json",
		json!({ "display_name": "Server Stick", "max_stack_size": 16 }),
	);
	write(dir.path(), "data/server/item/coin.json", json!({ "display_name": "Coin" }));
	write(dir.path(), "data/server/item/broken.json", json!({ "display_name": "Broken", "max_stack_size": 0 }));
	write(dir.path(), "data/server/worlds.json", json!({
		"arena": { "format": "cairn:anvil", "dimension": "cairn:overworld" },
		"ghost": { "format": "cairn:anvil", "dimension": "cairn:overworld" },
		"bad_format": { "format": "cairn:nope", "dimension": "cairn:overworld" },
	}));
	write(dir.path(), "data/server/world/arena.json", json!({ "display_name": "Arena", "spawn": [0, 80, 0] }));
	write(dir.path(), "data/server/world/bad_format.json", json!({ "display_name": "Bad" }));
	fs::write(dir.path().join("README.md"), "not content").unwrap();

	let mut manager = DataManager::new();
	manager.add_source(core_pack().unwrap()).unwrap();
	manager
		.add_source(DirectorySource::datapack(dir.path(), Priority::Normal).unwrap())
		.unwrap();
	let packs: Vec<_> = manager.loaded_datapacks().iter().map(|pack| pack.name.clone()).collect();
	assert_eq!(packs, vec!["server", "cairn"]);

	let lifecycle = Lifecycle::bootstrap(&[]).unwrap();
	let report = lifecycle.load(&manager).unwrap();
	let content = lifecycle.content();

	let stick = content.items.retrieve_value(&id("cairn:stick")).unwrap();
	assert_eq!((stick.display_name.as_str(), stick.max_stack_size), ("Server Stick", 16));
	assert!(content.items.contains_key(&id("server:coin")));
	assert!(!content.items.contains_key(&id("server:broken")));
	assert!(content.worlds.contains_key(&id("server:arena")));
	assert_eq!(content.worlds.len(), 3);

	let mut failed: Vec<_> = report.data.failures().map(|(record, _)| record.path.clone()).collect();
	failed.sort();
	assert_eq!(
		failed,
		vec!["data/server/item/broken.json", "data/server/worlds.json#bad_format"]
	);
	let missing: Vec<_> = report.data.missing().iter().map(|entry| entry.id.clone()).collect();
	assert_eq!(missing, vec![id("server:ghost")]);
	assert!(!report.is_clean());

	let index = report
		.data
		.entries
		.iter()
		.find(|record| record.path == "data/server/worlds.json")
		.unwrap();
	assert!(matches!(&index.outcome, EntryOutcome::Loaded(ids) if ids == &vec![id("server:arena")]));
}

#[test]
fn pack_without_descriptor_is_refused() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "data/server/item/coin.json", json!({ "display_name": "Coin" }));
	assert!(matches!(
		DirectorySource::datapack(dir.path(), Priority::Normal),
		Err(PackError::MissingDescriptor { .. })
	));

	fs::write(dir.path().join("pack.mcmeta"), "{}").unwrap();
	assert!(matches!(
		DirectorySource::datapack(dir.path(), Priority::Normal),
		Err(PackError::LegacyDescriptor { .. })
	));
}

#[test]
fn readers_wait_out_a_reload() {
	let dir = tempfile::tempdir().unwrap();
	pack(dir.path(), "server");
	write(dir.path(), "data/server/item/coin.json", json!({ "display_name": "Coin" }));

	let mut manager = DataManager::new();
	manager.add_source(core_pack().unwrap()).unwrap();
	let lifecycle = Lifecycle::bootstrap(&[]).unwrap();
	lifecycle.load(&manager).unwrap();
	let items: Arc<dyn Registry<cairn_content::types::Item>> = lifecycle.content().items.clone();
	assert!(!items.contains_key(&id("server:coin")));

	manager
		.add_source(DirectorySource::datapack(dir.path(), Priority::Normal).unwrap())
		.unwrap();

	thread::scope(|scope| {
		let reader = scope.spawn(|| {
			let mut observed = Vec::new();
			for _ in 0..50 {
				observed.push(items.len());
				thread::sleep(Duration::from_millis(1));
			}
			observed
		});
		lifecycle.reload(&manager).unwrap();
		let observed = reader.join().unwrap();
		assert!(observed.iter().all(|len| *len == 3 || *len == 4), "{observed:?}");
	});
	assert!(items.contains_key(&id("server:coin")));
}
