use std::sync::Arc;

use cairn_data::{DataManager, DataSource, DataType, JsonDataType, MemorySource};
use cairn_primitives::{Priority, ResourceId};
use cairn_registry::{Registry, RegistryError, SimpleRegistry};
use pretty_assertions::assert_eq;

use super::*;
use crate::core_pack;
use crate::types::{GameRule, Item};

fn id(raw: &str) -> ResourceId {
	ResourceId::parse(raw).unwrap()
}

fn core_only() -> DataManager {
	let mut manager = DataManager::new();
	manager.add_source(core_pack().unwrap()).unwrap();
	manager
}

fn loaded() -> Lifecycle {
	let lifecycle = Lifecycle::bootstrap(&[]).unwrap();
	let report = lifecycle.load(&core_only()).unwrap();
	assert!(report.is_clean(), "{report}");
	lifecycle
}

#[test]
fn registries_are_created_in_contract_order() {
	let lifecycle = Lifecycle::bootstrap(&[]).unwrap();
	let keys: Vec<_> = lifecycle.summary().into_iter().map(|summary| summary.key.to_string()).collect();
	assert_eq!(
		keys,
		vec![
			"cairn:data_type",
			"cairn:dimension_type",
			"cairn:world_format",
			"cairn:world",
			"cairn:item",
			"cairn:block",
			"cairn:enchantment",
			"cairn:game_rule",
		]
	);
	assert!(lifecycle.directory().is_closed());
}

#[test]
fn core_pack_loads_everything() {
	let lifecycle = loaded();
	let counts: Vec<_> = lifecycle
		.summary()
		.into_iter()
		.map(|summary| (summary.key.name().to_owned(), summary.len, summary.frozen))
		.collect();
	assert_eq!(
		counts,
		vec![
			("data_type".to_owned(), 4, true),
			("dimension_type".to_owned(), 2, true),
			("world_format".to_owned(), 2, true),
			("world".to_owned(), 2, true),
			("item".to_owned(), 3, true),
			("block".to_owned(), 2, true),
			("enchantment".to_owned(), 1, true),
			("game_rule".to_owned(), 3, true),
		]
	);
}

#[test]
fn builtin_holders_resolve_after_population() {
	let lifecycle = Lifecycle::bootstrap(&[]).unwrap();
	let stone = lifecycle.builtins().stone.clone();
	assert!(matches!(stone.get(), Err(RegistryError::Unbound(_))));

	lifecycle.load(&core_only()).unwrap();
	assert!(stone.get().unwrap().solid);
	assert_eq!(
		lifecycle.builtins().max_players.get().unwrap().default,
		crate::types::GameRuleValue::Int(20)
	);
}

#[test]
fn worlds_reference_formats_and_dimensions() {
	let lifecycle = loaded();
	let lobby = lifecycle.content().worlds.retrieve_value(&id("cairn:lobby")).unwrap();
	assert_eq!(lobby.display_name, "Lobby");
	assert_eq!(lobby.format().unwrap().extension, "polar");
	assert_eq!(lobby.dimension().unwrap().min_y, -64);

	let hub = lifecycle.content().worlds.retrieve_value(&id("cairn:nether_hub")).unwrap();
	assert_eq!(hub.format_id(), &id("cairn:anvil"));
	assert!(hub.dimension().unwrap().has_ceiling);
}

#[test]
fn lifecycle_stages_are_enforced() {
	let lifecycle = Lifecycle::bootstrap(&[]).unwrap();
	assert!(matches!(lifecycle.reload(&core_only()), Err(ContentError::NotLoaded)));
	lifecycle.load(&core_only()).unwrap();
	assert!(lifecycle.is_loaded());
	assert!(matches!(lifecycle.load(&core_only()), Err(ContentError::AlreadyLoaded)));
}

fn override_pack(stick_name: &str) -> Arc<dyn DataSource> {
	Arc::new(
		MemorySource::new("override", Priority::High)
			.with_file(
				"data/cairn/item/stick.json",
				format!(r#"{{"display_name":"{stick_name}"}}"#).into_bytes(),
			)
			.with_file("data/extra/item/gem.json", br#"{"display_name":"Gem","rarity":"rare"}"#)
			.with_file(
				"data/extra/dimension_type/void.json",
				br#"{"min_y":0,"height":16,"has_skylight":false}"#,
			),
	)
}

#[test]
fn reload_rebuilds_only_reloadable_content() {
	let lifecycle = loaded();
	let content = lifecycle.content().clone();
	let stick_before = content.items.retrieve_value(&id("cairn:stick")).unwrap();

	let mut manager = DataManager::new();
	let core: Arc<dyn DataSource> = Arc::new(core_pack().unwrap());
	manager.replace_sources([core, override_pack("Twig")]).unwrap();
	let report = lifecycle.reload(&manager).unwrap();

	assert!(report.is_clean(), "{report}");
	let reloaded = report.reload.as_ref().unwrap();
	let names: Vec<_> = reloaded.reloaded.iter().map(|key| key.name().to_owned()).collect();
	assert_eq!(names, vec!["world", "item", "enchantment"]);

	let stick = content.items.retrieve_value(&id("cairn:stick")).unwrap();
	assert_eq!(stick.display_name, "Twig");
	assert!(!Arc::ptr_eq(&stick, &stick_before));
	assert!(content.items.contains_key(&id("extra:gem")));
	assert_eq!(content.items.len(), 4);

	assert_eq!(content.dimension_types.len(), 2);
	assert!(!content.dimension_types.contains_key(&id("extra:void")));
	assert_eq!(content.blocks.len(), 2);
	assert!(lifecycle.summary().iter().all(|summary| summary.frozen));

	let efficiency = content.enchantments.retrieve_value(&id("cairn:efficiency")).unwrap();
	assert_eq!(efficiency.supported_items[0].get().unwrap().display_name, "Iron Pickaxe");
}

#[test]
fn higher_priority_pack_overrides_core() {
	let lifecycle = Lifecycle::bootstrap(&[]).unwrap();
	let mut manager = core_only();
	manager.add_shared_source(override_pack("Branch")).unwrap();
	let report = lifecycle.load(&manager).unwrap();

	let content = lifecycle.content();
	assert_eq!(content.items.retrieve_value(&id("cairn:stick")).unwrap().display_name, "Branch");
	assert!(content.dimension_types.contains_key(&id("extra:void")));
	let rejected: Vec<_> = report.data.rejections().map(|(record, _)| record.path.as_str()).collect();
	assert_eq!(rejected, vec!["data/cairn/item/stick.json"]);
}

#[derive(Debug)]
struct Tag(&'static str);

struct Tags {
	fail: bool,
}

impl Extension for Tags {
	fn name(&self) -> &str {
		"tags"
	}

	fn create_registries(&self, directory: &RegistryDirectory) -> Result<(), DirectoryError> {
		directory.create_simple::<Tag>(id("tags:tag"), Population::Event)?;
		Ok(())
	}

	fn subscribe(&self, directory: &RegistryDirectory, content: &ContentRegistries) -> Result<(), DirectoryError> {
		directory.subscribe::<Tag, _>(&id("tags:tag"), "tags:defaults", |event| {
			event.register(id("tags:mineable"), Arc::new(Tag("mineable")))
		})?;
		let fail = self.fail;
		directory.subscribe::<GameRule, _>(content.game_rules.registry_key(), "tags:rules", move |event| {
			if fail {
				panic!("rule listener broke");
			}
			event.register(
				id("tags:tag_limit"),
				Arc::new(GameRule::new("Tags per block", crate::types::GameRuleValue::Int(8))),
			)
		})?;
		Ok(())
	}
}

#[test]
fn extensions_add_registries_and_content() {
	let extensions: [Arc<dyn Extension>; 1] = [Arc::new(Tags { fail: false })];
	let lifecycle = Lifecycle::bootstrap(&extensions).unwrap();
	let report = lifecycle.load(&core_only()).unwrap();
	assert!(report.is_clean(), "{report}");

	let summary = lifecycle.summary();
	assert_eq!(summary.last().map(|s| s.key.clone()), Some(id("tags:tag")));
	let tags: Arc<dyn Registry<Tag>> = lifecycle.directory().registry(&id("tags:tag")).unwrap();
	assert_eq!(tags.retrieve_value(&id("tags:mineable")).unwrap().0, "mineable");
	assert_eq!(lifecycle.content().game_rules.len(), 4);
}

#[test]
fn failing_extension_listener_is_isolated() {
	let extensions: [Arc<dyn Extension>; 1] = [Arc::new(Tags { fail: true })];
	let lifecycle = Lifecycle::bootstrap(&extensions).unwrap();
	let report = lifecycle.load(&core_only()).unwrap();

	assert!(!report.is_clean());
	assert_eq!(report.population.failures.len(), 1);
	assert_eq!(report.population.failures[0].listener, "tags:rules");
	assert_eq!(lifecycle.content().game_rules.len(), 3);
	assert_eq!(lifecycle.content().items.len(), 3);
}

struct Clash;

impl Extension for Clash {
	fn name(&self) -> &str {
		"clash"
	}

	fn create_registries(&self, directory: &RegistryDirectory) -> Result<(), DirectoryError> {
		let items = SimpleRegistry::<Tag>::new(id("cairn:item"));
		directory.adopt::<Tag, _>(items, Population::Direct)
	}
}

#[test]
fn duplicate_extension_registry_fails_bootstrap() {
	let extensions: [Arc<dyn Extension>; 1] = [Arc::new(Clash)];
	let error = Lifecycle::bootstrap(&extensions).unwrap_err();
	assert!(matches!(
		error,
		ContentError::Extension { ref extension, source: DirectoryError::DuplicateRegistry(_) } if extension == "clash"
	));
}

struct Hijack;

impl Extension for Hijack {
	fn name(&self) -> &str {
		"hijack"
	}

	fn subscribe(&self, directory: &RegistryDirectory, content: &ContentRegistries) -> Result<(), DirectoryError> {
		let items: Arc<dyn Registry<Item>> = content.items.clone();
		directory.subscribe::<dyn DataType, _>(content.data_types.registry_key(), "hijack:types", move |event| {
			let item = JsonDataType::direct(Arc::clone(&items)).with_type_name("item");
			event.register(id("hijack:item"), Arc::new(item))
		})
	}
}

#[test]
fn duplicate_data_type_name_fails_load() {
	let extensions: [Arc<dyn Extension>; 1] = [Arc::new(Hijack)];
	let lifecycle = Lifecycle::bootstrap(&extensions).unwrap();

	let error = lifecycle.load(&core_only()).unwrap_err();

	assert!(matches!(
		&error,
		ContentError::Directory(DirectoryError::ListenerConflict {
			listener,
			source: RegistryError::Conflict { id: conflicting, .. },
			..
		}) if listener == "hijack:types" && *conflicting == id("hijack:item")
	));
	assert!(!lifecycle.is_loaded());
	let types = &lifecycle.content().data_types;
	assert!(types.contains_key(&id("cairn:item")));
	assert!(!types.contains_key(&id("hijack:item")));
}
