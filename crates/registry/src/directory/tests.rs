use std::sync::Mutex as StdMutex;

use pretty_assertions::assert_eq;

use super::*;
use crate::register::Register;

fn id(name: &str) -> ResourceId {
	ResourceId::new("cairn", name).unwrap()
}

fn directory() -> RegistryDirectory {
	RegistryDirectory::new(id("registries"))
}

#[test]
fn records_keep_creation_order() {
	let dir = directory();
	dir.create_simple::<str>(id("zeta"), Population::Event).unwrap();
	dir.create_reloadable::<str>(id("alpha"), Population::Direct).unwrap();
	dir.create_simple::<u32>(id("mid"), Population::Event).unwrap();

	let keys: Vec<_> = dir.records().iter().map(|r| r.key().clone()).collect();
	assert_eq!(keys, vec![id("zeta"), id("alpha"), id("mid")]);
	let indices: Vec<_> = dir.records().iter().map(|r| r.index()).collect();
	assert!(indices.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn duplicate_registry_key_is_a_configuration_error() {
	let dir = directory();
	dir.create_simple::<str>(id("items"), Population::Event).unwrap();
	assert_eq!(
		dir.create_reloadable::<u32>(id("items"), Population::Event).unwrap_err(),
		DirectoryError::DuplicateRegistry(id("items"))
	);
	assert_eq!(dir.len(), 1);
}

#[test]
fn collection_closes_for_good() {
	let dir = directory();
	dir.close_collection().unwrap();
	assert!(dir.is_closed());
	assert_eq!(
		dir.create_simple::<str>(id("late"), Population::Event).unwrap_err(),
		DirectoryError::Closed(id("late"))
	);
}

#[test]
fn frozen_registry_cannot_be_adopted() {
	let dir = directory();
	let registry = SimpleRegistry::<str>::new(id("early"));
	registry.freeze().unwrap();
	assert_eq!(
		dir.adopt::<str, _>(registry, Population::Event).unwrap_err(),
		DirectoryError::FrozenRegistry(id("early"))
	);
}

#[test]
fn lifecycle_passes_require_closed_collection() {
	let dir = directory();
	dir.create_simple::<str>(id("items"), Population::Event).unwrap();
	assert_eq!(dir.populate().unwrap_err(), DirectoryError::NotClosed);
	assert_eq!(dir.freeze_all().unwrap_err(), DirectoryError::NotClosed);
	assert_eq!(dir.reload().unwrap_err(), DirectoryError::NotClosed);
}

#[test]
fn typed_lookup_checks_value_type() {
	let dir = directory();
	dir.create_simple::<str>(id("names"), Population::Event).unwrap();

	assert!(dir.registry::<str>(&id("names")).is_ok());
	assert_eq!(
		dir.registry::<u32>(&id("names")).err(),
		Some(DirectoryError::TypeMismatch(id("names")))
	);
	assert_eq!(
		dir.registry::<str>(&id("missing")).err(),
		Some(DirectoryError::UnknownRegistry(id("missing")))
	);
}

#[test]
fn direct_registries_reject_listeners() {
	let dir = directory();
	dir.create_simple::<str>(id("names"), Population::Direct).unwrap();
	assert_eq!(
		dir.subscribe::<str, _>(&id("names"), "noop", |_| Ok(())),
		Err(DirectoryError::NoEvents(id("names")))
	);
}

#[test]
fn populate_fires_in_creation_order_and_skips_frozen() {
	let dir = directory();
	let first = dir.create_simple::<str>(id("first"), Population::Event).unwrap();
	let frozen = dir.create_simple::<str>(id("frozen"), Population::Event).unwrap();
	dir.create_simple::<str>(id("last"), Population::Event).unwrap();

	let seen = Arc::new(StdMutex::new(Vec::new()));
	for key in ["first", "frozen", "last"] {
		let seen = Arc::clone(&seen);
		dir.subscribe::<str, _>(&id(key), "recorder", move |event| {
			seen.lock().unwrap().push(event.registry_key().clone());
			event.register(id("entry"), Arc::from(key))
		})
		.unwrap();
	}
	dir.close_collection().unwrap();
	frozen.freeze().unwrap();

	let report = dir.populate().unwrap();

	assert_eq!(*seen.lock().unwrap(), vec![id("first"), id("last")]);
	assert_eq!(report.populated, vec![id("first"), id("last")]);
	assert_eq!(report.skipped_frozen, vec![id("frozen")]);
	assert!(frozen.is_empty());
	assert_eq!(first.retrieve_value(&id("entry")).as_deref(), Some("first"));
}

#[test]
fn failing_listener_is_isolated() {
	let dir = directory();
	let registry = dir.create_simple::<str>(id("names"), Population::Event).unwrap();
	dir.subscribe::<str, _>(&id("names"), "panics", |_| panic!("boom")).unwrap();
	dir.subscribe::<str, _>(&id("names"), "errors", |event| {
		event.register(id("a"), Arc::from("a"))?;
		event.register(id("a"), Arc::from("again"))
	})
	.unwrap();
	dir.subscribe::<str, _>(&id("names"), "works", |event| event.register(id("b"), Arc::from("b")))
		.unwrap();
	dir.close_collection().unwrap();

	let report = dir.populate().unwrap();

	let listeners: Vec<_> = report.failures.iter().map(|f| f.listener.as_str()).collect();
	assert_eq!(listeners, vec!["panics", "errors"]);
	assert!(report.failures[0].message.contains("boom"));
	assert!(!report.is_clean());
	assert_eq!(registry.keys(), vec![id("a"), id("b")]);
}

#[test]
fn conflicting_listener_aborts_population() {
	let dir = directory();
	let registry = dir.create_simple::<str>(id("names"), Population::Event).unwrap();
	dir.create_simple::<str>(id("later"), Population::Event).unwrap();
	dir.subscribe::<str, _>(&id("names"), "first", |event| event.register(id("a"), Arc::from("a")))
		.unwrap();
	dir.subscribe::<str, _>(&id("names"), "clashing", |event| {
		Err(RegistryError::Conflict {
			registry: event.registry_key().clone(),
			id: id("a"),
			reason: "claimed twice".to_owned(),
		})
	})
	.unwrap();
	dir.subscribe::<str, _>(&id("later"), "never", |_| panic!("population went on after a conflict"))
		.unwrap();
	dir.close_collection().unwrap();

	let error = dir.populate().unwrap_err();

	assert!(matches!(
		&error,
		DirectoryError::ListenerConflict { registry, listener, source: RegistryError::Conflict { .. } }
			if *registry == id("names") && listener == "clashing"
	));
	assert_eq!(registry.keys(), vec![id("a")]);
}

#[test]
fn freeze_all_reports_already_frozen() {
	let dir = directory();
	let a = dir.create_simple::<str>(id("a"), Population::Event).unwrap();
	dir.create_simple::<str>(id("b"), Population::Event).unwrap();
	dir.close_collection().unwrap();
	a.freeze().unwrap();

	let report = dir.freeze_all().unwrap();
	assert_eq!(report.frozen, vec![id("b")]);
	assert_eq!(report.already_frozen, vec![id("a")]);
}

#[test]
fn reload_touches_only_reloadable_registries() {
	let dir = directory();
	let fixed = dir.create_simple::<str>(id("fixed"), Population::Event).unwrap();
	let live = dir.create_reloadable::<str>(id("live"), Population::Event).unwrap();

	let blocks = Arc::new(Register::<str>::new("cairn").unwrap());
	let stone = blocks.add("stone", || Arc::from("stone")).unwrap();
	let register = Arc::clone(&blocks);
	dir.subscribe::<str, _>(&id("live"), "blocks", move |event| event.register_all(&register))
		.unwrap();
	dir.subscribe::<str, _>(&id("fixed"), "fixed", |event| event.register(id("x"), Arc::from("x")))
		.unwrap();

	dir.close_collection().unwrap();
	dir.populate().unwrap();
	dir.freeze_all().unwrap();
	let before = stone.get().unwrap();

	let report = dir.reload().unwrap();
	assert_eq!(report.reloaded, vec![id("live")]);
	assert_eq!(report.skipped, vec![id("fixed")]);
	assert!(live.is_empty());
	assert!(fixed.is_frozen());

	let again = dir.populate().unwrap();
	assert_eq!(again.populated, vec![id("live")]);
	assert_eq!(again.kept_static, vec![id("fixed")]);
	assert!(again.is_clean(), "{again:?}");
	dir.freeze_all().unwrap();

	let outside_reload = dir.populate().unwrap();
	assert_eq!(outside_reload.skipped_frozen, vec![id("fixed"), id("live")]);
	assert!(outside_reload.kept_static.is_empty());

	let after = stone.get().unwrap();
	assert!(!Arc::ptr_eq(&before, &after));
	assert_eq!(fixed.len(), 1);
}

#[test]
fn reload_refuses_when_a_registry_is_mid_load() {
	let dir = directory();
	dir.create_reloadable::<str>(id("live"), Population::Direct).unwrap();
	dir.close_collection().unwrap();

	assert_eq!(
		dir.reload().unwrap_err(),
		DirectoryError::Registry(RegistryError::ReloadWhileUnfrozen(id("live")))
	);
}

#[test]
fn listeners_can_read_other_registries() {
	let dir = directory();
	let formats = dir.create_simple::<str>(id("formats"), Population::Event).unwrap();
	dir.create_simple::<str>(id("worlds"), Population::Event).unwrap();

	dir.subscribe::<str, _>(&id("formats"), "builtin", |event| {
		event.register(id("anvil"), Arc::from("anvil"))
	})
	.unwrap();
	dir.subscribe::<str, _>(&id("worlds"), "uses_formats", |event| {
		let formats = event.directory().registry::<str>(&id("formats")).map_err(|_| {
			RegistryError::Unbound(id("formats"))
		})?;
		let format = formats.retrieve_value(&id("anvil")).ok_or(RegistryError::Absent {
			registry: id("formats"),
			id: id("anvil"),
		})?;
		event.register(id("overworld"), format)
	})
	.unwrap();
	dir.close_collection().unwrap();

	let report = dir.populate().unwrap();
	assert!(report.is_clean(), "{report:?}");
	assert_eq!(formats.len(), 1);
}
