use super::*;
use crate::registry::{ReloadPermit, ReloadableRegistry, SimpleRegistry};

fn id(name: &str) -> ResourceId {
	ResourceId::new("cairn", name).unwrap()
}

#[test]
fn retrieve_holder_succeeds_before_entry_exists() {
	let registry = SimpleRegistry::<str>::new(id("names"));
	let holder = registry.retrieve_holder(id("alpha"));

	assert!(holder.is_bound());
	assert!(!holder.reference_present());
	assert_eq!(
		holder.get(),
		Err(RegistryError::Absent {
			registry: id("names"),
			id: id("alpha"),
		})
	);
	assert!(holder.as_optional().is_none());

	registry.register(id("alpha"), Arc::from("a")).unwrap();
	assert!(holder.reference_present());
	assert_eq!(&*holder.get().unwrap(), "a");
}

#[test]
fn unbound_and_absent_are_distinct() {
	let holder = RegistryHolder::<str>::unbound(id("alpha"));
	assert_eq!(holder.get(), Err(RegistryError::Unbound(id("alpha"))));
	assert!(!holder.reference_present());
	assert_eq!(holder.registry_key(), None);
}

#[test]
fn holder_sees_reloaded_value() {
	let registry = ReloadableRegistry::<String>::new(id("names"));
	let holder = registry.retrieve_holder(id("alpha"));

	registry.register(id("alpha"), Arc::new("old".to_owned())).unwrap();
	registry.freeze().unwrap();
	assert_eq!(*holder.get().unwrap(), "old");

	registry.reload(&ReloadPermit::new()).unwrap();
	assert!(!holder.reference_present());
	registry.register(id("alpha"), Arc::new("new".to_owned())).unwrap();
	registry.freeze().unwrap();

	assert_eq!(*holder.get().unwrap(), "new");
}

#[test]
fn binding_happens_once() {
	let registry: Arc<dyn Registry<str>> = SimpleRegistry::<str>::new(id("names"));
	let holder = RegistryHolder::<str>::unbound(id("alpha"));
	let clone = holder.clone();

	holder.bind(&registry).unwrap();
	assert!(clone.is_bound());
	assert_eq!(
		clone.bind(&registry),
		Err(RegistryError::HolderAlreadyBound(id("alpha")))
	);
}

#[test]
fn dropped_registry_reads_as_unbound() {
	let holder = {
		let registry = SimpleRegistry::<str>::new(id("names"));
		registry.register(id("alpha"), Arc::from("a")).unwrap();
		registry.retrieve_holder(id("alpha"))
	};
	assert_eq!(holder.get(), Err(RegistryError::Unbound(id("alpha"))));
}

#[test]
fn fallback_is_only_used_through_privileged_path() {
	let holder = RegistryHolder::<str>::with_fallback(id("alpha"), || Arc::from("stand-in"));
	assert!(holder.get().is_err());
	assert!(holder.as_optional().is_none());

	let access = FallbackAccess::for_tooling();
	assert_eq!(holder.resolve_with_fallback(&access).as_deref(), Some("stand-in"));

	let plain = RegistryHolder::<str>::unbound(id("beta"));
	assert!(plain.resolve_with_fallback(&access).is_none());
}

#[test]
fn registered_value_beats_fallback() {
	let registry: Arc<dyn Registry<str>> = SimpleRegistry::<str>::new(id("names"));
	let holder = RegistryHolder::<str>::with_fallback(id("alpha"), || Arc::from("stand-in"));
	holder.bind(&registry).unwrap();
	registry.register(id("alpha"), Arc::from("real")).unwrap();

	let access = FallbackAccess::for_tooling();
	assert_eq!(holder.resolve_with_fallback(&access).as_deref(), Some("real"));
}
