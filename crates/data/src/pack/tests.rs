use super::*;

fn files(entries: &[(&str, &str)]) -> impl Fn(&str) -> io::Result<Option<Vec<u8>>> {
	let entries: Vec<(String, String)> = entries
		.iter()
		.map(|(path, body)| ((*path).to_owned(), (*body).to_owned()))
		.collect();
	move |path| {
		Ok(entries
			.iter()
			.find(|(candidate, _)| candidate == path)
			.map(|(_, body)| body.clone().into_bytes()))
	}
}

#[test]
fn description_is_optional() {
	let meta = read_descriptor(
		"test",
		files(&[("pack.json", r#"{"name":"Extras","version":"1.2","authors":["ana","bo"]}"#)]),
	)
	.unwrap();
	assert_eq!(meta.name, "Extras");
	assert_eq!(meta.description, "");
	assert_eq!(meta.authors, ["ana", "bo"]);
	assert_eq!(meta.to_string(), "Extras 1.2");
}

#[test]
fn required_fields_are_enforced() {
	let error = read_descriptor("test", files(&[("pack.json", r#"{"name":"Extras","authors":[]}"#)]))
		.unwrap_err();
	assert!(matches!(error, PackError::MalformedDescriptor { .. }));
}

#[test]
fn vanilla_pack_is_refused() {
	let error = read_descriptor("test", files(&[("pack.mcmeta", "{}")])).unwrap_err();
	assert!(matches!(error, PackError::LegacyDescriptor { .. }));
}

#[test]
fn missing_descriptor() {
	let error = read_descriptor("test", files(&[])).unwrap_err();
	assert!(matches!(error, PackError::MissingDescriptor { pack } if pack == "test"));
}
