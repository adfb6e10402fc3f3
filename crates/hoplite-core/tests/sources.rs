use hoplite_core::{ConfigFailure, FileSource, ResourceRoots};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "a: 1\n").unwrap();
    path
}

fn unknown_identifiers(failure: &ConfigFailure) -> Vec<String> {
    let ConfigFailure::MultipleFailures { failures } = failure else {
        panic!("expected MultipleFailures, got {:?}", failure);
    };
    failures
        .iter()
        .map(|f| match f {
            ConfigFailure::UnknownSource { identifier } => identifier.clone(),
            other => panic!("expected UnknownSource, got {:?}", other),
        })
        .collect()
}

#[test]
fn existing_paths_resolve() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yml");
    let b = write(&dir, "b.json");

    let sources = FileSource::from_paths([&a, &b]).unwrap();
    assert_eq!(sources, vec![FileSource::Path(a), FileSource::Path(b)]);
    assert_eq!(sources[1].ext(), Some("json".to_string()));
    assert_eq!(sources[0].open().unwrap(), "a: 1\n");
}

#[test]
fn every_missing_path_is_reported() {
    let dir = TempDir::new().unwrap();
    let present = write(&dir, "present.yml");
    let missing_one = dir.path().join("missing-1.yml");
    let missing_two = dir.path().join("missing-2.yml");

    let err = FileSource::from_paths([&missing_one, &present, &missing_two]).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(
        unknown_identifiers(err.first()),
        vec![
            missing_one.display().to_string(),
            missing_two.display().to_string()
        ]
    );
}

#[test]
fn resources_search_roots_in_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write(&second, "app.yml");
    let shadowing = write(&first, "shared.yml");
    write(&second, "shared.yml");

    let roots = ResourceRoots::new([first.path(), second.path()]);
    let sources = roots.resolve(["/app.yml", "shared.yml"]).unwrap();
    assert_eq!(
        sources[0],
        FileSource::Resource {
            name: "/app.yml".to_string(),
            path: second.path().join("app.yml"),
        }
    );
    assert_eq!(sources[1].path(), shadowing.as_path());
}

#[test]
fn missing_resources_are_accumulated() {
    let root = TempDir::new().unwrap();
    write(&root, "app.yml");
    let roots = ResourceRoots::new([root.path()]);

    let err = roots
        .resolve(["nope.yml", "app.yml", "gone.json"])
        .unwrap_err();
    assert_eq!(
        unknown_identifiers(err.first()),
        vec!["nope.yml".to_string(), "gone.json".to_string()]
    );
}
