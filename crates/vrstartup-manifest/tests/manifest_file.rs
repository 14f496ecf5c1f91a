//! On-disk behaviour of prepared manifests.

use vrstartup_manifest::{ApplicationRecord, ManifestBuilder, ManifestDocument};

#[test]
fn prepared_manifest_persists_next_to_executable() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("foo.exe");
    std::fs::write(&exe, b"").unwrap();

    let record = ApplicationRecord::new(&exe, "My App", true).unwrap();
    let prepared = ManifestBuilder::prepare(&record);
    prepared.document.write_to(&prepared.path).unwrap();

    assert_eq!(prepared.path, dir.path().join("myapp.vrmanifest"));
    let text = std::fs::read_to_string(&prepared.path).unwrap();
    let parsed = ManifestDocument::from_json(&text).unwrap();
    assert_eq!(parsed.applications[0].app_key, "user.generated.myapp");
    assert!(!parsed.applications[0].binary_path_windows.contains('\\'));
}

#[test]
fn repeated_preparation_targets_the_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("foo.exe");

    let record = ApplicationRecord::new(&exe, "My App", false).unwrap();
    let first = ManifestBuilder::prepare(&record);
    first.document.write_to(&first.path).unwrap();
    let second = ManifestBuilder::prepare(&record);
    second.document.write_to(&second.path).unwrap();

    assert_eq!(first, second);
    let manifests: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "vrmanifest"))
        .collect();
    assert_eq!(manifests.len(), 1);
}

#[test]
fn shared_display_name_collides_on_key_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = ApplicationRecord::new(dir.path().join("a.exe"), "Helper", false).unwrap();
    let b = ApplicationRecord::new(dir.path().join("b.exe"), "Helper", true).unwrap();

    let pa = ManifestBuilder::prepare(&a);
    let pb = ManifestBuilder::prepare(&b);

    assert_eq!(pa.app_key, pb.app_key);
    assert_eq!(pa.path, pb.path);

    pa.document.write_to(&pa.path).unwrap();
    pb.document.write_to(&pb.path).unwrap();
    let text = std::fs::read_to_string(&pb.path).unwrap();
    let parsed = ManifestDocument::from_json(&text).unwrap();
    assert!(parsed.applications[0].binary_path_windows.ends_with("b.exe"));
}
