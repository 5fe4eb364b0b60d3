// ABOUTME: Property tests for version bumping and reverting.
// ABOUTME: Checks bump arithmetic and that revert restores the previous version.

use proptest::prelude::*;
use sunrise_deploy::version::{BumpType, Version, VersionFile};

fn version() -> impl Strategy<Value = Version> {
    (0u64..10_000, 0u64..10_000, 0u64..10_000).prop_map(|(a, b, c)| Version::new(a, b, c))
}

proptest! {
    #[test]
    fn major_bump_resets_lower_parts(v in version()) {
        let bumped = v.bumped(BumpType::Major).unwrap();
        prop_assert_eq!(bumped, Version::new(v.major + 1, 0, 0));
    }

    #[test]
    fn minor_bump_resets_patch(v in version()) {
        let bumped = v.bumped(BumpType::Minor).unwrap();
        prop_assert_eq!(bumped, Version::new(v.major, v.minor + 1, 0));
    }

    #[test]
    fn patch_bump_changes_only_patch(v in version()) {
        let bumped = v.bumped(BumpType::Patch).unwrap();
        prop_assert_eq!(bumped, Version::new(v.major, v.minor, v.patch + 1));
    }

    #[test]
    fn display_parses_back(v in version()) {
        prop_assert_eq!(v.to_string().parse::<Version>().unwrap(), v);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn revert_restores_version(original in version(), kind in prop_oneof![
        Just(BumpType::Major),
        Just(BumpType::Minor),
        Just(BumpType::Patch),
    ]) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(
            &path,
            format!("{{\"name\":\"site\",\"version\":\"{}\",\"scripts\":{{\"build\":\"vite build\"}}}}", original),
        )
        .unwrap();
        let file = VersionFile::new(&path);

        let bumped = file.bump(kind).unwrap();
        prop_assert_eq!(file.current(), Some(bumped));
        prop_assert!(file.revert(&original));
        prop_assert_eq!(file.current(), Some(original));
    }
}

#[test]
fn documented_example() {
    let v: Version = "1.4.9".parse().unwrap();
    assert_eq!(v.bumped(BumpType::Minor).unwrap().to_string(), "1.5.0");
}

#[test]
fn bump_keeps_other_keys_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package.json");
    std::fs::write(
        &path,
        r#"{"name":"site","version":"0.9.9","private":true,"dependencies":{"vue":"^3.4.0"}}"#,
    )
    .unwrap();

    let file = VersionFile::new(&path);
    assert_eq!(file.bump(BumpType::Patch), Some(Version::new(0, 9, 10)));

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "{\n  \"name\": \"site\",\n  \"version\": \"0.9.10\",\n  \"private\": true,\n  \"dependencies\": {\n    \"vue\": \"^3.4.0\"\n  }\n}\n"
    );
}

#[test]
fn bump_without_file_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let file = VersionFile::in_project(dir.path());
    assert_eq!(file.bump(BumpType::Patch), None);
    assert!(!file.path().exists());
}
