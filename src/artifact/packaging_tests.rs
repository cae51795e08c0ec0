//! Tests for artifact packaging.

use super::*;
use crate::artifact::extraction::extract_metadata;
use rstest::rstest;
use std::io::Read;

fn docs_fixture() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("temp dir");
    let docs = temp.path().join("guides");
    fs::create_dir(&docs).expect("create docs dir");
    fs::write(docs.join("a.html"), b"<h1>a</h1>").expect("write a.html");
    fs::create_dir(docs.join("sub")).expect("create sub");
    fs::write(docs.join("sub").join("b.html"), b"<h1>b</h1>").expect("write b.html");
    let docs = Utf8PathBuf::try_from(docs).expect("utf-8 docs path");
    (temp, docs)
}

fn member_names(artifact: &Utf8Path) -> Vec<String> {
    let file = fs::File::open(artifact).expect("open artifact");
    let archive = zip::ZipArchive::new(file).expect("read artifact");
    archive.file_names().map(str::to_owned).collect()
}

fn read_member(artifact: &Utf8Path, name: &str) -> String {
    let file = fs::File::open(artifact).expect("open artifact");
    let mut archive = zip::ZipArchive::new(file).expect("read artifact");
    let mut member = archive.by_name(name).expect("member present");
    let mut contents = String::new();
    member.read_to_string(&mut contents).expect("read member");
    contents
}

#[rstest]
#[case::no_metadata("", "", "guides.zip")]
#[case::project_only("myproject", "", "docs_myproject.zip")]
#[case::project_and_version("myproject", "1.0.0", "docs_myproject_1.0.0.zip")]
#[case::version_only("", "1.0.0", "guides.zip")]
fn naming_policy(#[case] project: &str, #[case] version: &str, #[case] expected: &str) {
    let meta = BuildMetadata {
        project: project.to_owned(),
        version: version.to_owned(),
        ..BuildMetadata::default()
    };
    assert_eq!(
        artifact_file_name(Utf8Path::new("/srv/guides"), &meta),
        expected
    );
}

#[test]
fn rejects_non_directory_source() {
    let temp = tempfile::tempdir().expect("temp dir");
    let file = temp.path().join("docs.txt");
    fs::write(&file, b"plain file").expect("write file");
    let file = Utf8PathBuf::try_from(file).expect("utf-8 path");
    let out = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 path");

    let result = build_in(&file, &BuildMetadata::default(), &out);
    assert!(matches!(result, Err(DocatlError::InvalidInput { .. })));
}

#[test]
fn members_are_direct_children_flattened() {
    let (temp, docs) = docs_fixture();
    let out = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 path");

    let artifact = build_in(&docs, &BuildMetadata::default(), &out).expect("build");
    let names = member_names(&artifact);

    assert!(names.contains(&"a.html".to_owned()));
    assert!(names.contains(&"sub/b.html".to_owned()));
    // No wrapper directory named after the source folder.
    assert!(names.iter().all(|name| !name.starts_with("guides")));
    // No metadata member without project and version.
    assert!(!names.contains(&METADATA_FILE_NAME.to_owned()));
}

#[test]
fn embeds_decodable_metadata_member() {
    let (temp, docs) = docs_fixture();
    let out = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 path");
    let meta = BuildMetadata {
        host: "https://docs.example.com".to_owned(),
        project: "p".to_owned(),
        version: "1.0".to_owned(),
    };

    let artifact = build_in(&docs, &meta, &out).expect("build");
    assert_eq!(artifact.file_name(), Some("docs_p_1.0.zip"));

    let contents = read_member(&artifact, METADATA_FILE_NAME);
    let decoded = BuildMetadata::decode(&contents).expect("decode");
    assert_eq!(decoded, meta);
}

#[test]
fn embedded_record_wins_over_colliding_source_file() {
    let (temp, docs) = docs_fixture();
    fs::write(docs.join(METADATA_FILE_NAME), b"project: stale\n").expect("write stale metadata");
    let out = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 path");
    let meta = BuildMetadata {
        project: "fresh".to_owned(),
        version: "2.0".to_owned(),
        ..BuildMetadata::default()
    };

    let artifact = build_in(&docs, &meta, &out).expect("build");
    let names = member_names(&artifact);
    let metadata_members = names.iter().filter(|n| *n == METADATA_FILE_NAME).count();
    assert_eq!(metadata_members, 1);

    let decoded = extract_metadata(&artifact).expect("extract");
    assert_eq!(decoded.project, "fresh");
}

#[test]
fn colliding_source_file_is_kept_when_nothing_is_embedded() {
    let (temp, docs) = docs_fixture();
    fs::write(docs.join(METADATA_FILE_NAME), b"project: stale\n").expect("write stale metadata");
    let out = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 path");

    let artifact = build_in(&docs, &BuildMetadata::default(), &out).expect("build");
    assert_eq!(read_member(&artifact, METADATA_FILE_NAME), "project: stale\n");
}

#[test]
fn repeated_builds_have_identical_members() {
    let (temp, docs) = docs_fixture();
    let out = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 path");
    let meta = BuildMetadata {
        project: "p".to_owned(),
        version: "1.0".to_owned(),
        ..BuildMetadata::default()
    };

    let first = build_in(&docs, &meta, &out).expect("first build");
    let first_names = member_names(&first);
    let second = build_in(&docs, &meta, &out).expect("second build");
    assert_eq!(first_names, member_names(&second));
}

#[test]
fn empty_subdirectories_survive_packaging() {
    let (temp, docs) = docs_fixture();
    fs::create_dir(docs.join("empty")).expect("create empty dir");
    let out = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 path");

    let artifact = build_in(&docs, &BuildMetadata::default(), &out).expect("build");
    let names = member_names(&artifact);
    assert!(names.iter().any(|name| name.trim_end_matches('/') == "empty"));
}
