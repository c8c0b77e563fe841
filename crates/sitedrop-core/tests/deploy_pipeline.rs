mod support;

use tempfile::TempDir;

use sitedrop_core::deploy::{DeployRequest, Deployer};
use sitedrop_core::error::DeployError;
use sitedrop_core::types::{FileMap, Platform, ProjectId, ProjectName};

use support::{Call, RecordingBackend, dir_entries, zip_entry, zip_entry_names};

fn deployer(backend: RecordingBackend, temp: &TempDir) -> Deployer<RecordingBackend> {
    Deployer::new(backend).with_temp_root(Some(temp.path().to_path_buf()))
}

fn name(raw: &str) -> ProjectName {
    ProjectName::parse(raw).unwrap()
}

#[tokio::test]
async fn deploy_creates_project_then_publishes() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new(), &temp);
    let files = FileMap::new().with_file("index.html", "<h1>hi</h1>");

    let outcome = deployer
        .deploy(DeployRequest::new(name("my-site"), files))
        .await
        .unwrap();

    assert_eq!(outcome.project_id.as_str(), "P1");
    assert_eq!(outcome.descriptor.domain_list, vec!["a.4everland.app"]);
    assert_eq!(outcome.descriptor.file_hash, "bafyTEST");
    assert_eq!(outcome.files, 1);

    assert_eq!(
        deployer.backend().calls(),
        vec![
            Call::Create {
                name: "my-site".to_string(),
                platform: Platform::Ipfs,
            },
            Call::Deploy {
                project_id: "P1".to_string(),
            },
        ]
    );

    let uploads = deployer.backend().uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(zip_entry_names(&uploads[0]), vec!["index.html"]);
    assert_eq!(zip_entry(&uploads[0], "index.html"), b"<h1>hi</h1>");

    assert_eq!(dir_entries(temp.path()), 0, "workspace must be removed");
}

#[tokio::test]
async fn deploy_with_existing_project_skips_creation() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new(), &temp);
    let request = DeployRequest::new(name("site"), FileMap::new().with_file("index.html", "x"))
        .with_project_id(Some(ProjectId::new("existing-42").unwrap()));

    let outcome = deployer.deploy(request).await.unwrap();

    assert_eq!(outcome.project_id.as_str(), "existing-42");
    assert_eq!(deployer.backend().create_calls(), 0);
    assert_eq!(
        deployer.backend().calls(),
        vec![Call::Deploy {
            project_id: "existing-42".to_string(),
        }]
    );
}

#[tokio::test]
async fn deploy_passes_requested_platform_to_creation() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new(), &temp);
    let request = DeployRequest::new(name("site"), FileMap::new().with_file("a.txt", "a"))
        .with_platform(Platform::Greenfield);

    deployer.deploy(request).await.unwrap();

    assert_eq!(
        deployer.backend().calls()[0],
        Call::Create {
            name: "site".to_string(),
            platform: Platform::Greenfield,
        }
    );
}

#[tokio::test]
async fn nested_files_keep_their_relative_layout() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new(), &temp);
    let files = FileMap::new()
        .with_file("index.html", "<h1>root</h1>")
        .with_file("assets/css/site.css", "body{}")
        .with_file("./docs/../about.html", "about");

    let outcome = deployer
        .deploy(DeployRequest::new(name("nested"), files))
        .await
        .unwrap();

    assert_eq!(outcome.files, 3);
    let upload = &deployer.backend().uploads()[0];
    let mut names = zip_entry_names(upload);
    names.sort();
    assert_eq!(names, vec!["about.html", "assets/css/site.css", "index.html"]);
    assert_eq!(zip_entry(upload, "assets/css/site.css"), b"body{}");
}

#[tokio::test]
async fn empty_file_map_deploys_empty_archive() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new(), &temp);

    let outcome = deployer
        .deploy(DeployRequest::new(name("empty"), FileMap::new()))
        .await
        .unwrap();

    assert_eq!(outcome.files, 0);
    let upload = &deployer.backend().uploads()[0];
    assert!(zip_entry_names(upload).is_empty());
    assert_eq!(dir_entries(temp.path()), 0);
}

#[tokio::test]
async fn traversal_path_is_rejected_before_any_remote_call() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new(), &temp);
    let files = FileMap::new()
        .with_file("index.html", "ok")
        .with_file("../escape.txt", "nope");

    let err = deployer
        .deploy(DeployRequest::new(name("site"), files))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::InvalidInput(_)), "got {err:?}");
    assert!(deployer.backend().calls().is_empty());
    assert_eq!(dir_entries(temp.path()), 0, "nothing may be staged");
    assert!(!temp.path().parent().unwrap().join("escape.txt").exists());
}

#[tokio::test]
async fn absolute_path_is_rejected() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new(), &temp);
    let files = FileMap::new().with_file("/etc/passwd", "nope");

    let err = deployer
        .deploy(DeployRequest::new(name("site"), files))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "invalid_input");
    assert!(deployer.backend().calls().is_empty());
}

#[tokio::test]
async fn publish_failure_still_removes_workspace() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new().failing_deploy("quota exceeded"), &temp);

    let err = deployer
        .deploy(DeployRequest::new(
            name("site"),
            FileMap::new().with_file("index.html", "x"),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "remote");
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(deployer.backend().create_calls(), 1);
    assert_eq!(dir_entries(temp.path()), 0);
}

#[tokio::test]
async fn create_failure_stops_before_upload() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new().failing_create("name taken"), &temp);

    let err = deployer
        .deploy(DeployRequest::new(
            name("site"),
            FileMap::new().with_file("index.html", "x"),
        ))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("name taken"));
    assert!(deployer.backend().uploads().is_empty());
    assert_eq!(dir_entries(temp.path()), 0);
}

#[tokio::test]
async fn identical_requests_upload_identical_archives() {
    let temp = TempDir::new().unwrap();
    let deployer = deployer(RecordingBackend::new(), &temp);
    let files = FileMap::new()
        .with_file("b.txt", "b")
        .with_file("a/index.html", "a");

    let first = deployer
        .deploy(DeployRequest::new(name("site"), files.clone()))
        .await
        .unwrap();
    let second = deployer
        .deploy(DeployRequest::new(name("site"), files))
        .await
        .unwrap();

    assert_eq!(first.archive_digest, second.archive_digest);
    let uploads = deployer.backend().uploads();
    assert_eq!(uploads[0], uploads[1]);
}
