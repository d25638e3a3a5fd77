use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Mock, Server};
use serde_json::json;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const COMMIT: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// A token file whose first line is `abc123` (the rest is not text) and an
/// asset dir with two files.
fn workspace() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, b"abc123\n\xff\xfe not text\n").unwrap();

    let asset_dir = dir.path().join("dist");
    std::fs::create_dir(&asset_dir).unwrap();
    std::fs::write(asset_dir.join("binary.tar.gz"), b"\x1f\x8b binary").unwrap();
    std::fs::write(asset_dir.join("notes.txt"), "release notes").unwrap();

    (dir, token_file, asset_dir)
}

fn ghrp(api_url: &str, token_file: &Path, commit: &str, asset_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("ghrp"));
    cmd.env_remove("RELEASE_NAME")
        .env_remove("RELEASE_TAG")
        .env("RUST_LOG", "warn")
        .arg(token_file)
        .arg("owner/repo")
        .arg(commit)
        .arg(asset_dir)
        .arg("--api-url")
        .arg(api_url);
    cmd
}

fn mock_repo(server: &mut Server) -> Mock {
    server
        .mock("GET", "/repos/owner/repo")
        .match_header("authorization", "Bearer abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"full_name": "owner/repo", "private": false, "default_branch": "main"}"#)
        .create()
}

fn mock_releases(server: &mut Server, body: &str) -> Mock {
    server
        .mock("GET", "/repos/owner/repo/releases?per_page=100&page=1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

fn mock_upload(server: &mut Server, name: &str, content: &[u8]) -> Mock {
    server
        .mock("POST", "/uploads/repos/owner/repo/releases/42/assets")
        .match_query(Matcher::UrlEncoded("name".into(), name.into()))
        .match_header("content-type", "application/octet-stream")
        .match_body(content.to_vec())
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 1,
                "name": name,
                "size": content.len(),
                "browser_download_url": format!("https://example.com/{}", name)
            })
            .to_string(),
        )
        .expect(1)
        .create()
}

#[test]
fn test_end_to_end_release() {
    let mut server = Server::new();
    let url = server.url();
    let (_dir, token_file, asset_dir) = workspace();

    let _mock_repo = mock_repo(&mut server);
    let _mock_releases = mock_releases(
        &mut server,
        r#"[{"id": 1, "tag_name": "v0.9.0", "name": "Old", "draft": false, "prerelease": false}]"#,
    );

    let mock_tag = server
        .mock("POST", "/repos/owner/repo/git/tags")
        .match_body(Matcher::Json(json!({
            "tag": "v1.0.0",
            "message": "tag message for v1.0.0",
            "object": COMMIT,
            "type": "commit"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sha": "c0ffee", "tag": "v1.0.0"}"#)
        .expect(1)
        .create();

    let mock_ref = server
        .mock("POST", "/repos/owner/repo/git/refs")
        .match_body(Matcher::Json(json!({"ref": "refs/tags/v1.0.0", "sha": "c0ffee"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ref": "refs/tags/v1.0.0"}"#)
        .expect(1)
        .create();

    let mock_release = server
        .mock("POST", "/repos/owner/repo/releases")
        .match_body(Matcher::Json(json!({
            "tag_name": "v1.0.0",
            "target_commitish": COMMIT,
            "name": "Release 1.0 build",
            "body": format!("Release: Release 1.0 build\nbased on commit: {}", COMMIT),
            "draft": true,
            "prerelease": true
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 42,
                "tag_name": "v1.0.0",
                "name": "Release 1.0 build",
                "draft": true,
                "prerelease": true,
                "html_url": format!("{}/owner/repo/releases/tag/v1.0.0", url),
                "upload_url": format!("{}/uploads/repos/owner/repo/releases/42/assets{{?name,label}}", url)
            })
            .to_string(),
        )
        .expect(1)
        .create();

    let mock_binary = mock_upload(&mut server, "binary.tar.gz", b"\x1f\x8b binary");
    let mock_notes = mock_upload(&mut server, "notes.txt", b"release notes");

    // A link back to the asset dir must not upload anything twice.
    #[cfg(unix)]
    std::os::unix::fs::symlink(&asset_dir, asset_dir.join("again")).unwrap();

    ghrp(&url, &token_file, COMMIT, &asset_dir)
        .write_stdin("Release 1.0 build\nv1.0.0\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("Checking existing releases..."))
        .stdout(predicates::str::contains("Creating new draft release..."))
        .stdout(predicates::str::contains("  Uploading notes.txt..."))
        .stdout(predicates::str::contains("  Uploading binary.tar.gz..."))
        .stdout(predicates::str::contains(
            "Draft release v1.0.0 created with 2 asset(s).",
        ));

    mock_tag.assert();
    mock_ref.assert();
    mock_release.assert();
    mock_binary.assert();
    mock_notes.assert();
}

#[test]
fn test_invalid_tag_is_prompted_again() {
    let mut server = Server::new();
    let url = server.url();
    let (_dir, token_file, asset_dir) = workspace();

    let _mock_repo = mock_repo(&mut server);
    let _mock_releases = mock_releases(&mut server, "[]");
    let _mock_tag = server
        .mock("POST", "/repos/owner/repo/git/tags")
        .match_body(Matcher::PartialJson(json!({"tag": "v2.0.0"})))
        .with_status(201)
        .with_body(r#"{"sha": "c0ffee"}"#)
        .create();
    let _mock_ref = server
        .mock("POST", "/repos/owner/repo/git/refs")
        .with_status(201)
        .with_body(r#"{"ref": "refs/tags/v2.0.0"}"#)
        .create();
    let mock_release = server
        .mock("POST", "/repos/owner/repo/releases")
        .match_body(Matcher::PartialJson(json!({"tag_name": "v2.0.0"})))
        .with_status(201)
        .with_body(
            json!({
                "id": 42,
                "tag_name": "v2.0.0",
                "draft": true,
                "prerelease": true,
                "upload_url": format!("{}/uploads/repos/owner/repo/releases/42/assets{{?name,label}}", url)
            })
            .to_string(),
        )
        .expect(1)
        .create();
    let _mock_binary = mock_upload(&mut server, "binary.tar.gz", b"\x1f\x8b binary");
    let _mock_notes = mock_upload(&mut server, "notes.txt", b"release notes");

    let output = ghrp(&url, &token_file, COMMIT, &asset_dir)
        .write_stdin("too short\nSecond release candidate\n2.0.0\nv2.0\nv2.0.0\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    mock_release.assert();
    let stdout = String::from_utf8(output).unwrap();
    assert_eq!(stdout.matches("Enter release name: ").count(), 2);
    assert_eq!(
        stdout
            .matches("Enter a release tag (must be of format 'v1.0.0'): ")
            .count(),
        3
    );
}

#[test]
fn test_existing_draft_aborts_without_creating() {
    let mut server = Server::new();
    let url = server.url();
    let (_dir, token_file, asset_dir) = workspace();

    let _mock_repo = mock_repo(&mut server);
    let _mock_releases = mock_releases(
        &mut server,
        r#"[{"id": 7, "tag_name": "v0.9.0", "name": "Pending build", "draft": true, "prerelease": true}]"#,
    );
    let mock_tag = server
        .mock("POST", "/repos/owner/repo/git/tags")
        .expect(0)
        .create();
    let mock_release = server
        .mock("POST", "/repos/owner/repo/releases")
        .expect(0)
        .create();

    ghrp(&url, &token_file, COMMIT, &asset_dir)
        .write_stdin("Release 1.0 build\nv1.0.0\n")
        .assert()
        .code(1)
        .stderr(predicates::str::contains(
            "Release 'Pending build' is already a draft",
        ));

    mock_tag.assert();
    mock_release.assert();
}

#[test]
fn test_invalid_commit_rejected_before_any_request() {
    let mut server = Server::new();
    let url = server.url();
    let (_dir, token_file, asset_dir) = workspace();

    let mock_any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create();

    ghrp(&url, &token_file, "ABC123", &asset_dir)
        .assert()
        .code(1)
        .stdout(predicates::str::contains("Usage:"))
        .stderr(predicates::str::contains("ABC123 is not a valid commit id."));

    mock_any.assert();
}

#[test]
fn test_invalid_preset_tag_rejected_before_any_request() {
    let mut server = Server::new();
    let url = server.url();
    let (_dir, token_file, asset_dir) = workspace();

    let mock_any = server.mock("GET", Matcher::Any).expect(0).create();

    ghrp(&url, &token_file, COMMIT, &asset_dir)
        .args(["--name", "Release 1.0 build", "--tag", "1.0"])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("Usage:"))
        .stderr(predicates::str::contains("Release tag '1.0' must be of format 'v1.0.0'."));

    mock_any.assert();
}

#[test]
fn test_missing_asset_dir_is_reported() {
    let (dir, token_file, _asset_dir) = workspace();
    let missing = dir.path().join("nope");

    ghrp("http://127.0.0.1:9", &token_file, COMMIT, &missing)
        .assert()
        .code(1)
        .stderr(predicates::str::contains("does not exist or is not a directory."));
}

#[test]
fn test_bad_credentials_fail() {
    let mut server = Server::new();
    let url = server.url();
    let (_dir, token_file, asset_dir) = workspace();

    let _mock_repo = server
        .mock("GET", "/repos/owner/repo")
        .with_status(401)
        .with_body(r#"{"message": "Bad credentials"}"#)
        .create();

    ghrp(&url, &token_file, COMMIT, &asset_dir)
        .assert()
        .code(1)
        .stderr(predicates::str::contains("Bad credentials"));
}

#[test]
fn test_configuration_from_environment() {
    let mut server = Server::new();
    let url = server.url();
    let (_dir, token_file, asset_dir) = workspace();

    let _mock_repo = mock_repo(&mut server);
    let _mock_releases = mock_releases(
        &mut server,
        r#"[{"id": 3, "tag_name": "v0.1.0", "name": "Env draft", "draft": true, "prerelease": true}]"#,
    );

    Command::new(cargo::cargo_bin!("ghrp"))
        .env("API_TOKEN_FILE", &token_file)
        .env("RELEASE_REPO", "owner/repo")
        .env("SNAPSHOT_COMMIT", COMMIT)
        .env("SNAPSHOT_BRANCH", "main")
        .env("ASSET_DIR", &asset_dir)
        .env("GITHUB_API_URL", &url)
        .assert()
        .code(1)
        .stderr(predicates::str::contains("Release 'Env draft' is already a draft"));
}
