//! Build tree staging behavior.

use macpkg::builder::{BuildTree, NullReporter, Reporter, stage::stage};
use macpkg::template::Renderer;
use macpkg::{BuildSpec, RawConfig};
use std::path::Path;
use std::sync::Mutex;

/// Records every progress message for assertions.
#[derive(Default)]
struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

async fn resolve(raw: RawConfig) -> BuildSpec {
    BuildSpec::resolve(raw).await.unwrap()
}

async fn stage_spec(spec: &BuildSpec) -> BuildTree {
    let tree = BuildTree::new(spec);
    stage(spec, &tree, &Renderer::new(), &NullReporter)
        .await
        .unwrap();
    tree
}

fn base(build_dir: &Path) -> RawConfig {
    RawConfig {
        app: Some("TestApp".into()),
        version: Some("1.0.0".into()),
        build_dir: Some(build_dir.to_path_buf()),
        ..Default::default()
    }
}

#[tokio::test]
async fn default_staging_creates_expected_layout() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(base(dir.path())).await;
    let tree = stage_spec(&spec).await;

    for path in [
        tree.scripts().join("preinstall"),
        tree.scripts().join("postinstall"),
        tree.scripts().join("links"),
        tree.resources().join("welcome.html"),
        tree.resources().join("conclusion.html"),
        tree.distribution(),
        tree.uninstall_script(),
    ] {
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(tree.package_dir().is_dir());
    assert!(tree.product_dir().is_dir());

    let uninstall = tree.uninstall_script();
    assert!(
        uninstall.ends_with("darwinpkg/Library/Application Support/TestApp/1.0.0/uninstall.sh")
    );
}

#[tokio::test]
async fn distribution_reflects_identifier_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(base(dir.path())).await;
    let tree = stage_spec(&spec).await;

    let distribution = std::fs::read_to_string(tree.distribution()).unwrap();
    assert!(distribution.contains("<title>TestApp 1.0.0</title>"));
    assert!(distribution.contains("pkg-ref id=\"org.TestApp.1.0.0\""));
    assert!(distribution.contains(">TestApp.pkg</pkg-ref>"));
    // no license or banner configured
    assert!(!distribution.contains("LICENSE.txt"));
    assert!(!distribution.contains("banner.png"));
}

#[tokio::test]
async fn license_and_banner_are_staged_and_declared() {
    let dir = tempfile::tempdir().unwrap();
    let license = dir.path().join("LICENSE");
    std::fs::write(&license, "MIT License").unwrap();
    let banner = dir.path().join("banner.png");
    std::fs::write(&banner, [0x89, b'P', b'N', b'G']).unwrap();

    let build = dir.path().join("build");
    std::fs::create_dir(&build).unwrap();

    let spec = resolve(RawConfig {
        license: Some(license),
        banner: Some(banner),
        ..base(&build)
    })
    .await;
    let tree = stage_spec(&spec).await;

    assert_eq!(
        std::fs::read_to_string(tree.resources().join("LICENSE.txt")).unwrap(),
        "MIT License"
    );
    assert!(tree.resources().join("banner.png").exists());

    let distribution = std::fs::read_to_string(tree.distribution()).unwrap();
    assert!(distribution.contains("<license file=\"LICENSE.txt\"/>"));
    assert!(distribution.contains("background file=\"banner.png\""));
}

#[tokio::test]
async fn no_uninstall_omits_the_uninstall_script() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(RawConfig {
        no_uninstall: true,
        ..base(dir.path())
    })
    .await;
    let tree = stage_spec(&spec).await;

    assert!(!tree.uninstall_script().exists());
}

#[tokio::test]
async fn absolute_install_destination_is_relativized() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("app");
    std::fs::write(&source, "binary").unwrap();
    let build = dir.path().join("build");
    std::fs::create_dir(&build).unwrap();

    let spec = resolve(RawConfig {
        install: vec![(source, "/usr/local/bin/app".into())],
        ..base(&build)
    })
    .await;
    let tree = stage_spec(&spec).await;

    let staged = tree.darwinpkg().join("usr/local/bin/app");
    assert_eq!(std::fs::read_to_string(&staged).unwrap(), "binary");
}

#[tokio::test]
async fn directory_installs_are_copied_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("payload");
    std::fs::create_dir_all(source.join("nested")).unwrap();
    std::fs::write(source.join("nested/data.txt"), "data").unwrap();
    let build = dir.path().join("build");
    std::fs::create_dir(&build).unwrap();

    let spec = resolve(RawConfig {
        install: vec![(source, "/usr/local/share/testapp".into())],
        ..base(&build)
    })
    .await;
    let tree = stage_spec(&spec).await;

    let staged = tree.darwinpkg().join("usr/local/share/testapp/nested/data.txt");
    assert_eq!(std::fs::read_to_string(&staged).unwrap(), "data");
}

#[tokio::test]
async fn custom_scripts_are_rendered_as_templates() {
    let dir = tempfile::tempdir().unwrap();
    let pre = dir.path().join("pre.sh");
    std::fs::write(&pre, "#!/bin/bash\necho 'preparing {{ app }}'\n").unwrap();
    let post = dir.path().join("post.sh");
    std::fs::write(&post, "#!/bin/bash\necho 'installed {{ app }} {{ version }}'\n").unwrap();
    let build = dir.path().join("build");
    std::fs::create_dir(&build).unwrap();

    let spec = resolve(RawConfig {
        pre_install: Some(pre),
        post_install: Some(post),
        ..base(&build)
    })
    .await;
    let tree = stage_spec(&spec).await;

    let custom_pre = std::fs::read_to_string(tree.scripts().join("custom_preinstall")).unwrap();
    assert!(custom_pre.contains("preparing TestApp"));
    let custom_post = std::fs::read_to_string(tree.scripts().join("custom_postinstall")).unwrap();
    assert!(custom_post.contains("installed TestApp 1.0.0"));

    // the built-in hooks delegate to the custom scripts
    let preinstall = std::fs::read_to_string(tree.scripts().join("preinstall")).unwrap();
    assert!(preinstall.contains("custom_preinstall"));
    let postinstall = std::fs::read_to_string(tree.scripts().join("postinstall")).unwrap();
    assert!(postinstall.contains("custom_postinstall"));
}

#[tokio::test]
async fn chmod_directives_land_in_postinstall() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(RawConfig {
        chmod: vec![("0755".into(), "/usr/local/bin/testapp".into())],
        ..base(dir.path())
    })
    .await;
    let tree = stage_spec(&spec).await;

    let postinstall = std::fs::read_to_string(tree.scripts().join("postinstall")).unwrap();
    assert!(postinstall.contains("chmod 0755 \"/usr/local/bin/testapp\""));
}

#[tokio::test]
async fn links_script_creates_requested_symlinks() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(RawConfig {
        link: vec![(
            "/Library/Application Support/TestApp/1.0.0/testapp".into(),
            "/usr/local/bin/testapp".into(),
        )],
        ..base(dir.path())
    })
    .await;
    let tree = stage_spec(&spec).await;

    let links = std::fs::read_to_string(tree.scripts().join("links")).unwrap();
    assert!(links.contains(
        "ln -sf \"/Library/Application Support/TestApp/1.0.0/testapp\" \"/usr/local/bin/testapp\""
    ));
}

#[tokio::test]
async fn conclusion_page_lists_urls() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(RawConfig {
        url: vec![("TestApp".into(), "https://example.com/testapp".into())],
        ..base(dir.path())
    })
    .await;
    let tree = stage_spec(&spec).await;

    let conclusion = std::fs::read_to_string(tree.resources().join("conclusion.html")).unwrap();
    assert!(conclusion.contains("https://example.com/testapp"));
}

#[tokio::test]
async fn custom_welcome_html_is_used_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let welcome = dir.path().join("welcome.html");
    std::fs::write(&welcome, "<p>custom page for {{ app }}</p>").unwrap();
    let build = dir.path().join("build");
    std::fs::create_dir(&build).unwrap();

    let spec = resolve(RawConfig {
        welcome: Some(welcome),
        ..base(&build)
    })
    .await;
    let tree = stage_spec(&spec).await;

    let html = std::fs::read_to_string(tree.resources().join("welcome.html")).unwrap();
    // templated, but not wrapped in the Markdown document shell
    assert!(html.contains("custom page for TestApp"));
    assert!(!html.contains("<!DOCTYPE html>"));
}

#[tokio::test]
async fn staging_twice_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(base(dir.path())).await;

    let tree = stage_spec(&spec).await;
    let first: Vec<Vec<u8>> = staged_script_files(&tree)
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    let tree = stage_spec(&spec).await;
    let second: Vec<Vec<u8>> = staged_script_files(&tree)
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    assert_eq!(first, second);
}

fn staged_script_files(tree: &BuildTree) -> Vec<std::path::PathBuf> {
    vec![
        tree.scripts().join("preinstall"),
        tree.scripts().join("postinstall"),
        tree.scripts().join("links"),
        tree.distribution(),
        tree.uninstall_script(),
        tree.resources().join("welcome.html"),
        tree.resources().join("conclusion.html"),
    ]
}

#[tokio::test]
async fn staging_destroys_previous_tree_contents() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(base(dir.path())).await;
    let tree = BuildTree::new(&spec);

    let stale = tree.root().join("stale.txt");
    std::fs::create_dir_all(tree.root()).unwrap();
    std::fs::write(&stale, "old").unwrap();

    stage(&spec, &tree, &Renderer::new(), &NullReporter)
        .await
        .unwrap();
    assert!(!stale.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn staged_scripts_are_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(base(dir.path())).await;
    let tree = stage_spec(&spec).await;

    for path in [
        tree.scripts().join("preinstall"),
        tree.scripts().join("postinstall"),
        tree.scripts().join("links"),
        tree.uninstall_script(),
        tree.distribution(),
    ] {
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755, "wrong mode on {}", path.display());
    }
}

#[tokio::test]
async fn reporter_receives_progress_messages() {
    let dir = tempfile::tempdir().unwrap();
    let spec = resolve(base(dir.path())).await;
    let tree = BuildTree::new(&spec);
    let reporter = RecordingReporter::default();

    stage(&spec, &tree, &Renderer::new(), &reporter)
        .await
        .unwrap();

    let messages = reporter.messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.starts_with("Cleaning build directory")));
    assert!(messages.iter().any(|m| m.starts_with("Created ")));
}
