//! End-to-end runs against a local HTTP server

use std::sync::Arc;

use css_purge::pipeline::SplitIndex;
use css_purge::{HttpFetcher, PageSource, PurgeConfig, PurgeError, StylesheetOrigin, run};
use tempfile::TempDir;

struct Site {
    server: mockito::ServerGuard,
}

impl Site {
    async fn start() -> Self {
        let server = mockito::Server::new_async().await;
        Self { server }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server.url())
    }

    async fn serve(&mut self, path: &str, status: usize, body: &str) {
        self.server
            .mock("GET", path)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;
    }
}

async fn site_with_page() -> Site {
    let mut site = Site::start().await;
    let page = format!(
        r#"<html><head>
            <link rel="stylesheet" href="{main}">
            <link rel="stylesheet" href="{fonts}">
            <link rel="stylesheet" href="{missing}">
            <link rel="stylesheet" href="{wide}" media="(min-width: 961px)">
            <link rel="stylesheet" href="/relative/ignored.css">
        </head><body>
            <header class="masthead font-a"><nav class="menu">Menu</nav></header>
        </body></html>"#,
        main = site.url("/css/main.css"),
        fonts = site.url("/css/fonts.css"),
        missing = site.url("/css/missing.css"),
        wide = site.url("/css/wide.css"),
    );
    site.serve("/page.html", 200, &page).await;
    site.serve(
        "/css/main.css",
        200,
        ".masthead{background:url(../img/bg.png)}.menu{display:flex}.footer{color:gray}",
    )
    .await;
    site.serve("/css/missing.css", 404, "").await;
    site.serve("/css/wide.css", 200, ".menu{padding:0 2em}.sidebar{width:30%}")
        .await;
    site
}

fn config_for(tmp: &TempDir) -> Arc<PurgeConfig> {
    let fonts = tmp.path().join("fonts.css");
    std::fs::write(&fonts, ".font-a{font-family:serif}.font-b{font-family:sans-serif}").unwrap();
    Arc::new(
        PurgeConfig::builder()
            .override_file("fonts.css", fonts)
            .output_dir(tmp.path().join("out"))
            .build()
            .unwrap(),
    )
}

#[tokio::test]
async fn test_unsplit_run_writes_purged_css() {
    let site = site_with_page().await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&tmp);
    let fetcher = HttpFetcher::new(&config).unwrap();
    let source = PageSource::Url(site.url("/page.html"));

    let (output, workspace) = run(&source, config, &fetcher, false).await.unwrap();

    let css = std::fs::read_to_string(workspace.root().join("purged.css")).unwrap();
    assert_eq!(css, output.css);
    assert!(workspace.root().join("page.html").exists());

    // relative asset rewritten against the stylesheet URL
    assert!(css.contains(&site.url("/img/bg.png")), "{css}");
    assert!(css.contains(".menu"), "{css}");
    assert!(css.contains(".font-a"), "{css}");
    assert!(!css.contains(".footer"), "{css}");
    assert!(!css.contains(".font-b"), "{css}");
    assert!(!css.contains(".sidebar"), "{css}");
    assert!(css.contains("@media (min-width:961px)"), "{css}");

    let origins: Vec<_> = output
        .report
        .resolved
        .iter()
        .map(|r| (r.file_name.as_str(), r.origin))
        .collect();
    assert_eq!(
        origins,
        vec![
            ("main.css", StylesheetOrigin::Remote),
            ("fonts.css", StylesheetOrigin::LocalOverride),
            ("wide.css", StylesheetOrigin::Remote),
        ]
    );
    assert_eq!(output.report.skipped.len(), 1);
    assert!(output.report.skipped[0].url.ends_with("/css/missing.css"));
}

#[tokio::test]
async fn test_split_run_writes_groups_and_index() {
    let site = site_with_page().await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&tmp);
    let fetcher = HttpFetcher::new(&config).unwrap();
    let source = PageSource::Url(site.url("/page.html"));

    let (output, workspace) = run(&source, config, &fetcher, true).await.unwrap();
    let split = output.split.expect("split requested");

    let dir = workspace.split_dir();
    let index: SplitIndex =
        serde_json::from_str(&std::fs::read_to_string(dir.join("index.json")).unwrap()).unwrap();
    assert_eq!(index.entries.len(), split.len());
    assert_eq!(index.entries[0].key, "base");

    for entry in &index.entries {
        let written = std::fs::read_to_string(dir.join(&entry.file_name)).unwrap();
        assert_eq!(written, split.get(&entry.key).unwrap().css);
    }

    let base = std::fs::read_to_string(dir.join("base.css")).unwrap();
    assert!(!base.contains("@media"), "{base}");
    let media = std::fs::read_to_string(dir.join("media-min-width-961px.css")).unwrap();
    assert!(media.contains(".menu"), "{media}");
    assert!(!media.contains("@media"), "{media}");
    assert!(!workspace.root().join("purged.css").exists());
}

#[tokio::test]
async fn test_missing_override_aborts_run() {
    let site = site_with_page().await;
    let tmp = TempDir::new().unwrap();
    let config = Arc::new(
        PurgeConfig::builder()
            .override_file("fonts.css", tmp.path().join("not-there.css"))
            .output_dir(tmp.path().join("out"))
            .build()
            .unwrap(),
    );
    let fetcher = HttpFetcher::new(&config).unwrap();
    let source = PageSource::Url(site.url("/page.html"));

    let err = run(&source, config, &fetcher, false).await.unwrap_err();
    assert!(matches!(err, PurgeError::OverrideFileMissing { .. }), "{err:?}");
    assert!(err.user_message().contains("not-there.css"));
}

#[tokio::test]
async fn test_page_without_stylesheets() {
    let mut site = Site::start().await;
    site.serve("/bare.html", 200, "<html><body><p>hi</p></body></html>")
        .await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&tmp);
    let fetcher = HttpFetcher::new(&config).unwrap();

    let err = run(&PageSource::Url(site.url("/bare.html")), config, &fetcher, false)
        .await
        .unwrap_err();
    assert!(err.is_empty_result());
    assert_eq!(err.user_message(), "No external CSS files found on the provided page");
}

#[tokio::test]
async fn test_local_page_file() {
    let mut site = Site::start().await;
    site.serve("/a.css", 200, ".kept{top:0}.dropped{top:1px}").await;
    let tmp = TempDir::new().unwrap();
    let page = tmp.path().join("index.html");
    std::fs::write(
        &page,
        format!(
            r#"<link rel="stylesheet" href="{}"><div class="kept"></div>"#,
            site.url("/a.css")
        ),
    )
    .unwrap();
    let config = config_for(&tmp);
    let fetcher = HttpFetcher::new(&config).unwrap();

    let (output, _) = run(&PageSource::File(page), config, &fetcher, false)
        .await
        .unwrap();
    assert_eq!(output.css, ".kept{top:0}");
}
