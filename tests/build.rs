use mdsite::assets::CopyOutcome;
use mdsite::build::{build_site, Stage, NOT_FOUND_FILE};
use mdsite::config::{Config, Overrides};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const LAYOUT: &str = "<!doctype html>
<html>
<head>
  <title>{{title}} | {{site_title}}</title>
  <base href=\"{{base}}\">
  <link rel=\"stylesheet\" href=\"assets/styles.css\">
</head>
<body>
  <header><a href=\"{{base}}\">{{site_title}}</a></header>
  <main>{{content}}</main>
</body>
</html>
";

struct Project {
    root: TempDir,
}

impl Project {
    fn new() -> Result<Project> {
        let project = Project {
            root: tempfile::tempdir()?,
        };
        project.write("templates/layout.html", LAYOUT)?;
        fs::create_dir_all(project.path("pages"))?;
        Ok(project)
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(path, contents)?;
        Ok(())
    }

    fn config(&self, overrides: Overrides) -> Result<Config> {
        Ok(Config::from_directory(self.root.path(), overrides)?)
    }

    fn output(&self, relative: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path("dist").join(relative))?)
    }
}

/// Every file under `dir`, keyed by its path relative to `dir`.
fn snapshot(dir: &Path) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.insert(
                entry.path().strip_prefix(dir)?.to_owned(),
                fs::read(entry.path())?,
            );
        }
    }
    Ok(files)
}

#[test]
fn builds_clean_urls() -> Result<()> {
    let project = Project::new()?;
    project.write("pages/index.md", "# Home\nHi")?;
    project.write("pages/guide/setup.md", "# Setup\nSteps")?;
    project.write("pages/guide/image.png", "not a page")?;

    let summary = build_site(&project.config(Overrides::default())?)?;
    assert_eq!(summary.pages, 2);
    assert!(summary.collisions.is_empty());

    let home = project.output("index.html")?;
    assert!(home.contains("<title>Home | My Site</title>"));
    assert!(home.contains("<h1>Home</h1>\n<p>Hi</p>"));

    let setup = project.output("guide/setup/index.html")?;
    assert!(setup.contains("<title>Setup | My Site</title>"));
    assert!(setup.contains("<p>Steps</p>"));

    let files = snapshot(&project.path("dist"))?;
    let names: Vec<_> = files.keys().cloned().collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("404.html"),
            PathBuf::from("guide/setup/index.html"),
            PathBuf::from("index.html"),
        ]
    );
    Ok(())
}

#[test]
fn titles_are_escaped_and_defaulted() -> Result<()> {
    let project = Project::new()?;
    project.write("pages/amp.md", "# A & B <i>\n\ntext")?;
    project.write("pages/plain.md", "no heading here\n\n## only a subheading")?;

    let overrides = Overrides {
        site_title: Some(String::from("Q&A <Site>")),
        ..Overrides::default()
    };
    build_site(&project.config(overrides)?)?;

    let amp = project.output("amp/index.html")?;
    assert!(amp.contains("<title>A &amp; B &lt;i&gt; | Q&amp;A &lt;Site&gt;</title>"));
    assert!(!amp.contains("Q&A"));

    let plain = project.output("plain/index.html")?;
    assert!(plain.contains("<title>Untitled | Q&amp;A &lt;Site&gt;</title>"));
    Ok(())
}

#[test]
fn base_path_is_normalized_everywhere() -> Result<()> {
    let project = Project::new()?;
    project.write("pages/index.md", "# Home")?;

    let overrides = Overrides {
        base_path: Some(String::from("/my-repo")),
        ..Overrides::default()
    };
    build_site(&project.config(overrides)?)?;

    let home = project.output("index.html")?;
    assert!(home.contains("<base href=\"/my-repo/\">"));
    assert!(home.contains("<a href=\"/my-repo/\">My Site</a>"));

    let not_found = project.output(NOT_FOUND_FILE)?;
    assert!(not_found.contains("<base href=\"/my-repo/\">"));
    assert!(not_found.contains("My Site"));
    assert!(not_found.contains("assets/styles.css"));
    Ok(())
}

#[test]
fn missing_assets_are_not_an_error() -> Result<()> {
    let project = Project::new()?;
    project.write("pages/index.md", "# Home")?;

    let summary = build_site(&project.config(Overrides::default())?)?;
    assert_eq!(summary.assets, CopyOutcome::SourceAbsent);
    assert!(!project.path("dist/assets").exists());
    assert!(project.path("dist").join(NOT_FOUND_FILE).is_file());
    Ok(())
}

#[test]
fn assets_are_mirrored() -> Result<()> {
    let project = Project::new()?;
    project.write("pages/index.md", "# Home")?;
    project.write("assets/styles.css", "body { margin: 0 }")?;
    project.write("assets/fonts/serif/regular.woff2", "font bytes")?;

    let summary = build_site(&project.config(Overrides::default())?)?;
    assert_eq!(summary.assets, CopyOutcome::Copied { files: 2 });

    let source = snapshot(&project.path("assets"))?;
    let copied = snapshot(&project.path("dist/assets"))?;
    assert_eq!(source, copied);
    Ok(())
}

#[test]
fn rebuilds_are_identical_and_clear_stale_output() -> Result<()> {
    let project = Project::new()?;
    project.write("pages/index.md", "# Home\nHi")?;
    project.write("pages/a/b/c.md", "# Deep")?;
    project.write("assets/styles.css", "body {}")?;
    let config = project.config(Overrides::default())?;

    build_site(&config)?;
    let first = snapshot(&config.output_directory)?;

    project.write("dist/stale.html", "left over")?;
    build_site(&config)?;
    let second = snapshot(&config.output_directory)?;

    assert_eq!(first, second);
    assert!(!config.output_directory.join("stale.html").exists());
    Ok(())
}

#[test]
fn project_file_is_honoured() -> Result<()> {
    let project = Project::new()?;
    project.write(
        "mdsite.yaml",
        "site_title: Handbook\nbase_path: /handbook\npages: content\noutput: public\n",
    )?;
    project.write("content/index.md", "# Welcome")?;

    let config = project.config(Overrides::default())?;
    build_site(&config)?;

    let home = fs::read_to_string(project.path("public/index.html"))?;
    assert!(home.contains("<title>Welcome | Handbook</title>"));
    assert!(home.contains("<base href=\"/handbook/\">"));
    Ok(())
}

#[test]
fn missing_page_root_is_fatal() -> Result<()> {
    let project = Project::new()?;
    fs::remove_dir(project.path("pages"))?;

    let err = build_site(&project.config(Overrides::default())?).unwrap_err();
    assert_eq!(err.stage(), Stage::PagesBuilt);
    assert!(!project.path("dist").join(NOT_FOUND_FILE).exists());
    Ok(())
}
