//! Build configuration. A [`Config`] is resolved once at startup from three
//! layers, highest precedence first: explicit [`Overrides`] (CLI flags and the
//! `SITE_TITLE` / `BASE_PATH` environment variables), the optional
//! `mdsite.yaml` project file, and built-in defaults. It is immutable after
//! that and passed by reference to [`crate::build::build_site`].

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The name of the optional project file, looked up in the root directory.
pub const PROJECT_FILE: &str = "mdsite.yaml";

pub const DEFAULT_SITE_TITLE: &str = "My Site";
pub const DEFAULT_BASE_PATH: &str = "/";

const DEFAULT_PAGES_DIRECTORY: &str = "pages";
const DEFAULT_ASSETS_DIRECTORY: &str = "assets";
const DEFAULT_TEMPLATE_FILE: &str = "templates/layout.html";
const DEFAULT_OUTPUT_DIRECTORY: &str = "dist";

/// The contents of `mdsite.yaml`. Paths are relative to the file's
/// directory.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    site_title: Option<String>,
    base_path: Option<String>,
    pages: Option<PathBuf>,
    assets: Option<PathBuf>,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
}

/// Values that take precedence over the project file. Empty strings count as
/// unset, so `SITE_TITLE=` behaves like no `SITE_TITLE` at all.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub site_title: Option<String>,
    pub base_path: Option<String>,
    pub pages: Option<PathBuf>,
    pub assets: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Everything a build needs to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The root of the markdown page tree.
    pub pages_directory: PathBuf,

    /// The root of the static asset tree. It may not exist.
    pub assets_directory: PathBuf,

    /// The layout every page is rendered through.
    pub template_file: PathBuf,

    /// The output root. It is deleted and recreated by every build.
    pub output_directory: PathBuf,

    /// The site title, unescaped.
    pub site_title: String,

    /// The base path prefix. Always ends in `/`.
    pub base_path: String,
}

impl Config {
    /// Resolves the configuration for the project rooted at `root`, reading
    /// `{root}/mdsite.yaml` if it exists.
    pub fn from_directory(root: &Path, overrides: Overrides) -> Result<Config> {
        let path = root.join(PROJECT_FILE);
        let project = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_yaml::from_str(&contents).map_err(|err| Error::Parse { path, err })?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Project::default(),
            Err(err) => return Err(Error::Read { path, err }),
        };
        Ok(Config::resolve(root, project, overrides))
    }

    fn resolve(root: &Path, project: Project, overrides: Overrides) -> Config {
        let Project {
            site_title,
            base_path,
            pages,
            assets,
            template,
            output,
        } = project;
        let path = |cli: Option<PathBuf>, file: Option<PathBuf>, default: &str| match cli {
            Some(path) => path,
            None => root.join(file.unwrap_or_else(|| PathBuf::from(default))),
        };

        Config {
            pages_directory: path(overrides.pages, pages, DEFAULT_PAGES_DIRECTORY),
            assets_directory: path(overrides.assets, assets, DEFAULT_ASSETS_DIRECTORY),
            template_file: path(overrides.template, template, DEFAULT_TEMPLATE_FILE),
            output_directory: path(overrides.output, output, DEFAULT_OUTPUT_DIRECTORY),
            site_title: non_empty(overrides.site_title)
                .or_else(|| non_empty(site_title))
                .unwrap_or_else(|| DEFAULT_SITE_TITLE.to_owned()),
            base_path: normalize_base_path(
                non_empty(overrides.base_path)
                    .or_else(|| non_empty(base_path))
                    .as_deref()
                    .unwrap_or(DEFAULT_BASE_PATH),
            ),
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Appends a trailing `/` to `base` if it lacks one. An empty base becomes
/// `/`.
pub fn normalize_base_path(base: &str) -> String {
    if base.ends_with('/') {
        base.to_owned()
    } else {
        format!("{}/", base)
    }
}

/// The result of a configuration operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project file.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the project file exists but can't be read.
    #[error("Reading project file '{}': {err}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// Returned when the project file isn't valid YAML or has unknown keys.
    #[error("Loading configuration from '{}': {err}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        err: serde_yaml::Error,
    },
}
