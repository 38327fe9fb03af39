//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: resetting the output directory,
//! loading the layout ([`crate::template`]), rendering every page
//! ([`crate::walk`]), copying the static assets ([`crate::assets`]) and writing
//! the `404.html` fallback document.

use crate::assets::{self, CopyOutcome};
use crate::config::Config;
use crate::template::{self, escape_html, Template};
use crate::walk::{self, Collision, Walker};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// The directory under the output root that receives the asset tree.
pub const ASSETS_OUTPUT_DIRECTORY: &str = "assets";

/// The name of the fallback document served for unmatched routes.
pub const NOT_FOUND_FILE: &str = "404.html";

/// The steps of a build, in the order they complete. An error carries the
/// step that was in progress when it occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    OutputReset,
    TemplateLoaded,
    PagesBuilt,
    AssetsCopied,
    FallbackWritten,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Stage::OutputReset => "resetting the output directory",
            Stage::TemplateLoaded => "loading the template",
            Stage::PagesBuilt => "building pages",
            Stage::AssetsCopied => "copying assets",
            Stage::FallbackWritten => "writing the fallback page",
        })
    }
}

/// What a successful build produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildSummary {
    /// The number of pages written.
    pub pages: usize,

    /// The asset copy result; [`CopyOutcome::SourceAbsent`] if there were no
    /// assets to copy.
    pub assets: CopyOutcome,

    /// Output paths written by more than one page.
    pub collisions: Vec<Collision>,
}

/// Builds the site described by `config`. The output directory is emptied
/// first, so a failed build may leave it incomplete. Calls into
/// [`Walker::walk`] and [`assets::copy_assets`], which do the heavy lifting.
pub fn build_site(config: &Config) -> Result<BuildSummary> {
    let output = &config.output_directory;

    reset_dir(output)?;
    debug!(stage = ?Stage::OutputReset, output = %output.display());

    let template = Template::load(&config.template_file)?;
    debug!(stage = ?Stage::TemplateLoaded, template = %config.template_file.display());

    let walker = Walker {
        template: &template,
        site_title: &config.site_title,
        base: &config.base_path,
        output_root: output,
    };
    let pages = walker.walk(&config.pages_directory)?;
    debug!(stage = ?Stage::PagesBuilt, pages = pages.pages);

    let assets = assets::copy_assets(
        &config.assets_directory,
        &output.join(ASSETS_OUTPUT_DIRECTORY),
    )?;
    if assets == CopyOutcome::SourceAbsent {
        warn!(
            assets = %config.assets_directory.display(),
            "asset directory not found; skipping assets"
        );
    }
    debug!(stage = ?Stage::AssetsCopied, ?assets);

    write_not_found(output, &config.site_title, &config.base_path)?;
    debug!(stage = ?Stage::FallbackWritten);

    info!(
        pages = pages.pages,
        collisions = pages.collisions.len(),
        "built site"
    );
    Ok(BuildSummary {
        pages: pages.pages,
        assets,
        collisions: pages.collisions,
    })
}

/// Renders the fallback document: the site title, a `<base>` tag, the site
/// stylesheet, and a link back to the home page.
pub fn not_found_page(site_title: &str, base: &str) -> String {
    format!(
        r#"<!doctype html><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
  <title>404 — {site_title}</title>
  <base href="{base}">
  <link rel="stylesheet" href="assets/styles.css">
  <main class="container"><h1>Page not found</h1><p>Try the <a href="./">home page</a>.</p></main>"#,
        site_title = escape_html(site_title),
        base = base,
    )
}

fn write_not_found(output: &Path, site_title: &str, base: &str) -> Result<()> {
    let path = output.join(NOT_FOUND_FILE);
    fs::write(&path, not_found_page(site_title, base))
        .map_err(|err| Error::WriteFallback { path, err })
}

/// Removes `dir` and everything under it, if it exists, then recreates it
/// empty.
fn reset_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(Error::Clean {
                path: dir.to_owned(),
                err,
            })
        }
    }
    fs::create_dir_all(dir).map_err(|err| Error::Clean {
        path: dir.to_owned(),
        err,
    })
}

/// The result of a build.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can come from cleaning the
/// output directory, loading the template, writing pages, copying assets or
/// writing the fallback document.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned for I/O problems while resetting the output directory.
    #[error("Cleaning directory '{}': {err}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// Returned when the template can't be loaded.
    #[error("loading the template: {0}")]
    Template(#[from] template::Error),

    /// Returned for errors reading or writing pages.
    #[error("building pages: {0}")]
    Walk(#[from] walk::Error),

    /// Returned for asset copy failures other than a missing asset directory.
    #[error("copying assets: {0}")]
    Assets(#[from] assets::Error),

    /// Returned when `404.html` can't be written.
    #[error("Writing fallback page '{}': {err}", .path.display())]
    WriteFallback {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
}

impl Error {
    /// The stage that was in progress when the error occurred.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Clean { .. } => Stage::OutputReset,
            Error::Template(_) => Stage::TemplateLoaded,
            Error::Walk(_) => Stage::PagesBuilt,
            Error::Assets(_) => Stage::AssetsCopied,
            Error::WriteFallback { .. } => Stage::FallbackWritten,
        }
    }
}
