//! Walks the page tree and writes one HTML file per markdown page. See
//! [`Walker::walk`].

use crate::page::{self, Page};
use crate::template::Template;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Renders and writes pages.
pub struct Walker<'a> {
    /// The layout applied to every page.
    pub template: &'a Template,

    /// The site title substituted for `{{site_title}}`.
    pub site_title: &'a str,

    /// The base path substituted for `{{base}}`.
    pub base: &'a str,

    /// The directory pages are written under.
    pub output_root: &'a Path,
}

/// What a walk produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// The number of pages written, including overwritten ones.
    pub pages: usize,

    /// Pages that landed on an output path already written by another page.
    pub collisions: Vec<Collision>,
}

/// Two sources that map to the same output file. The later one wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collision {
    pub output: PathBuf,
    pub overwritten: PathBuf,
    pub winner: PathBuf,
}

impl Walker<'_> {
    /// Visits every directory under `page_root` and writes each `.md` file it
    /// finds. Directories are kept on an explicit work-list and the entries of
    /// each directory are visited in file-name order, so two walks over the
    /// same tree write the same files in the same order. Anything that isn't a
    /// markdown file or a directory is ignored. The first I/O failure aborts
    /// the walk.
    pub fn walk(&self, page_root: &Path) -> Result<WalkSummary> {
        let mut summary = WalkSummary::default();
        let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut pending: Vec<(PathBuf, PathBuf)> = vec![(page_root.to_owned(), PathBuf::new())];

        while let Some((dir, relative_dir)) = pending.pop() {
            let mut subdirs = Vec::new();
            for entry in sorted_entries(&dir)? {
                let file_type = entry.file_type().map_err(|err| Error::ReadDir {
                    path: entry.path(),
                    err,
                })?;
                let file_name = entry.file_name().to_string_lossy().into_owned();

                if file_type.is_dir() {
                    subdirs.push((entry.path(), relative_dir.join(&file_name)));
                } else if page::is_page(&file_name) {
                    let output = self.write_page(entry.path(), relative_dir.clone(), file_name)?;
                    summary.pages += 1;
                    if let Some(previous) = written.insert(output.clone(), entry.path()) {
                        warn!(
                            output = %output.display(),
                            overwritten = %previous.display(),
                            winner = %entry.path().display(),
                            "two pages map to the same output file"
                        );
                        summary.collisions.push(Collision {
                            output,
                            overwritten: previous,
                            winner: entry.path(),
                        });
                    }
                }
            }

            // Reversed so the lowest-named subdirectory is popped first.
            pending.extend(subdirs.into_iter().rev());
        }

        Ok(summary)
    }

    /// Reads, renders and writes a single page. Returns the output path.
    fn write_page(
        &self,
        source_path: PathBuf,
        relative_dir: PathBuf,
        file_name: String,
    ) -> Result<PathBuf> {
        // Invalid UTF-8 is replaced with U+FFFD rather than failing the build.
        let markdown = match fs::read(&source_path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                return Err(Error::ReadPage {
                    path: source_path,
                    err,
                })
            }
        };

        let page = Page::new(source_path, relative_dir, file_name, markdown);
        let output = page.output_path(self.output_root);
        let html = page.render(self.template, self.site_title, self.base);

        // there is always a parent: `output` ends in `index.html`
        if let Some(dir) = output.parent() {
            fs::create_dir_all(dir).map_err(|err| Error::CreateDir {
                path: dir.to_owned(),
                err,
            })?;
        }
        fs::write(&output, html).map_err(|err| Error::WritePage {
            path: output.clone(),
            err,
        })?;

        debug!(
            source = %page.source_path.display(),
            output = %output.display(),
            title = %page.title,
            "wrote page"
        );
        Ok(output)
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let read_dir_err = |err: std::io::Error| Error::ReadDir {
        path: dir.to_owned(),
        err,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(read_dir_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_dir_err)?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// The result of a page-walking operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error walking the page tree. Every variant carries the path
/// that failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when a directory in the page tree can't be listed.
    #[error("Reading page directory '{}': {err}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when a page source can't be read.
    #[error("Reading page '{}': {err}", .path.display())]
    ReadPage {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when an output directory can't be created.
    #[error("Creating output directory '{}': {err}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when a rendered page can't be written.
    #[error("Writing page '{}': {err}", .path.display())]
    WritePage {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}
