//! The library code for the `mdsite` static site generator. A build is a
//! single sequential pass:
//!
//! 1. Resolving the [`config::Config`] (CLI flags, environment, `mdsite.yaml`)
//! 2. Resetting the output directory and loading the layout
//!    ([`template::Template`])
//! 3. Walking the page tree ([`walk`]), where each markdown file is rendered
//!    ([`markdown`]), templated, and written to its clean-URL location
//!    ([`page::output_path`])
//! 4. Mirroring the static asset tree ([`assets`])
//! 5. Writing the `404.html` fallback document
//!
//! Steps 2 through 5 are driven by [`build::build_site`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod assets;
pub mod build;
pub mod config;
pub mod markdown;
pub mod page;
pub mod template;
pub mod walk;
