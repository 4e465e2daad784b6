//! The library code for the `scriv` static blog generator. A build is one
//! sequential pass with four steps, stitched together by
//! [`build::build_site`]:
//!
//! 1. Preparing the output directory and copying static files into it
//!    ([`crate::prepare`])
//! 2. Finding the markdown post sources ([`crate::parser::source_files`])
//! 3. Rendering each post into a standalone HTML page ([`crate::write`])
//! 4. Writing `posts/index.json`, newest post first ([`crate::index`])
//!
//! Front-matter parsing and markdown rendering sit behind the
//! [`parser::FrontMatterParser`] and [`markdown::MarkdownRenderer`] traits.
//! A post with broken metadata still gets a page; only I/O problems stop the
//! build.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod index;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod prepare;
pub mod write;
