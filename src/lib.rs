// SPDX-FileCopyrightText: 2026 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! # Gitig
//!
//! Gitig manages named template blocks inside a `.gitignore` file. Templates
//! come from the upstream [github/gitignore] repository, or from a local
//! clone of it, and land in the target file wrapped in tag lines:
//!
//! ```text
//! ##gitig-start:Python
//! __pycache__/
//! ##gitig-end:Python
//! ```
//!
//! Everything outside of tagged blocks belongs to the user and survives
//! every rewrite byte-for-byte. Templates that reference other templates get
//! pulled in, and cleaned up, transitively.
//!
//! [github/gitignore]: https://github.com/github/gitignore

pub mod catalog;
pub mod config;
pub mod document;
pub mod fetch;
pub mod path;
pub mod store;

#[doc(inline)]
pub use crate::{
    catalog::Catalog,
    config::Settings,
    document::IgnoreFile,
    fetch::{Fetch, LocalSource, RemoteSource, TemplateSource},
    store::{Outcome, TemplateStore},
};
