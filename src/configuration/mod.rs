//! Settings of the `confnorm` binary itself, including the table that
//! configures its [`ConfigLoader`][confnorm::ConfigLoader].
//!
//! Your starting point should probably be [`Configuration::load_from_path`]
//! or [`Configuration::load_from_default_path_or_defaults`].
//!
//! # Internals
//! The settings file is deserialized into the [`UnresolvedConfiguration`]
//! structure, whose `resolve` method recursively turns it (and its tables)
//! into validated ("resolved") versions, e.g. checking that level filters parse
//! and that the temporary directory exists.
//!
//! The settings file is itself read through a [`ConfigLoader`][confnorm::ConfigLoader],
//! so it may be stored in any encoding the loader understands.

#![allow(rustdoc::private_intra_doc_links)]

mod structure;
mod traits;
mod utilities;

pub use structure::*;
