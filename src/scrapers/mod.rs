//! The extraction pipeline.
//!
//! Leaves first:
//!
//! | Module | Role |
//! |--------|------|
//! | [`fetch`] | One GET per call, returning raw markup |
//! | [`dates`] | Loose date text to a calendar date |
//! | [`markup`] | Selectors for the site's landmarks |
//! | [`resolver`] | Literal href, then rebuilt URLs, until one serves an article |
//! | [`assembler`] | Speech text, following nested tables of contents |
//! | [`orchestrator`] | Listing fan-out, result collection, final sort |
//!
//! Parsed documents never cross an `.await`: fetchers return a [`fetch::Page`]
//! and each stage parses it, pulls out owned values, and drops the tree
//! before making its next request.

pub mod assembler;
pub mod dates;
pub mod fetch;
pub mod markup;
pub mod orchestrator;
pub mod resolver;
