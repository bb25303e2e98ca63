//! Monthly pull request activity split by core and community contributors.
//!
//! Records fetched from a repository API are normalized with
//! [`pulls::normalize_pulls`] and bucketed per calendar month with
//! [`monthly::monthly_data`].

pub mod contributors;
pub mod error;
pub mod monthly;
pub mod pulls;
pub mod report;
