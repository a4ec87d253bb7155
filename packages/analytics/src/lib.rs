#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering and aggregation over loaded freezing-zone records.
//!
//! Every function borrows its input and returns either a subsequence of
//! it (filters, ranking) or a freshly computed aggregate. Nothing here
//! fabricates records or mutates them.

pub mod aggregate;
pub mod filters;

pub use aggregate::{
    group_sum, group_sum_by, mean_casualties, mean_occurrences, sorted_totals, summarize, top_n,
    top_n_by,
};
pub use filters::{district_options, filter_by_district, filter_by_province, province_options};
