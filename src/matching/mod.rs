//! Reference matching and naming engine.
//!
//! Raw schedule references flow through [`normalize`], are compared against
//! register titles by [`find_matches`], and every match is turned into a
//! group label ([`extract_group_label`]) and an output file name
//! ([`generate_filename`]). [`MatchPlan`] runs the whole pipeline for a set of
//! references. Everything here is pure; file-system work lives in
//! [`crate::process`].

pub mod filename;
pub mod group;
pub mod normalize;
pub mod plan;
pub mod title;

pub use filename::{folder_name, generate_filename, output_location, source_file_name, split_file_name};
pub use group::extract_group_label;
pub use normalize::normalize;
pub use plan::{InvalidReference, MatchPlan, RecognisedDrawing, ReferencePlan};
pub use title::{ParsedTitle, find_matches, matching_rule};
