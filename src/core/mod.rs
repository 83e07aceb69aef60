//! Core building blocks: tagger parameters and the CoNLL output parser.
//! These are consumed by the high-level `api` module.
pub mod params;
pub mod parse;
