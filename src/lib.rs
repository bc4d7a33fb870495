// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (default thresholds)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Molecular scene model and view interpolation engine.
//!
//! Molview parses fixed-column structure text into a flat, index-addressed
//! atom/residue store, derives bonds, traces and secondary structure, and
//! keeps a set of saved views that a tick-driven animator flies between.
//! It does no rendering: hosts read the [`soup::Soup`] and the current
//! [`view::View`] each frame and draw however they like.
//!
//! # Key entry points
//!
//! - [`controller::SceneController`] - owns the scene and dispatches every
//!   interactive operation
//! - [`soup::Soup`] - loaded structures plus derived topology
//! - [`view::ViewModel`] - saved views, navigation and the camera animator
//! - [`scheduler::Scheduler`] - converts wall-clock time into animation ticks
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Pipeline
//!
//! Loading is asynchronous only at its edges: a [`data_source::DataServer`]
//! supplies text and persisted views, and progress is reported through
//! [`controller::LoadProgress`]. Parsing, topology and view construction
//! run synchronously between those awaits.

pub mod animation;
pub mod camera;
pub mod controller;
pub mod data_source;
pub mod error;
pub mod options;
pub mod parser;
pub mod scheduler;
pub mod soup;
pub mod store;
pub mod topology;
pub mod view;
