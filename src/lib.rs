//! # clishape - Structured Records from Network Device CLI Output
//!
//! `clishape` turns the free-form text network devices print for show
//! commands into structured data that automation can consume the same way
//! across vendors. It performs no device I/O of its own: output is fetched
//! through a [`transport::Transport`] and handed to one of three parsers.
//!
//! ## Features
//!
//! - **Scalar Extraction**: Named-group regular expressions for single fields
//! - **Template Tables**: Declarative per-command, per-vendor row templates
//! - **Adjacency Grammar**: A small lexer and strict record walker for IS-IS listings
//! - **Vendor Façades**: A uniform capability trait implemented per vendor
//! - **Offline Replay**: JSONL recordings of command output for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use clishape::adjacency::parse_adjacency;
//! use clishape::table::parse_table;
//! use clishape::templates::builtin_index;
//!
//! fn main() -> Result<(), clishape::error::ShapeError> {
//!     let adjacencies = parse_adjacency("ge-0/0/1 router-A 23 2\nge-0/0/2 router-B 9 1\n")?;
//!     assert_eq!(adjacencies[1].hostname, "router-B");
//!
//!     let arp = "MAC Address       Address         Interface                Flags\n\
//!                00:05:86:71:4a:01 10.0.0.1        ge-0/0/0.0               none\n";
//!     let templates = builtin_index()?;
//!     let rows = parse_table("show arp no-resolve", "Juniper", arp, &templates)?;
//!     assert_eq!(rows[0]["address"], "10.0.0.1");
//!     Ok(())
//! }
//! ```
//!
//! ## Main Components
//!
//! - [`extract::FieldPattern`] - Single-shot field extraction
//! - [`table::TemplateIndex`] - Template lookup and table parsing
//! - [`adjacency::tokenize`] / [`adjacency::parse`] - Adjacency grammar
//! - [`device::DeviceCapabilities`] - Per-vendor operations
//! - [`error::ShapeError`] - Error types for every parser and the façades

pub mod adjacency;
pub mod config;
pub mod device;
pub mod error;
pub mod extract;
pub mod table;
pub mod templates;
pub mod transport;
