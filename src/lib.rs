//! include-tree: static `#include` trees for C and C++ programs.
//!
//! For every source file in a directory that defines a program entry point,
//! print the transitive tree of files it includes, marking external
//! (`<...>`), missing and circular includes.
//!
//! # Features
//! - Textual `#include` scanning (no preprocessor evaluation)
//! - Two-location lookup for `"..."` includes: the including file's directory, then the scanned root
//! - Implementation files (`a.cpp`) surfaced next to the headers they back (`a.h`)
//! - One memoization cache per run, shared by every entry point
//! - Text, JSON and Graphviz DOT output
//!
//! # Quickstart (Library)
//! ```no_run
//! use include_tree::graph::resolver::ArtifactResolver;
//! use include_tree::graph::traversal::IncludeTree;
//! use include_tree::graph::DependencyCache;
//! use include_tree::visualization::format_line;
//!
//! let root = std::path::Path::new("project");
//! let tree = IncludeTree::new(ArtifactResolver::new(root));
//! let mut cache = DependencyCache::new();
//! for event in tree.traverse(&mut cache, &root.join("main.cpp")) {
//!     println!("{}", format_line(&event));
//! }
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! include-tree scan project
//! include-tree scan project --format json --output tree.json
//! ```
//!
//! # Limitations
//! Directives are found with a regular expression: includes inside comments
//! or disabled `#if` blocks are reported, macro-expanded include names are not.
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod utils;
pub mod visualization;
