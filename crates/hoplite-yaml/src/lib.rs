//! # hoplite-yaml
//!
//! YAML front-end for hoplite.
//!
//! Builds a [`hoplite_core::Node`] tree from the `yaml-rust2` event stream,
//! recording the line, column and source label of every node.
//!
//! ## Example
//!
//! ```rust
//! use hoplite_yaml::parse_node;
//!
//! let node = parse_node("server:\n  port: 8080\n", "app.yml").unwrap();
//! let port = node.at_key("server").at_key("port");
//! assert_eq!(port.path(), Some("<root>.server.port"));
//! assert_eq!(port.pos().source(), Some("app.yml"));
//! ```

mod parser;

pub use parser::{YamlParser, parse_node};
