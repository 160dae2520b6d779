//! inistage-core: INI parsing with placeholder substitution
//!
//! This crate parses INI-style text into a flat store of `section.key`
//! entries and resolves `%(key)s` placeholders at query time.
//!
//! # Example
//!
//! ```rust
//! use inistage_core::IniReader;
//!
//! let ini = "[db]\nhost = localhost\nurl = %(db.host)s:5432\n";
//!
//! let reader = IniReader::from_text(ini).unwrap();
//! assert_eq!(reader.get_section_value("db", "url").unwrap(), "localhost:5432");
//! ```

pub mod error;
pub mod parser;
pub mod placeholder;
pub mod resolver;
pub mod store;

mod reader;

pub use error::{Error, ErrorKind, Result};
pub use parser::{parse, LineBreak, ParseOptions};
pub use reader::IniReader;
pub use resolver::Resolver;
pub use store::Store;
