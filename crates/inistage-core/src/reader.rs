//! Main IniReader type for inistage
//!
//! IniReader is the primary interface for loading INI text and querying
//! values with placeholder substitution.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::parser::{self, ParseOptions};
use crate::resolver::Resolver;
use crate::store::Store;

/// A parsed INI document
///
/// The underlying [`Store`] is shared and never mutated, so clones are
/// cheap and queries can run from several threads at once.
#[derive(Debug, Clone)]
pub struct IniReader {
    store: Arc<Store>,
}

impl IniReader {
    fn new(store: Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Load from INI text
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_text_with_options(text, &ParseOptions::default())
    }

    /// Load from INI text with options
    pub fn from_text_with_options(text: &str, options: &ParseOptions) -> Result<Self> {
        Ok(Self::new(parser::parse(text, options)?))
    }

    /// Load from a UTF-8 byte buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(bytes, &ParseOptions::default())
    }

    /// Load from a UTF-8 byte buffer with options
    pub fn from_bytes_with_options(bytes: &[u8], options: &ParseOptions) -> Result<Self> {
        Self::from_text_with_options(decode(bytes)?, options)
    }

    /// Load from any reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::from_bytes(&buf)
    }

    /// Load from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_options(path, &ParseOptions::default())
    }

    /// Load from a file with options
    pub fn from_file_with_options(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        Ok(Self::new(parse_file(path.as_ref(), options)?))
    }

    /// Load and merge multiple files
    ///
    /// Files are parsed in order; a key assigned in a later file replaces
    /// the value from an earlier one.
    pub fn load_merged<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let options = ParseOptions::default();
        let mut merged = Store::default();

        for path in paths {
            merged.overlay(parse_file(path.as_ref(), &options)?);
        }

        log::debug!("Merged {} files into {} entries", paths.len(), merged.len());
        Ok(Self::new(merged))
    }

    /// Fetch INI text from a URL
    #[cfg(feature = "http")]
    pub fn from_url(url: &str) -> Result<Self> {
        use std::time::Duration;

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        let agent: ureq::Agent = config.into();

        let response = agent.get(url).call().map_err(|e| match &e {
            ureq::Error::StatusCode(code) => {
                Error::http_request_failed(url, Some(*code), format!("HTTP {}", code))
            }
            ureq::Error::Timeout(kind) => {
                Error::http_request_failed(url, None, format!("Request timeout: {:?}", kind))
            }
            _ => Error::http_request_failed(url, None, e.to_string()),
        })?;

        Self::from_response(response)
    }

    /// Load from the body of an HTTP response
    #[cfg(feature = "http")]
    pub fn from_response(response: ureq::http::Response<ureq::Body>) -> Result<Self> {
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| Error::io(format!("Failed to read response body: {}", e)))?;
        Self::from_text(&body)
    }

    /// Get an unsectioned value (`.field`)
    pub fn get_value(&self, field: &str) -> Result<String> {
        self.get_by_dot(&["", field])
    }

    /// Get a value from a section (`section.field`)
    pub fn get_section_value(&self, section: &str, field: &str) -> Result<String> {
        self.get_by_dot(&[section, field])
    }

    /// Get a value by key parts joined with `.`
    pub fn get_by_dot<S: AsRef<str>>(&self, key_parts: &[S]) -> Result<String> {
        Resolver::new(&self.store).resolve(key_parts)
    }

    /// Get the raw (unsubstituted) value for a composite key
    pub fn get_raw(&self, key: &str) -> Result<&str> {
        self.store.get(key).ok_or_else(|| Error::key_not_found(key))
    }

    /// Get a resolved value by composite key
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_by_dot(&[key])
    }

    /// Get a resolved integer value
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value
            .parse()
            .map_err(|_| Error::type_coercion(key, "integer", format!("string (\"{}\")", value)))
    }

    /// Get a resolved float value
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let value = self.get_string(key)?;
        value
            .parse()
            .map_err(|_| Error::type_coercion(key, "float", format!("string (\"{}\")", value)))
    }

    /// Get a resolved boolean value
    ///
    /// Only "true" and "false" are accepted, case-insensitively.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key)?;
        match value.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::type_coercion(
                key,
                "boolean",
                format!("string (\"{}\") - only \"true\" or \"false\" allowed", value),
            )),
        }
    }

    /// Resolve every key, in the order keys were first assigned
    pub fn resolve_all(&self) -> Result<IndexMap<String, String>> {
        Resolver::new(&self.store).resolve_all()
    }

    /// Check whether a composite key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Composite keys in the order they were first assigned
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the document has no entries
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Read-only view of the raw store
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl FromStr for IniReader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

fn decode(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| Error::io(format!("Input is not valid UTF-8: {}", e)))
}

/// Read and parse one file, tagging parse errors with its name
fn parse_file(path: &Path, options: &ParseOptions) -> Result<Store> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| Error::io(format!("Failed to read file '{}': {}", path.display(), e)))?;
    if metadata.is_dir() {
        return Err(Error::io(format!(
            "Expected a file but '{}' is a directory",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read file '{}': {}", path.display(), e)))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    log::debug!("Loading {}", path.display());
    parser::parse(decode(&bytes)?, options).map_err(|e| e.with_file(filename))
}
