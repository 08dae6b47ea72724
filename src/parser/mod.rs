use crate::errors::ExtractError;
use regex::bytes::Regex;
use std::path::Path;

/// One `#include` occurrence as written in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Payload between the delimiters, delimiters stripped.
    pub name: String,
    /// `true` for `<...>`, `false` for `"..."`.
    pub is_external: bool,
}

#[derive(Debug, Default)]
pub struct IncludeParser {
    patterns: RegexPatterns,
}

#[derive(Debug)]
pub struct RegexPatterns {
    pub include: Regex,
}

impl RegexPatterns {
    #[must_use]
    pub fn compile() -> Self {
        // Not line-anchored: includes inside comments or disabled #if blocks match too.
        // Byte classes: names may contain bytes that are not UTF-8.
        let include = Regex::new(
            r#"#include[ \t]*(?:<(?P<ext>(?-u:[^<>"\r\n])+)>|"(?P<local>(?-u:[^<>"\r\n])+)")"#,
        )
        .expect("include pattern compiles");
        Self { include }
    }
}

impl Default for RegexPatterns {
    fn default() -> Self {
        Self::compile()
    }
}

impl IncludeParser {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: RegexPatterns::compile() }
    }

    /// Extract include directives from file text, in textual order.
    ///
    /// Duplicates are kept: a file including the same name twice yields two directives.
    /// Names that are not UTF-8 are decoded lossily.
    #[must_use]
    pub fn extract(&self, content: impl AsRef<[u8]>) -> Vec<Directive> {
        self.patterns
            .include
            .captures_iter(content.as_ref())
            .filter_map(|cap| {
                if let Some(m) = cap.name("ext") {
                    Some(Directive { name: decode_name(m.as_bytes()), is_external: true })
                } else {
                    cap.name("local")
                        .map(|m| Directive { name: decode_name(m.as_bytes()), is_external: false })
                }
            })
            .collect()
    }

    /// Read `path` and extract its directives.
    ///
    /// The file handle is closed before this returns, so resolution of the
    /// directives never overlaps with an open read.
    ///
    /// # Errors
    /// Returns `ExtractError` if the file cannot be read.
    pub fn extract_file(&self, path: &Path) -> Result<Vec<Directive>, ExtractError> {
        let content = read_source(path)?;
        Ok(self.extract(&content))
    }
}

fn decode_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Read a source file's raw bytes. No encoding is assumed.
///
/// # Errors
/// Returns `ExtractError::Io` on open/read failure.
pub fn read_source(path: &Path) -> Result<Vec<u8>, ExtractError> {
    std::fs::read(path).map_err(|source| ExtractError::Io { file: path.to_path_buf(), source })
}

/// Entry-point heuristic: do the file's bytes contain `marker` verbatim.
///
/// Unreadable files never qualify.
#[must_use]
pub fn contains_entry_marker(path: &Path, marker: &str) -> bool {
    let needle = marker.as_bytes();
    match read_source(path) {
        Ok(_) if needle.is_empty() => true,
        Ok(content) => content.windows(needle.len()).any(|w| w == needle),
        Err(e) => {
            tracing::warn!("{e}");
            false
        }
    }
}
