//! Base file name derivation for BOM rows

use crate::normalize::normalize_str;

/// Characters that cannot appear in Windows file names
const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Derive the stem under which a part's drawings and models are saved.
///
/// `code + revision` when code and configuration are the same item,
/// `code + "_" + configuration + revision` otherwise. The inputs are used as
/// given (only trimmed); normalization is applied to the equality test only.
/// An empty code yields an empty name.
///
/// ```
/// use bomrec::derive_base_name;
///
/// assert_eq!(derive_base_name("BA102262", "BA102262", "A"), "BA102262A");
/// assert_eq!(derive_base_name("BA001218", "RP000005", "-01A"), "BA001218_RP000005-01A");
/// ```
pub fn derive_base_name(code: &str, config: &str, revision: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        return String::new();
    }
    let config = config.trim();
    let revision = revision.trim();

    let base = if normalize_str(code) == normalize_str(config) {
        format!("{}{}", code, revision)
    } else {
        format!("{}_{}{}", code, config, revision)
    };

    sanitize(&base)
}

/// Strip characters that are illegal in file names
pub fn sanitize(name: &str) -> String {
    name.chars().filter(|c| !ILLEGAL_CHARS.contains(c)).collect()
}

/// Two-digit form of a bare single-digit revision (`"1"` -> `"01"`).
/// Anything else has no padded form.
pub fn padded_revision(revision: &str) -> Option<String> {
    let revision = revision.trim();
    let mut chars = revision.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => Some(format!("0{}", c)),
        _ => None,
    }
}

/// Raw code/configuration/revision of a BOM row, with the names derived from them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartName {
    code: String,
    config: String,
    revision: String,
}

impl PartName {
    pub fn new(code: &str, config: &str, revision: &str) -> Self {
        Self {
            code: code.trim().to_string(),
            config: config.trim().to_string(),
            revision: revision.trim().to_string(),
        }
    }

    /// Base name with the revision as written
    pub fn base(&self) -> String {
        derive_base_name(&self.code, &self.config, &self.revision)
    }

    /// Base name with a single-digit revision padded to two digits
    pub fn padded(&self) -> Option<String> {
        padded_revision(&self.revision)
            .map(|rev| derive_base_name(&self.code, &self.config, &rev))
    }
}
