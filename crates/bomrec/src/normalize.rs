//! Key normalization and composite keys

use bomrec_core::CellValue;

/// Canonical comparable form of a cell: stringified, trimmed, uppercased.
/// Empty cells normalize to `""`.
pub fn normalize(value: &CellValue) -> String {
    normalize_str(&value.to_text())
}

/// [`normalize`] for text that is already a string
pub fn normalize_str(value: &str) -> String {
    value.trim().to_uppercase()
}

/// `code|configuration|revision`, from already normalized parts
pub fn full_key(code: &str, config: &str, revision: &str) -> String {
    format!("{}|{}|{}", code, config, revision)
}

/// `code|configuration`, from already normalized parts
pub fn partial_key(code: &str, config: &str) -> String {
    format!("{}|{}", code, config)
}

/// Normalized code/configuration/revision triple read from one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub code: String,
    pub config: String,
    pub revision: String,
}

impl RecordKey {
    /// Normalize the three cells of a row
    pub fn from_cells(code: &CellValue, config: &CellValue, revision: &CellValue) -> Self {
        Self {
            code: normalize(code),
            config: normalize(config),
            revision: normalize(revision),
        }
    }

    /// Rows with a blank code carry no identity
    pub fn is_keyed(&self) -> bool {
        !self.code.is_empty()
    }

    pub fn full(&self) -> String {
        full_key(&self.code, &self.config, &self.revision)
    }

    pub fn partial(&self) -> String {
        partial_key(&self.code, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(&CellValue::Empty), "");
        assert_eq!(normalize(&" ba001218 ".into()), "BA001218");
        assert_eq!(normalize(&CellValue::Number(1.0)), "1");
        assert_eq!(normalize(&"\t-01a\n".into()), "-01A");
    }

    #[test]
    fn test_keys() {
        let key = RecordKey::from_cells(&"ba1".into(), &" cfg1".into(), &"a".into());
        assert_eq!(key.full(), "BA1|CFG1|A");
        assert_eq!(key.partial(), "BA1|CFG1");
        assert!(key.is_keyed());

        let blank = RecordKey::from_cells(&"  ".into(), &"X".into(), &"A".into());
        assert!(!blank.is_keyed());
    }
}
