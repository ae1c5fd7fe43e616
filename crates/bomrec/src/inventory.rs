//! Case-insensitive index of the design files available on disk

use std::fmt;

use ahash::AHashMap;
use serde::Serialize;

/// Tracked file extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Pdf,
    Dwg,
    Stp,
    Step,
}

impl Extension {
    /// Every tracked extension
    pub const ALL: [Extension; 4] = [
        Extension::Pdf,
        Extension::Dwg,
        Extension::Stp,
        Extension::Step,
    ];

    /// Uppercase suffix without the dot
    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Pdf => "PDF",
            Extension::Dwg => "DWG",
            Extension::Stp => "STP",
            Extension::Step => "STEP",
        }
    }

    /// Recognize the extension of a file name (text after the last dot)
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        let ext = ext.to_ascii_uppercase();
        Self::ALL.into_iter().find(|e| e.as_str() == ext)
    }

    /// Family (and destination folder) the extension belongs to
    pub fn family(&self) -> ExtensionFamily {
        match self {
            Extension::Pdf => ExtensionFamily::Pdf,
            Extension::Dwg => ExtensionFamily::Dwg,
            Extension::Stp | Extension::Step => ExtensionFamily::Step,
        }
    }
}

/// Logical file groups reported per BOM row.
/// STEP covers both `.stp` and `.step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ExtensionFamily {
    Pdf,
    Dwg,
    Step,
}

impl ExtensionFamily {
    /// Families in the order they are looked up for each row
    pub const ALL: [ExtensionFamily; 3] = [
        ExtensionFamily::Pdf,
        ExtensionFamily::Dwg,
        ExtensionFamily::Step,
    ];

    /// Name of the destination subfolder
    pub fn folder(&self) -> &'static str {
        match self {
            ExtensionFamily::Pdf => "PDF",
            ExtensionFamily::Dwg => "DWG",
            ExtensionFamily::Step => "STEP",
        }
    }

    /// Extensions searched for this family, in lookup order
    pub fn extensions(&self) -> &'static [Extension] {
        match self {
            ExtensionFamily::Pdf => &[Extension::Pdf],
            ExtensionFamily::Dwg => &[Extension::Dwg],
            ExtensionFamily::Step => &[Extension::Stp, Extension::Step],
        }
    }
}

impl fmt::Display for ExtensionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

/// Files available in the source folder.
///
/// Exact lookups go through an uppercase name map that remembers the real
/// on-disk spelling. Drawings are also kept in encounter order for prefix
/// searches.
#[derive(Debug, Default)]
pub struct FileInventory {
    exact: AHashMap<String, String>,
    drawings: Vec<String>,
}

impl FileInventory {
    /// Index a flat list of file names; untracked extensions are ignored
    pub fn build<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inventory = FileInventory::default();
        let mut ignored = 0usize;

        for name in names {
            let name = name.as_ref();
            match Extension::from_file_name(name) {
                Some(ext) => {
                    inventory.exact.insert(name.to_uppercase(), name.to_string());
                    if ext == Extension::Dwg {
                        inventory.drawings.push(name.to_string());
                    }
                }
                None => ignored += 1,
            }
        }

        log::debug!(
            "file inventory: {} tracked files ({} drawings), {} ignored",
            inventory.exact.len(),
            inventory.drawings.len(),
            ignored
        );

        inventory
    }

    /// Real name of `file_name`, compared case-insensitively
    pub fn find_exact(&self, file_name: &str) -> Option<&str> {
        self.exact.get(&file_name.to_uppercase()).map(String::as_str)
    }

    /// Drawings whose name starts with `prefix`, case-insensitively, in encounter order
    pub fn find_drawings_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_uppercase();
        self.drawings
            .iter()
            .filter(|name| name.to_uppercase().starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }

    /// Number of tracked files
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
