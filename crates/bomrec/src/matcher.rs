//! Resolution of derived base names to files in the inventory

use ahash::AHashSet;

use crate::filename::PartName;
use crate::inventory::{ExtensionFamily, FileInventory};
use crate::script::{copy_command, CopyCommandSet};
use crate::stats::FileCounts;

/// Find the files of one family for a part, without recording anything.
///
/// Drawings match by prefix, since drawing files often carry a suffix after
/// the revision (`"... DISTINTA.dwg"`). Everything else must match
/// `<base>.<ext>` exactly. When nothing matches and the revision is a bare
/// single digit, the search is repeated with the revision padded to two digits.
pub fn find_files<'i>(
    inventory: &'i FileInventory,
    part: &PartName,
    family: ExtensionFamily,
) -> Vec<&'i str> {
    let base = part.base();
    if base.is_empty() {
        return Vec::new();
    }
    let padded = part.padded();

    match family {
        ExtensionFamily::Dwg => {
            let found = inventory.find_drawings_with_prefix(&base);
            match padded {
                Some(padded) if found.is_empty() => inventory.find_drawings_with_prefix(&padded),
                _ => found,
            }
        }
        ExtensionFamily::Pdf | ExtensionFamily::Step => family
            .extensions()
            .iter()
            .find_map(|ext| {
                let exact = inventory.find_exact(&format!("{}.{}", base, ext.as_str()));
                exact.or_else(|| {
                    padded.as_ref().and_then(|p| {
                        inventory.find_exact(&format!("{}.{}", p, ext.as_str()))
                    })
                })
            })
            .into_iter()
            .collect(),
    }
}

/// Distinct real file names located during a run, per family
#[derive(Debug, Default)]
pub struct FoundFiles {
    pdf: AHashSet<String>,
    dwg: AHashSet<String>,
    step: AHashSet<String>,
    all: AHashSet<String>,
}

impl FoundFiles {
    /// Record a file; returns false when it was already known for this family
    pub fn insert(&mut self, family: ExtensionFamily, real_name: &str) -> bool {
        self.all.insert(real_name.to_string());
        let set = match family {
            ExtensionFamily::Pdf => &mut self.pdf,
            ExtensionFamily::Dwg => &mut self.dwg,
            ExtensionFamily::Step => &mut self.step,
        };
        set.insert(real_name.to_string())
    }

    /// Distinct files found for a family
    pub fn count(&self, family: ExtensionFamily) -> usize {
        match family {
            ExtensionFamily::Pdf => self.pdf.len(),
            ExtensionFamily::Dwg => self.dwg.len(),
            ExtensionFamily::Step => self.step.len(),
        }
    }

    /// Distinct files found across all families
    pub fn total(&self) -> usize {
        self.all.len()
    }

    pub fn counts(&self) -> FileCounts {
        FileCounts {
            pdf: self.count(ExtensionFamily::Pdf),
            dwg: self.count(ExtensionFamily::Dwg),
            stp: self.count(ExtensionFamily::Step),
        }
    }
}

/// Stateful matcher for one run: looks files up and records every hit once,
/// both in the found sets and as a copy command.
#[derive(Debug)]
pub struct FileMatcher<'a> {
    inventory: &'a FileInventory,
    source_path: &'a str,
    target_path: &'a str,
    found: FoundFiles,
    commands: CopyCommandSet,
}

impl<'a> FileMatcher<'a> {
    pub fn new(inventory: &'a FileInventory, source_path: &'a str, target_path: &'a str) -> Self {
        Self {
            inventory,
            source_path,
            target_path,
            found: FoundFiles::default(),
            commands: CopyCommandSet::default(),
        }
    }

    /// Look up one family for a part and record the hits. Returns the real
    /// names found, possibly none.
    pub fn resolve(&mut self, part: &PartName, family: ExtensionFamily) -> Vec<String> {
        let hits: Vec<String> = find_files(self.inventory, part, family)
            .into_iter()
            .map(str::to_string)
            .collect();

        for real_name in &hits {
            self.found.insert(family, real_name);
            self.commands.insert(copy_command(
                self.source_path,
                self.target_path,
                family,
                real_name,
            ));
        }

        hits
    }

    /// Files found so far
    pub fn found(&self) -> &FoundFiles {
        &self.found
    }

    /// Consume the matcher, returning what it collected
    pub fn finish(self) -> (FoundFiles, CopyCommandSet) {
        (self.found, self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inventory() -> FileInventory {
        FileInventory::build([
            "BA001218_RP000005-01 DISTINTA.dwg",
            "BA001218_RP000005-01.pdf",
            "BA102262A.PDF",
            "BA102262A.step",
            "BA3_CFG3B.stp",
            "BA3_CFG3B.step",
        ])
    }

    #[test]
    fn test_pdf_exact_is_case_insensitive() {
        let inv = inventory();
        let part = PartName::new("ba102262", "BA102262", "a");
        assert_eq!(find_files(&inv, &part, ExtensionFamily::Pdf), vec!["BA102262A.PDF"]);
    }

    #[test]
    fn test_dwg_prefix_match() {
        let inv = inventory();
        let part = PartName::new("BA001218", "RP000005", "-01");
        assert_eq!(
            find_files(&inv, &part, ExtensionFamily::Dwg),
            vec!["BA001218_RP000005-01 DISTINTA.dwg"]
        );
    }

    #[test]
    fn test_padding_fallback_for_exact_and_prefix() {
        let inv = inventory();
        let part = PartName::new("BA001218", "RP000005-", "1");
        assert_eq!(
            find_files(&inv, &part, ExtensionFamily::Pdf),
            vec!["BA001218_RP000005-01.pdf"]
        );
        assert_eq!(
            find_files(&inv, &part, ExtensionFamily::Dwg),
            vec!["BA001218_RP000005-01 DISTINTA.dwg"]
        );
    }

    #[test]
    fn test_no_padding_for_multi_character_revisions() {
        let inv = inventory();
        let part = PartName::new("BA001218", "RP000005-", "1A");
        assert!(find_files(&inv, &part, ExtensionFamily::Pdf).is_empty());
    }

    #[test]
    fn test_step_family_prefers_stp_then_step() {
        let inv = inventory();
        let both = PartName::new("BA3", "CFG3", "B");
        assert_eq!(find_files(&inv, &both, ExtensionFamily::Step), vec!["BA3_CFG3B.stp"]);

        let step_only = PartName::new("BA102262", "BA102262", "A");
        assert_eq!(
            find_files(&inv, &step_only, ExtensionFamily::Step),
            vec!["BA102262A.step"]
        );
    }

    #[test]
    fn test_empty_base_finds_nothing() {
        let inv = FileInventory::build(["_X.pdf", "x.dwg"]);
        let part = PartName::new("  ", "X", "");
        assert!(find_files(&inv, &part, ExtensionFamily::Pdf).is_empty());
        assert!(find_files(&inv, &part, ExtensionFamily::Dwg).is_empty());
    }

    #[test]
    fn test_resolve_records_each_file_once() {
        let inv = inventory();
        let mut matcher = FileMatcher::new(&inv, r"Z:\Disegni", r"C:\Tavole");
        let part = PartName::new("BA102262", "BA102262", "A");

        assert_eq!(matcher.resolve(&part, ExtensionFamily::Pdf).len(), 1);
        assert_eq!(matcher.resolve(&part, ExtensionFamily::Pdf).len(), 1);
        assert_eq!(matcher.found().count(ExtensionFamily::Pdf), 1);

        let (found, commands) = matcher.finish();
        assert_eq!(found.total(), 1);
        assert_eq!(commands.len(), 1);
    }
}
