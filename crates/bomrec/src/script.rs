//! Windows batch script that copies the located files into the target layout

use ahash::AHashSet;

use crate::inventory::ExtensionFamily;

/// Line separator of the emitted script
pub const LINE_SEPARATOR: &str = "\r\n";

/// Build the guarded copy command for one file
pub fn copy_command(
    source_path: &str,
    target_path: &str,
    family: ExtensionFamily,
    real_name: &str,
) -> String {
    format!(
        r#"if exist "{src}\{name}" copy "{src}\{name}" "{dst}\{folder}\{name}" > nul"#,
        src = source_path,
        dst = target_path,
        folder = family.folder(),
        name = real_name,
    )
}

/// Insertion-ordered set of copy commands, deduplicated by their text
#[derive(Debug, Default, Clone)]
pub struct CopyCommandSet {
    commands: Vec<String>,
    seen: AHashSet<String>,
}

impl CopyCommandSet {
    /// Add a command; returns false if the same command was already present
    pub fn insert(&mut self, command: String) -> bool {
        if self.seen.contains(&command) {
            return false;
        }
        self.seen.insert(command.clone());
        self.commands.push(command);
        true
    }

    /// Commands in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// The copy script of one run
#[derive(Debug, Clone)]
pub struct CopyScript {
    source_path: String,
    target_path: String,
    commands: CopyCommandSet,
}

impl CopyScript {
    pub fn new(source_path: &str, target_path: &str, commands: CopyCommandSet) -> Self {
        Self {
            source_path: source_path.to_string(),
            target_path: target_path.to_string(),
            commands,
        }
    }

    /// Deduplicated copy commands
    pub fn commands(&self) -> &CopyCommandSet {
        &self.commands
    }

    /// Script lines, without separators
    pub fn lines(&self) -> Vec<String> {
        let src = &self.source_path;
        let dst = &self.target_path;

        let mut lines = vec![
            "@echo off".to_string(),
            // UTF-8 code page so accented paths survive
            "chcp 65001 > nul".to_string(),
            format!(r#"echo Avvio copia file da "{}" a "{}"..."#, src, dst),
            format!(r#"if not exist "{dst}" mkdir "{dst}""#, dst = dst),
        ];

        for family in ExtensionFamily::ALL {
            lines.push(format!(
                r#"if not exist "{dst}\{folder}" mkdir "{dst}\{folder}""#,
                dst = dst,
                folder = family.folder()
            ));
        }

        lines.push(String::new());
        lines.extend(self.commands.iter().map(str::to_string));
        lines.push(String::new());
        lines.push("echo Operazione completata.".to_string());
        lines.push("pause".to_string());
        lines
    }

    /// Full script text, CRLF separated
    pub fn render(&self) -> String {
        self.lines().join(LINE_SEPARATOR)
    }
}
