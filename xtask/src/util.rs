//! Shared utilities for xtask.

use std::io::IsTerminal;
use std::path::{Component, Path, PathBuf};

/// Print an error message, with red color if stderr is a terminal.
pub fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("\x1b[1;31mError:\x1b[0m {}", msg);
    } else {
        eprintln!("Error: {}", msg);
    }
}

/// Print a warning, with yellow color if stderr is a terminal.
pub fn print_warning(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("\x1b[1;33mWarning:\x1b[0m {}", msg);
    } else {
        eprintln!("Warning: {}", msg);
    }
}

/// Print status message (always shown)
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        println!($($arg)*)
    };
}

/// Shorten home directory in path for display
#[must_use]
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = std::env::var_os("HOME") {
        let home_path = PathBuf::from(home);
        if let Ok(stripped) = path.strip_prefix(&home_path) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Workspace root (the directory above `xtask/`).
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
}

/// "my-fuzz" -> "my_fuzz"
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    name.replace('-', "_").to_lowercase()
}

/// "my-fuzz" -> "MY_FUZZ"
#[must_use]
pub fn to_upper_snake_case(name: &str) -> String {
    to_snake_case(name).to_uppercase()
}

/// Convert plugin name to PascalCase for type names.
/// "midi-transform" -> "MidiTransform"
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Resolve `.` and `..` components without touching the filesystem.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Relative path with `/` separators, as written in Cargo manifests.
#[must_use]
pub fn manifest_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Collect files below `dir` recursively, skipping directories named in
/// `skip`. Paths are sorted for stable output.
pub fn walk_files(dir: &Path, skip: &[&str]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current)
            .map_err(|e| format!("Failed to read dir {}: {}", current.display(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
            let path = entry.path();
            let ty = entry
                .file_type()
                .map_err(|e| format!("Failed to get file type: {}", e))?;
            if ty.is_dir() {
                let name = entry.file_name();
                if !skip.iter().any(|s| name == *s) {
                    pending.push(path);
                }
            } else if ty.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("my-fuzz"), "my_fuzz");
        assert_eq!(to_upper_snake_case("my-fuzz"), "MY_FUZZ");
        assert_eq!(to_pascal_case("midi-transform"), "MidiTransform");
    }

    #[test]
    fn normalizes_dot_components() {
        assert_eq!(
            normalize_path(Path::new("/ws/xtask/../plugins/./fuzz")),
            PathBuf::from("/ws/plugins/fuzz")
        );
        assert_eq!(manifest_path(&Path::new("plugins").join("fuzz")), "plugins/fuzz");
    }

    #[test]
    fn walk_skips_named_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/x")).unwrap();
        std::fs::write(dir.path().join("src/a.js"), "").unwrap();
        std::fs::write(dir.path().join("node_modules/x/b.js"), "").unwrap();

        let files = walk_files(dir.path(), &["node_modules"]).unwrap();
        assert_eq!(files, [dir.path().join("src/a.js")]);
    }
}
