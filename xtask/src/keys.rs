//! `cargo xtask check-keys`: compare relay keys declared in Rust with the
//! keys the web UI asks for.
//!
//! A relay is found by its key at runtime, so a typo on either side only
//! shows up as a console error in the page. This check catches it at build
//! time instead.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::util::walk_files;

/// Relay kinds, named the way the page names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    Slider,
    Toggle,
    ComboBox,
}

impl Kind {
    fn as_str(self) -> &'static str {
        match self {
            Kind::Slider => "slider",
            Kind::Toggle => "toggle",
            Kind::ComboBox => "comboBox",
        }
    }
}

const RUST_DECLARATIONS: [(&str, Kind); 3] = [
    (".slider(", Kind::Slider),
    (".toggle(", Kind::Toggle),
    (".combo_box(", Kind::ComboBox),
];

const WEB_ACCESSORS: [(&str, Kind); 3] = [
    ("getSliderState(", Kind::Slider),
    ("getToggleState(", Kind::Toggle),
    ("getComboBoxState(", Kind::ComboBox),
];

const WEB_EXTENSIONS: [&str; 8] = ["js", "mjs", "jsx", "ts", "tsx", "html", "vue", "svelte"];

const SKIPPED_DIRS: [&str; 4] = ["node_modules", "dist", "target", ".git"];

/// Key -> kind, in key order.
pub type KeyMap = BTreeMap<String, Kind>;

/// Extract `call("key")` occurrences for each pattern. Only string literal
/// arguments count.
pub fn scan(source: &str, patterns: &[(&str, Kind)]) -> Vec<(String, Kind)> {
    let mut found = Vec::new();
    for (pattern, kind) in patterns {
        let mut rest = source;
        while let Some(pos) = rest.find(pattern) {
            rest = &rest[pos + pattern.len()..];
            let args = rest.trim_start();
            let Some(quote) = args.chars().next().filter(|c| matches!(c, '"' | '\'' | '`')) else {
                continue;
            };
            let literal = &args[1..];
            if let Some(end) = literal.find(quote) {
                found.push((literal[..end].to_string(), *kind));
            }
        }
    }
    found
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    package: Option<Package>,
}

#[derive(Debug, Default, Deserialize)]
struct Package {
    name: Option<String>,
    metadata: Option<Metadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    webrelay: Option<WebRelayMetadata>,
}

/// `[package.metadata.webrelay]`
#[derive(Debug, Default, Deserialize)]
struct WebRelayMetadata {
    web_dir: Option<PathBuf>,
}

/// Locations to scan for a plugin crate.
#[derive(Debug)]
pub struct CrateLayout {
    pub name: String,
    pub rust_dir: PathBuf,
    pub web_dir: PathBuf,
}

impl CrateLayout {
    /// Read the crate's manifest. The web directory defaults to `web/`.
    pub fn read(crate_dir: &Path) -> Result<Self, String> {
        let manifest_path = crate_dir.join("Cargo.toml");
        let text = fs::read_to_string(&manifest_path)
            .map_err(|e| format!("Failed to read {}: {}", manifest_path.display(), e))?;
        let manifest: Manifest =
            toml::from_str(&text).map_err(|e| format!("Failed to parse {}: {}", manifest_path.display(), e))?;

        let package = manifest.package.unwrap_or_default();
        let web_dir = package
            .metadata
            .and_then(|m| m.webrelay)
            .and_then(|w| w.web_dir)
            .unwrap_or_else(|| PathBuf::from("web"));
        Ok(Self {
            name: package.name.unwrap_or_else(|| crate_dir.display().to_string()),
            rust_dir: crate_dir.join("src"),
            web_dir: crate_dir.join(web_dir),
        })
    }
}

/// Differences between declared relays and web accessors.
#[derive(Debug, Default, PartialEq)]
pub struct KeyReport {
    /// Keys the page asks for that Rust never declares.
    pub undeclared: Vec<(String, Kind)>,
    /// Keys declared in Rust that the page never asks for.
    pub unused: Vec<(String, Kind)>,
    /// Keys used with a different kind on each side: (key, rust, web).
    pub kind_mismatches: Vec<(String, Kind, Kind)>,
}

impl KeyReport {
    pub fn compare(rust: &KeyMap, web: &KeyMap) -> Self {
        let mut report = Self::default();
        for (key, &web_kind) in web {
            match rust.get(key) {
                None => report.undeclared.push((key.clone(), web_kind)),
                Some(&rust_kind) if rust_kind != web_kind => {
                    report.kind_mismatches.push((key.clone(), rust_kind, web_kind));
                }
                Some(_) => {}
            }
        }
        for (key, &kind) in rust {
            if !web.contains_key(key) {
                report.unused.push((key.clone(), kind));
            }
        }
        report
    }

    /// No undeclared keys and no kind mismatches. Unused relays are allowed.
    pub fn is_clean(&self) -> bool {
        self.undeclared.is_empty() && self.kind_mismatches.is_empty()
    }
}

fn collect(files: &[PathBuf], patterns: &[(&str, Kind)], into: &mut KeyMap) -> Result<(), String> {
    for file in files {
        let text = fs::read_to_string(file).map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
        for (key, kind) in scan(&text, patterns) {
            if let Some(previous) = into.insert(key.clone(), kind) {
                if previous != kind {
                    crate::util::print_warning(&format!(
                        "{key:?} is used as both {} and {} in {}",
                        previous.as_str(),
                        kind.as_str(),
                        file.display()
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Scan a plugin crate and compare its relay keys.
pub fn check_crate(crate_dir: &Path) -> Result<KeyReport, String> {
    let layout = CrateLayout::read(crate_dir)?;

    let rust_files: Vec<PathBuf> = walk_files(&layout.rust_dir, &SKIPPED_DIRS)?
        .into_iter()
        .filter(|p| p.extension().is_some_and(|e| e == "rs"))
        .collect();
    let web_files: Vec<PathBuf> = if layout.web_dir.is_dir() {
        walk_files(&layout.web_dir, &SKIPPED_DIRS)?
            .into_iter()
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| WEB_EXTENSIONS.contains(&e))
            })
            .collect()
    } else {
        return Err(format!("No web directory at {}", layout.web_dir.display()));
    };

    let mut rust = KeyMap::new();
    collect(&rust_files, &RUST_DECLARATIONS, &mut rust)?;
    let mut web = KeyMap::new();
    collect(&web_files, &WEB_ACCESSORS, &mut web)?;

    crate::status!(
        "{}: {} relays declared, {} keys used by the page",
        layout.name,
        rust.len(),
        web.len()
    );
    Ok(KeyReport::compare(&rust, &web))
}

/// Run `cargo xtask check-keys` and print the report.
pub fn run(crate_dir: &Path) -> Result<(), String> {
    let report = check_crate(crate_dir)?;
    for (key, kind) in &report.unused {
        crate::util::print_warning(&format!("{} relay {key:?} is never used by the page", kind.as_str()));
    }
    for (key, kind) in &report.undeclared {
        crate::util::print_error(&format!("page asks for {} {key:?} but no relay declares it", kind.as_str()));
    }
    for (key, rust, web) in &report.kind_mismatches {
        crate::util::print_error(&format!(
            "{key:?} is declared as a {} but the page uses it as a {}",
            rust.as_str(),
            web.as_str()
        ));
    }
    if report.is_clean() {
        crate::status!("All relay keys match.");
        Ok(())
    } else {
        Err(format!(
            "{} undeclared keys, {} kind mismatches",
            report.undeclared.len(),
            report.kind_mismatches.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_rust_declarations() {
        let source = r#"
            RelaySet::new()
                .slider("gain")?
                .toggle( "bypass" )?
                .combo_box("mode")
        "#;
        assert_eq!(
            scan(source, &RUST_DECLARATIONS),
            [
                ("gain".to_string(), Kind::Slider),
                ("bypass".to_string(), Kind::Toggle),
                ("mode".to_string(), Kind::ComboBox),
            ]
        );
    }

    #[test]
    fn scans_web_accessors_with_any_quote() {
        let source = "relay.getSliderState('gain'); getToggleState(`bypass`); getComboBoxState(key);";
        assert_eq!(
            scan(source, &WEB_ACCESSORS),
            [("gain".to_string(), Kind::Slider), ("bypass".to_string(), Kind::Toggle)]
        );
    }

    fn map(entries: &[(&str, Kind)]) -> KeyMap {
        entries.iter().map(|(k, kind)| (k.to_string(), *kind)).collect()
    }

    #[test]
    fn compare_reports_typos_and_kinds() {
        let rust = map(&[("gain", Kind::Slider), ("bypass", Kind::Toggle), ("tone", Kind::Slider)]);
        let web = map(&[("gian", Kind::Slider), ("bypass", Kind::Slider), ("tone", Kind::Slider)]);
        let report = KeyReport::compare(&rust, &web);

        assert_eq!(report.undeclared, [("gian".to_string(), Kind::Slider)]);
        assert_eq!(report.unused, [("gain".to_string(), Kind::Slider)]);
        assert_eq!(
            report.kind_mismatches,
            [("bypass".to_string(), Kind::Toggle, Kind::Slider)]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn checks_a_crate_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("ui/node_modules/lib")).unwrap();
        fs::write(
            root.join("Cargo.toml"),
            "[package]\nname = \"fuzz\"\n\n[package.metadata.webrelay]\nweb_dir = \"ui\"\n",
        )
        .unwrap();
        fs::write(root.join("src/lib.rs"), r#"RelaySet::new().slider("drive")"#).unwrap();
        fs::write(root.join("ui/app.ts"), r#"getSliderState("drive")"#).unwrap();
        fs::write(root.join("ui/node_modules/lib/x.js"), r#"getSliderState("other")"#).unwrap();

        let report = check_crate(root).unwrap();
        assert!(report.is_clean(), "{report:?}");
        assert!(report.unused.is_empty());
    }

    #[test]
    fn demo_plugin_keys_match() {
        let demo = crate::util::workspace_root().join("demos").join("gain");
        let report = check_crate(&demo).unwrap();
        assert_eq!(report, KeyReport::default());
    }
}
