//! `cargo xtask new`: create a plugin crate from `templates/plugin`.

use std::fs;
use std::path::{Path, PathBuf};

use webrelay_core::ConfigFile;

use crate::util::{
    manifest_path, normalize_path, shorten_path, to_pascal_case, to_snake_case, to_upper_snake_case,
    walk_files,
};

/// Suffix stripped from template file names. Keeps cargo from treating
/// `Cargo.toml.tmpl` as a manifest.
const TEMPLATE_SUFFIX: &str = ".tmpl";

/// How a generated crate depends on the webrelay crates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestStyle {
    /// Workspace member at this `/`-separated path below the workspace root.
    /// Dependencies and package fields are inherited from the workspace.
    Member(String),
    /// Crate outside the workspace. Depends on the facade crate at this path
    /// and declares its own empty `[workspace]`.
    Standalone(PathBuf),
}

impl ManifestStyle {
    /// Style for a crate at `dest`, given the workspace `root`. Both paths
    /// must be absolute and normalized.
    pub fn for_destination(root: &Path, dest: &Path) -> Self {
        match dest.strip_prefix(root) {
            Ok(relative) if !relative.as_os_str().is_empty() => Self::Member(manifest_path(relative)),
            _ => Self::Standalone(root.join("crates").join("webrelay")),
        }
    }

    fn pairs(&self) -> [(&'static str, String); 4] {
        match self {
            Self::Member(_) => [
                (
                    "{{PACKAGE_FIELDS}}",
                    "version.workspace = true\nedition.workspace = true\nlicense.workspace = true\npublish = false"
                        .to_string(),
                ),
                (
                    "{{DEPENDENCIES}}",
                    "webrelay = { workspace = true }".to_string(),
                ),
                (
                    "{{DEV_DEPENDENCIES}}",
                    "webrelay = { workspace = true, features = [\"testing\"] }".to_string(),
                ),
                ("{{WORKSPACE_TABLE}}", String::new()),
            ],
            Self::Standalone(facade) => {
                // TOML string syntax takes care of quoting and escaping.
                let path = toml::Value::String(facade.to_string_lossy().into_owned());
                [
                    ("{{PACKAGE_FIELDS}}", "version = \"0.1.0\"\nedition = \"2021\"".to_string()),
                    ("{{DEPENDENCIES}}", format!("webrelay = {{ path = {path} }}")),
                    (
                        "{{DEV_DEPENDENCIES}}",
                        format!("webrelay = {{ path = {path}, features = [\"testing\"] }}"),
                    ),
                    ("{{WORKSPACE_TABLE}}", "\n# Built on its own, outside the webrelay workspace.\n[workspace]".to_string()),
                ]
            }
        }
    }
}

/// Placeholder values for one plugin.
#[derive(Debug, Clone)]
pub struct Placeholders {
    pub name: String,
    pub id: String,
    pub manifest: ManifestStyle,
}

impl Placeholders {
    /// Placeholders for `name` with a fresh plugin id.
    pub fn new(name: &str, manifest: ManifestStyle) -> Self {
        Self {
            name: name.to_string(),
            id: uuid::Uuid::new_v4().to_string(),
            manifest,
        }
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("{{PLUGIN_NAME}}", self.name.clone()),
            ("{{PLUGIN_NAME_UPPER}}", to_upper_snake_case(&self.name)),
            ("{{PLUGIN_NAME_SNAKE}}", to_snake_case(&self.name)),
            ("{{PLUGIN_NAME_PASCAL}}", to_pascal_case(&self.name)),
            ("{{PLUGIN_ID}}", self.id.clone()),
        ];
        pairs.extend(self.manifest.pairs());
        pairs
    }

    /// Replace every placeholder in `text`.
    pub fn apply(&self, text: &str) -> String {
        self.pairs()
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

/// Check that `name` works as a crate name.
pub fn validate_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return Err(format!("Plugin name must start with a lowercase letter: {name:?}")),
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_') {
        return Err(format!(
            "Plugin name may only contain lowercase letters, digits, '-' and '_': {name:?}"
        ));
    }
    Ok(())
}

/// Instantiate `template_dir` into `dest`. Returns the files written.
pub fn instantiate(template_dir: &Path, dest: &Path, placeholders: &Placeholders) -> Result<Vec<PathBuf>, String> {
    if dest.exists()
        && fs::read_dir(dest)
            .map_err(|e| format!("Failed to read {}: {}", dest.display(), e))?
            .next()
            .is_some()
    {
        return Err(format!("Destination is not empty: {}", shorten_path(dest)));
    }

    let mut written = Vec::new();
    for file in walk_files(template_dir, &[])? {
        let relative = file
            .strip_prefix(template_dir)
            .map_err(|e| format!("Template path outside template dir: {}", e))?;
        let relative = placeholders.apply(&relative.to_string_lossy());
        let relative = relative.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(&relative);
        let target = dest.join(relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        let bytes = fs::read(&file).map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
        let contents = match String::from_utf8(bytes) {
            Ok(text) => placeholders.apply(&text).into_bytes(),
            // Binary assets are copied as-is.
            Err(e) => e.into_bytes(),
        };
        fs::write(&target, contents).map_err(|e| format!("Failed to write {}: {}", target.display(), e))?;
        written.push(target);
    }
    Ok(written)
}

/// Add `member` to `[workspace] members` in the manifest at `root_manifest`.
///
/// Edits the text in place so comments and layout survive. Returns `false`
/// if the member was already listed.
pub fn register_member(root_manifest: &Path, member: &str) -> Result<bool, String> {
    let text = fs::read_to_string(root_manifest)
        .map_err(|e| format!("Failed to read {}: {}", root_manifest.display(), e))?;
    if workspace_members(&text)?.iter().any(|m| m == member) {
        return Ok(false);
    }

    let updated = insert_member(&text, member)
        .ok_or_else(|| format!("No `members = [...]` list in {}", shorten_path(root_manifest)))?;
    if !workspace_members(&updated)?.iter().any(|m| m == member) {
        return Err(format!("Failed to add {member} to {}", shorten_path(root_manifest)));
    }
    fs::write(root_manifest, updated)
        .map_err(|e| format!("Failed to write {}: {}", root_manifest.display(), e))?;
    Ok(true)
}

fn workspace_members(text: &str) -> Result<Vec<String>, String> {
    let manifest: toml::Table = toml::from_str(text).map_err(|e| format!("Failed to parse workspace manifest: {}", e))?;
    let members = manifest
        .get("workspace")
        .and_then(|w| w.get("members"))
        .and_then(toml::Value::as_array)
        .ok_or("Workspace manifest has no [workspace] members")?;
    Ok(members.iter().filter_map(|m| m.as_str().map(str::to_owned)).collect())
}

fn insert_member(text: &str, member: &str) -> Option<String> {
    let line_start = text
        .match_indices("members")
        .map(|(i, _)| i)
        .find(|&i| i == 0 || text[..i].ends_with('\n'))?;
    let open = line_start + text[line_start..].find('[')?;
    let close = open + text[open..].find(']')?;
    let entry = toml::Value::String(member.to_string());
    let inner = &text[open + 1..close];

    let mut out = String::with_capacity(text.len() + member.len() + 8);
    if inner.contains('\n') {
        // One member per line: add a line before the closing bracket.
        let last = inner.trim_end();
        let body_end = open + 1 + last.len();
        out.push_str(&text[..body_end]);
        if !last.trim().is_empty() && !last.ends_with(',') {
            out.push(',');
        }
        out.push_str(&format!("\n    {entry},\n"));
        out.push_str(&text[close..]);
    } else {
        out.push_str(&text[..close]);
        if inner.trim().is_empty() {
            out.push_str(&entry.to_string());
        } else {
            out.push_str(&format!(", {entry}"));
        }
        out.push_str(&text[close..]);
    }
    Some(out)
}

/// Create a plugin crate at `dest` from `template_dir`, registering it with
/// the workspace at `root` when `dest` lies inside it.
pub fn create_plugin(root: &Path, template_dir: &Path, name: &str, dest: &Path) -> Result<Placeholders, String> {
    validate_name(name)?;
    let placeholders = Placeholders::new(name, ManifestStyle::for_destination(root, dest));
    let written = instantiate(template_dir, dest, &placeholders)?;

    // The generated config must load with the runtime's own parser.
    ConfigFile::load(&dest.join("Config.toml")).map_err(|e| format!("Generated Config.toml is invalid: {}", e))?;

    crate::status!("Created {} ({} files)", shorten_path(dest), written.len());
    if let ManifestStyle::Member(member) = &placeholders.manifest {
        if register_member(&root.join("Cargo.toml"), member)? {
            crate::status!("  added {member} to workspace members");
        }
    }
    crate::status!("  plugin id: {}", placeholders.id);
    Ok(placeholders)
}

/// Run `cargo xtask new`.
pub fn new_plugin(name: &str, dir: Option<&Path>) -> Result<PathBuf, String> {
    let root = crate::util::workspace_root();
    let template_dir = root.join("templates").join("plugin");
    let dest = match dir {
        Some(dir) => {
            let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
            normalize_path(&cwd.join(dir))
        }
        None => root.join(name),
    };
    create_plugin(&root, &template_dir, name, &dest)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders() -> Placeholders {
        Placeholders {
            name: "my-fuzz".into(),
            id: "0f8fad5b-d9cb-469f-a165-70867728950e".into(),
            manifest: ManifestStyle::Member("my-fuzz".into()),
        }
    }

    fn bundled_template() -> PathBuf {
        crate::util::workspace_root().join("templates").join("plugin")
    }

    fn manifest(path: &Path) -> toml::Table {
        toml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    /// A workspace root with a members list and no crates.
    fn scratch_workspace() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("Cargo.toml"),
            "[workspace]\nmembers = [\n    \"crates/a\",\n    \"xtask\",\n]\nresolver = \"2\"\n",
        )
        .unwrap();
        root
    }

    #[test]
    fn replaces_all_placeholders() {
        let text = "{{PLUGIN_NAME}} {{PLUGIN_NAME_UPPER}} {{PLUGIN_NAME_SNAKE}} {{PLUGIN_NAME_PASCAL}} {{PLUGIN_ID}}";
        assert_eq!(
            placeholders().apply(text),
            "my-fuzz MY_FUZZ my_fuzz MyFuzz 0f8fad5b-d9cb-469f-a165-70867728950e"
        );
    }

    #[test]
    fn fresh_ids_are_uuids() {
        let a = Placeholders::new("x", ManifestStyle::Member("x".into()));
        let b = Placeholders::new("x", ManifestStyle::Member("x".into()));
        assert_ne!(a.id, b.id);
        assert!(uuid::Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("my-fuzz2").is_ok());
        assert!(validate_name("2fuzz").is_err());
        assert!(validate_name("My Fuzz").is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn instantiates_template_tree() {
        let template = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(template.path().join("src")).unwrap();
        std::fs::write(template.path().join("Cargo.toml.tmpl"), "name = \"{{PLUGIN_NAME}}\"\n").unwrap();
        std::fs::write(template.path().join("src/lib.rs.tmpl"), "// {{PLUGIN_NAME_SNAKE}}\n").unwrap();
        std::fs::write(template.path().join("icon.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("my-fuzz");
        let written = instantiate(template.path(), &dest, &placeholders()).unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(std::fs::read_to_string(dest.join("Cargo.toml")).unwrap(), "name = \"my-fuzz\"\n");
        assert_eq!(std::fs::read_to_string(dest.join("src/lib.rs")).unwrap(), "// my_fuzz\n");
        assert_eq!(std::fs::read(dest.join("icon.bin")).unwrap(), [0xff, 0xfe, 0x00]);
    }

    #[test]
    fn refuses_non_empty_destination() {
        let template = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(dest.path().join("keep.txt"), "x").unwrap();
        assert!(instantiate(template.path(), dest.path(), &placeholders()).is_err());
    }

    #[test]
    fn bundled_template_produces_valid_config() {
        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("my-fuzz");
        instantiate(&bundled_template(), &dest, &placeholders()).unwrap();

        let config = ConfigFile::load(&dest.join("Config.toml")).unwrap();
        assert_eq!(config.name, "my-fuzz");
        assert_eq!(config.plugin_id.as_deref(), Some("0f8fad5b-d9cb-469f-a165-70867728950e"));

        let report = crate::keys::check_crate(&dest).unwrap();
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn style_follows_destination() {
        let root = Path::new("/ws");
        assert_eq!(
            ManifestStyle::for_destination(root, Path::new("/ws/plugins/fuzz")),
            ManifestStyle::Member("plugins/fuzz".into())
        );
        assert_eq!(
            ManifestStyle::for_destination(root, Path::new("/elsewhere/fuzz")),
            ManifestStyle::Standalone(PathBuf::from("/ws/crates/webrelay"))
        );
        assert!(matches!(
            ManifestStyle::for_destination(root, root),
            ManifestStyle::Standalone(_)
        ));
    }

    #[test]
    fn new_crate_inside_workspace_becomes_member() {
        let root = scratch_workspace();
        let dest = root.path().join("plugins").join("my-fuzz");
        create_plugin(root.path(), &bundled_template(), "my-fuzz", &dest).unwrap();

        let members = workspace_members(&std::fs::read_to_string(root.path().join("Cargo.toml")).unwrap()).unwrap();
        assert_eq!(members, ["crates/a", "xtask", "plugins/my-fuzz"]);

        let generated = manifest(&dest.join("Cargo.toml"));
        assert!(generated.get("workspace").is_none());
        assert_eq!(generated["dependencies"]["webrelay"]["workspace"].as_bool(), Some(true));
        assert_eq!(generated["dev-dependencies"]["webrelay"]["workspace"].as_bool(), Some(true));
        assert_eq!(generated["package"]["version"]["workspace"].as_bool(), Some(true));
        assert_eq!(generated["package"]["name"].as_str(), Some("my-fuzz"));
    }

    #[test]
    fn new_crate_outside_workspace_is_standalone() {
        let root = scratch_workspace();
        let before = std::fs::read_to_string(root.path().join("Cargo.toml")).unwrap();
        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("my-fuzz");
        create_plugin(root.path(), &bundled_template(), "my-fuzz", &dest).unwrap();

        assert_eq!(std::fs::read_to_string(root.path().join("Cargo.toml")).unwrap(), before);

        let generated = manifest(&dest.join("Cargo.toml"));
        assert!(generated["workspace"].as_table().is_some_and(|t| t.is_empty()));
        let facade = root.path().join("crates").join("webrelay");
        assert_eq!(
            generated["dependencies"]["webrelay"]["path"].as_str(),
            Some(facade.to_string_lossy().as_ref())
        );
        assert_eq!(generated["package"]["edition"].as_str(), Some("2021"));
    }

    #[test]
    fn member_insertion_keeps_layout() {
        let multi = "# ws\n[workspace]\nmembers = [\n    \"a\",\n    \"b\"\n]\n";
        assert_eq!(
            insert_member(multi, "c/d").unwrap(),
            "# ws\n[workspace]\nmembers = [\n    \"a\",\n    \"b\",\n    \"c/d\",\n]\n"
        );
        assert_eq!(
            insert_member("[workspace]\nmembers = [\"a\"]\n", "b").unwrap(),
            "[workspace]\nmembers = [\"a\", \"b\"]\n"
        );
        assert_eq!(
            insert_member("[workspace]\nmembers = []\n", "b").unwrap(),
            "[workspace]\nmembers = [\"b\"]\n"
        );
        assert!(insert_member("[workspace]\n", "b").is_none());
    }

    #[test]
    fn registering_twice_is_a_no_op() {
        let root = scratch_workspace();
        let path = root.path().join("Cargo.toml");
        assert!(register_member(&path, "plugins/x").unwrap());
        assert!(!register_member(&path, "plugins/x").unwrap());
        assert!(!register_member(&path, "xtask").unwrap());
        let members = workspace_members(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(members, ["crates/a", "xtask", "plugins/x"]);
    }
}
