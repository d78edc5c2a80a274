//! Icon lookup contract and the JSON-backed catalogue.
//!
//! Catalogue files hold icon definitions in the shape published by the
//! Font Awesome icon packages:
//!
//! ```json
//! [
//!   { "prefix": "far", "iconName": "user",
//!     "icon": [448, 512, ["user-alt", 62144], "f007", "M304 128a80..."] }
//! ]
//! ```
//!
//! `icon[2]` lists aliases (numbers are alternate code points and ignored),
//! `icon[4]` is either one path or `[secondary, primary]` for duotone.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::error::LookupError;
use super::selector::CanonicalSelector;
use super::symbol::render_symbol;

/// A resolved icon: the fragment target plus the markup that defines it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub reference_key: String,
    pub markup: String,
}

/// Source of icon definitions.
///
/// Implementations may do I/O. `NotFound` must be reported as
/// [`LookupError::NotFound`]; anything else is treated as fatal.
pub trait IconLookup: Send + Sync {
    fn lookup(&self, selector: &CanonicalSelector) -> Result<ResolvedIcon, LookupError>;
}

/// Path data of an icon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PathData {
    Single(String),
    /// `[secondary, primary]`
    Duotone(Vec<String>),
}

impl PathData {
    fn len(&self) -> usize {
        match self {
            Self::Single(d) => d.len(),
            Self::Duotone(layers) => layers.iter().map(String::len).sum(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Alias {
    Name(String),
    #[allow(dead_code)]
    CodePoint(u64),
}

/// `[width, height, aliases, unicode, path]`
#[derive(Debug, Deserialize)]
struct RawIconData(u32, u32, Vec<Alias>, String, PathData);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIcon {
    prefix: String,
    icon_name: String,
    icon: RawIconData,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCatalogue {
    Many(Vec<RawIcon>),
    One(RawIcon),
}

/// One icon definition from a catalogue file.
#[derive(Debug, Clone, PartialEq)]
pub struct IconDefinition {
    pub prefix: String,
    pub icon_name: String,
    pub width: u32,
    pub height: u32,
    pub aliases: Vec<String>,
    pub path: PathData,
}

impl IconDefinition {
    #[inline]
    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Selector under the canonical (non-alias) name.
    pub fn selector(&self) -> CanonicalSelector {
        CanonicalSelector::new(&self.prefix, &self.icon_name)
    }
}

impl From<RawIcon> for IconDefinition {
    fn from(raw: RawIcon) -> Self {
        let RawIconData(width, height, aliases, _unicode, path) = raw.icon;
        Self {
            prefix: raw.prefix,
            icon_name: raw.icon_name,
            width,
            height,
            aliases: aliases
                .into_iter()
                .filter_map(|alias| match alias {
                    Alias::Name(name) => Some(name),
                    Alias::CodePoint(_) => None,
                })
                .collect(),
            path,
        }
    }
}

/// In-memory icon catalogue keyed by `prefix:name`.
///
/// Markup is rendered once at load time; lookups only clone strings.
#[derive(Debug, Default)]
pub struct Catalogue {
    icons: Vec<ResolvedIcon>,
    index: FxHashMap<String, usize>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and merge catalogue files in order.
    ///
    /// A later file overrides earlier definitions of the same canonical
    /// selector.
    pub fn load(paths: &[PathBuf]) -> Result<Self, LookupError> {
        let mut catalogue = Self::new();
        for path in paths {
            let content = fs::read_to_string(path).map_err(|e| LookupError::Io(path.clone(), e))?;
            catalogue.extend_from_json(&content, path)?;
        }
        Ok(catalogue)
    }

    /// Parse one catalogue document and merge it in.
    pub fn extend_from_json(&mut self, json: &str, path: &Path) -> Result<(), LookupError> {
        let raw: RawCatalogue =
            serde_json::from_str(json).map_err(|e| LookupError::Catalogue {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let icons = match raw {
            RawCatalogue::Many(icons) => icons,
            RawCatalogue::One(icon) => vec![icon],
        };

        for raw in icons {
            self.insert(IconDefinition::from(raw));
        }
        Ok(())
    }

    /// Add a definition, registering its aliases.
    pub fn insert(&mut self, def: IconDefinition) {
        let selector = def.selector();
        let reference_key = selector.reference_key();
        let markup = render_symbol(&def, &reference_key);

        let slot = self.icons.len();
        self.icons.push(ResolvedIcon {
            reference_key,
            markup,
        });

        self.index.insert(selector.to_string(), slot);
        for alias in &def.aliases {
            let key = CanonicalSelector::new(&def.prefix, alias).to_string();
            // canonical names are never shadowed by an alias
            self.index.entry(key).or_insert(slot);
        }
    }

    /// Number of addressable selectors, aliases included.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl IconLookup for Catalogue {
    fn lookup(&self, selector: &CanonicalSelector) -> Result<ResolvedIcon, LookupError> {
        self.index
            .get(&selector.to_string())
            .and_then(|&slot| self.icons.get(slot))
            .cloned()
            .ok_or_else(|| LookupError::not_found(selector.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub const USER_PATH: &str = "M304 128a80 80 0 1 0 -160 0 80 80 0 1 0 160 0zM96 128a128 128 0 1 1 256 0A128 128 0 1 1 96 128zM49.3 464l349.5 0c-8.9-63.3-63.3-112-129-112l-91.4 0c-65.7 0-120.1 48.7-129 112zM0 482.3C0 383.8 79.8 304 178.3 304l91.4 0C368.2 304 448 383.8 448 482.3c0 16.4-13.3 29.7-29.7 29.7L29.7 512C13.3 512 0 498.7 0 482.3z";

    /// Catalogue with `far:user` (alias `user-alt`) and `fas:house`.
    pub fn sample_catalogue_json() -> String {
        format!(
            r#"[
  {{ "prefix": "far", "iconName": "user", "icon": [448, 512, ["user-alt", 62144], "f007", "{USER_PATH}"] }},
  {{ "prefix": "fas", "iconName": "house", "icon": [576, 512, [], "f015", "M0 0h576v512H0z"] }},
  {{ "prefix": "fad", "iconName": "circle", "icon": [512, 512, [], "f111", ["M1 1z", "M2 2z"]] }}
]"#
        )
    }

    pub fn sample_catalogue() -> Catalogue {
        let mut catalogue = Catalogue::new();
        catalogue
            .extend_from_json(&sample_catalogue_json(), Path::new("sample.json"))
            .unwrap();
        catalogue
    }

    #[test]
    fn test_lookup_found() {
        let catalogue = sample_catalogue();
        let icon = catalogue.lookup(&"far:user".parse().unwrap()).unwrap();
        assert_eq!(icon.reference_key, "far-fa-user");
        assert_eq!(
            icon.markup,
            format!(
                r#"<svg style="display: none;"><symbol aria-hidden="true" focusable="false" data-prefix="far" data-icon="user" class="svg-inline--fa fa-user" role="img" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 448 512" id="far-fa-user"><path fill="currentColor" d="{USER_PATH}"></path></symbol></svg>"#
            )
        );
    }

    #[test]
    fn test_lookup_not_found() {
        let catalogue = sample_catalogue();
        let err = catalogue.lookup(&"fas:left".parse().unwrap()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Could not find icon: fas:left");

        // right name, wrong style
        let err = catalogue.lookup(&"fas:user".parse().unwrap()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_lookup_alias_uses_canonical_key() {
        let catalogue = sample_catalogue();
        let icon = catalogue.lookup(&"far:user-alt".parse().unwrap()).unwrap();
        assert_eq!(icon.reference_key, "far-fa-user");
    }

    #[test]
    fn test_duotone_paths() {
        let catalogue = sample_catalogue();
        let icon = catalogue.lookup(&"fad:circle".parse().unwrap()).unwrap();
        assert!(icon.markup.contains(r#"class="fa-secondary""#));
        assert!(icon.markup.contains(r#"class="fa-primary""#));
    }

    #[test]
    fn test_single_object_document() {
        let mut catalogue = Catalogue::new();
        catalogue
            .extend_from_json(
                r#"{ "prefix": "fab", "iconName": "github", "icon": [496, 512, [], "f09b", "M1 1z"] }"#,
                Path::new("github.json"),
            )
            .unwrap();
        assert_eq!(catalogue.len(), 1);
        assert!(catalogue.lookup(&"fab:github".parse().unwrap()).is_ok());
    }

    #[test]
    fn test_malformed_catalogue() {
        let mut catalogue = Catalogue::new();
        let err = catalogue
            .extend_from_json(r#"[{ "prefix": "far" }]"#, Path::new("broken.json"))
            .unwrap_err();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_load_files_later_overrides() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        fs::write(&first, sample_catalogue_json()).unwrap();
        fs::write(
            &second,
            r#"[{ "prefix": "fas", "iconName": "house", "icon": [10, 20, [], "f015", "M9 9z"] }]"#,
        )
        .unwrap();

        let catalogue = Catalogue::load(&[first, second]).unwrap();
        let icon = catalogue.lookup(&"fas:house".parse().unwrap()).unwrap();
        assert!(icon.markup.contains(r#"viewBox="0 0 10 20""#));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Catalogue::load(&[dir.path().join("missing.json")]).unwrap_err();
        assert!(matches!(err, LookupError::Io(..)));
    }
}
