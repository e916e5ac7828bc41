//! Navigation documents: a tree, its render configuration and access rules
//! in a single JSON, YAML or TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AccessConfig, RenderConfig};
use crate::error::{NavError, NavResult};
use crate::nav::Nav;
use crate::tree::NodeSpec;

/// Path reported for documents parsed from memory.
const INLINE: &str = "<inline>";

/// Serialization format of a navigation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> NavResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(NavError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavDocument {
    #[serde(default)]
    pub tree: Vec<NodeSpec>,

    /// Render configuration; the standard configuration when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RenderConfig>,

    /// Rules for the bundled access list; no evaluator when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessConfig>,

    #[serde(default, alias = "returnFalse")]
    pub return_false: bool,
}

impl NavDocument {
    /// Parse a document held in memory.
    pub fn parse(source: &str, format: Format) -> NavResult<Self> {
        Self::decode(source, format).map_err(|details| NavError::document(INLINE, details))
    }

    /// Read and parse a document, choosing the format by extension.
    pub fn load_file(path: impl AsRef<Path>) -> NavResult<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        debug!(path = %path.display(), ?format, "loading navigation document");

        let source = std::fs::read_to_string(path)
            .map_err(|e| NavError::document(path.display().to_string(), e))?;

        Self::decode(&source, format)
            .map_err(|details| NavError::document(path.display().to_string(), details))
    }

    fn decode(source: &str, format: Format) -> Result<Self, String> {
        match format {
            Format::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
            Format::Yaml => serde_yml::from_str(source).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(source).map_err(|e| e.to_string()),
        }
    }

    /// Turn the document into a ready-to-render navigation.
    ///
    /// An `access` section attaches an [`AccessList`](crate::acl::AccessList)
    /// built from its rules, registers its active roles and applies its strict
    /// flag.
    pub fn into_nav(self) -> Nav {
        let mut nav = Nav::with_tree(self.tree);
        if let Some(config) = self.config {
            nav.set_config(config);
        }
        nav.set_return_false(self.return_false);

        if let Some(access) = self.access {
            nav.set_acl(access.to_access_list())
                .set_acl_strict(access.strict)
                .add_roles(access.active);
        }
        nav
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("nav.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("nav.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a/nav.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("nav.toml")).unwrap(), Format::Toml);
        assert!(matches!(
            Format::from_path(Path::new("nav.xml")),
            Err(NavError::UnsupportedFormat { .. })
        ));
        assert!(Format::from_path(Path::new("nav")).is_err());
    }

    #[test]
    fn parses_yaml() {
        let doc = NavDocument::parse(
            r#"
tree:
  - name: Pages
    href: /pages
    children:
      - name: Add Page
        href: add
config:
  baseUrl: /home
  off: link-off
returnFalse: true
"#,
            Format::Yaml,
        )
        .unwrap();

        assert_eq!(doc.tree[0].children[0].href.as_deref(), Some("add"));
        assert_eq!(
            doc.config.as_ref().and_then(|c| c.base_url.as_deref()),
            Some("/home")
        );
        assert!(doc.return_false);
        assert!(doc.access.is_none());
    }

    #[test]
    fn parses_toml() {
        let doc = NavDocument::parse(
            r#"
[[tree]]
name = "Users"
href = "/users"
acl = { resource = "user" }

[access]
strict = false
roles = ["editor"]
active = ["editor"]
allow = [{ role = "editor", resource = "user" }]
"#,
            Format::Toml,
        )
        .unwrap();

        let mut nav = doc.into_nav();
        assert!(nav.has_role("editor"));
        assert!(nav.render().unwrap().contains("href=\"/users\""));
    }

    #[test]
    fn parse_error_is_reported() {
        let err = NavDocument::parse("{ not json", Format::Json).unwrap_err();
        assert!(matches!(err, NavError::Document { ref path, .. } if path == INLINE));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = NavDocument::load_file("/nonexistent/trovato/nav.json").unwrap_err();
        assert!(matches!(err, NavError::Document { .. }));
    }

    #[test]
    fn document_without_config_uses_standard() {
        let doc = NavDocument::parse(r#"{"tree": []}"#, Format::Json).unwrap();
        let nav = doc.into_nav();
        assert_eq!(nav.config(), &RenderConfig::standard());
        assert!(nav.acl().is_none());
    }
}
