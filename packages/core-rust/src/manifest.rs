//! JSON directive manifest.
//!
//! Lets deployments attach or override directives without recompiling:
//!
//! ```json
//! {
//!   "directives": [
//!     {
//!       "site": { "on": "implementation_method", "implementation": "OrderService",
//!                 "method": "get_order", "params": ["u32"] },
//!       "directives": { "timing": { "description": "Retrieving order" } }
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::directive::{DeclarationSite, DirectiveSet};
use crate::error::MetadataError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveManifest {
    #[serde(default)]
    pub directives: Vec<ManifestEntry>,
}

/// One declaration: a site and the directives attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub site: DeclarationSite,
    #[serde(default)]
    pub directives: DirectiveSet,
}

impl DirectiveManifest {
    /// Parse a manifest from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Manifest` if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Io` if the file cannot be read and
    /// `MetadataError::Manifest` if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            entries = manifest.directives.len(),
            "loaded directive manifest"
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::descriptor::OperationDescriptor;
    use crate::directive::{ErrorDirective, Timing};
    use crate::registry::DirectiveRegistry;
    use crate::traits::MetadataProvider;

    const MANIFEST: &str = r#"{
        "directives": [
            {
                "site": { "on": "implementation_type", "implementation": "OrderService" },
                "directives": { "entry_exit": true }
            },
            {
                "site": {
                    "on": "contract_method",
                    "contract": "Orders",
                    "method": "process_order",
                    "params": ["&Order"]
                },
                "directives": {
                    "timing": {},
                    "error": { "message": "Order processing failed" }
                }
            }
        ]
    }"#;

    #[test]
    fn parses_all_site_kinds() {
        let manifest = DirectiveManifest::from_json_str(MANIFEST).unwrap();
        assert_eq!(manifest.directives.len(), 2);
        assert_eq!(
            manifest.directives[0].site,
            DeclarationSite::ImplementationType {
                implementation: "OrderService".to_string()
            }
        );
        assert_eq!(manifest.directives[1].directives.timing, Some(Timing::default()));
    }

    #[test]
    fn manifest_feeds_registry_resolution() {
        let registry = DirectiveRegistry::builder()
            .extend_from_manifest(DirectiveManifest::from_json_str(MANIFEST).unwrap())
            .build();

        let op = OperationDescriptor::new("Orders", "OrderService", "process_order", &["&Order"]);
        let resolved = registry.resolve(&op).unwrap();
        assert!(resolved.entry_exit);
        assert_eq!(resolved.timing, Some(Timing::default()));
        assert_eq!(resolved.error, Some(ErrorDirective::new("Order processing failed")));
    }

    #[test]
    fn malformed_manifest_is_rejected() {
        let err = DirectiveManifest::from_json_str(r#"{"directives": [{"site": {"on": "nowhere"}}]}"#)
            .unwrap_err();
        assert!(matches!(err, MetadataError::Manifest(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = DirectiveManifest::load(file.path()).unwrap();
        assert_eq!(manifest.directives.len(), 2);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DirectiveManifest::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MetadataError::Io { .. }));
    }
}
