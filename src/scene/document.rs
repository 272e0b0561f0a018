use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{QuireError, QuireResult};
use crate::scene::object::SceneObject;
use crate::scene::store::Scene;
use crate::workspace::settings::WorkspaceOptions;

/// Current persisted document version.
pub const DOCUMENT_VERSION: &str = "1";

/// Serialized snapshot of an editor: workspace settings plus persisted objects.
///
/// Guide lines, print guides and the workspace object are never written; they are regenerated
/// from `workspace` on load.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDocument {
    /// Format version.
    pub version: String,
    /// Page geometry, margins, unit and DPI.
    pub workspace: WorkspaceOptions,
    /// Objects in paint order.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl SceneDocument {
    /// Capture `scene` with `workspace` settings.
    pub fn capture(scene: &Scene, workspace: &WorkspaceOptions) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            workspace: *workspace,
            objects: scene.persisted_objects(),
        }
    }

    /// Parse a JSON document.
    pub fn from_json(text: &str) -> QuireResult<Self> {
        let doc: Self = serde_json::from_str(text)
            .map_err(|e| QuireError::serde(format!("parse scene document: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Read and parse a JSON document from disk.
    pub fn from_path(path: &Path) -> QuireResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene document '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> QuireResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QuireError::serde(format!("serialize scene document: {e}")))
    }

    /// Check version, workspace settings and object ids.
    pub fn validate(&self) -> QuireResult<()> {
        if self.version != DOCUMENT_VERSION {
            return Err(QuireError::validation(format!(
                "unsupported document version '{}'",
                self.version
            )));
        }
        self.workspace.validate()?;
        let mut seen = std::collections::HashSet::new();
        for obj in &self.objects {
            if obj.extension.is_transient() {
                return Err(QuireError::validation(format!(
                    "object '{}' has a transient tag and cannot be loaded",
                    obj.id
                )));
            }
            if !seen.insert(obj.id.as_str()) {
                return Err(QuireError::validation(format!(
                    "duplicate object id '{}'",
                    obj.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
