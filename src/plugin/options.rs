use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::foundation::error::{QuireError, QuireResult};
use crate::render::cache::CacheOpts;
use crate::ruler::snap::SnapConfig;
use crate::ruler::viewport::Viewport;
use crate::workspace::settings::WorkspaceOptions;

/// Options controlling one [`crate::Editor`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Initial page geometry.
    pub workspace: WorkspaceOptions,
    /// Maximum number of undo entries.
    pub history_limit: usize,
    /// Render coalescing window in milliseconds.
    pub frame_window_ms: u64,
    /// Byte ceiling across all per-object raster caches.
    pub cache_ceiling_bytes: u64,
    /// Minimum interval between cache sweeps in milliseconds.
    pub cache_sweep_interval_ms: u64,
    /// Centerline, grid and angle snapping.
    pub snap: SnapConfig,
    /// Rulers and guide dragging start enabled.
    pub ruler_enabled: bool,
    /// Initial zoom, pan and canvas size.
    pub viewport: Viewport,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            workspace: WorkspaceOptions::default(),
            history_limit: 50,
            frame_window_ms: 16,
            cache_ceiling_bytes: 256 * 1024 * 1024,
            cache_sweep_interval_ms: 1000,
            snap: SnapConfig::default(),
            ruler_enabled: true,
            viewport: Viewport::default(),
        }
    }
}

impl EditorOptions {
    /// Parse JSON options; missing fields take their defaults.
    pub fn from_json(text: &str) -> QuireResult<Self> {
        let opts: Self = serde_json::from_str(text)
            .map_err(|e| QuireError::serde(format!("parse editor options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read JSON options from disk.
    pub fn from_path(path: &Path) -> QuireResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read editor options '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Check every nested option block.
    pub fn validate(&self) -> QuireResult<()> {
        self.workspace.validate()?;
        self.snap.validate()?;
        self.viewport.validate()?;
        if self.history_limit == 0 {
            return Err(QuireError::validation("history_limit must be > 0"));
        }
        if self.cache_ceiling_bytes == 0 {
            return Err(QuireError::validation("cache_ceiling_bytes must be > 0"));
        }
        Ok(())
    }

    /// Render coalescing window.
    pub fn frame_window(&self) -> Duration {
        Duration::from_millis(self.frame_window_ms)
    }

    /// Cache manager configuration derived from these options.
    pub fn cache_opts(&self) -> CacheOpts {
        CacheOpts {
            ceiling_bytes: self.cache_ceiling_bytes,
            sweep_interval: Duration::from_millis(self.cache_sweep_interval_ms),
            ..CacheOpts::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/options.rs"]
mod tests;
