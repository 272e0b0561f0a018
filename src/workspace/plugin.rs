use crate::foundation::error::{QuireError, QuireResult};
use crate::plugin::event::{EditorEvent, EventKind};
use crate::plugin::kernel::{Editor, EditorContext, Plugin};
use crate::scene::object::{Band, ClipRegion, ExtensionType};
use crate::scene::store::SceneEvent;
use crate::workspace::guides::{GuideVisibility, PrintGuideKind, PrintGuides};
use crate::workspace::settings::WorkspaceOptions;
use crate::workspace::{sync_workspace_object, zorder};

/// Owns the page object, its clip region and the print guides.
///
/// After every scene mutation it re-asserts, in order: background above the workspace and below
/// content, top-band objects above content, fill images directly above their parents.
#[derive(Debug, Default)]
pub struct WorkspacePlugin {
    guides: PrintGuides,
}

impl WorkspacePlugin {
    /// Plugin with both guides visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Guide visibility state.
    pub fn guides(&self) -> &PrintGuides {
        &self.guides
    }

    fn regenerate_guides(&self, ctx: &mut EditorContext) -> QuireResult<()> {
        self.guides.regenerate(&mut ctx.scene, &ctx.workspace)?;
        Ok(())
    }

    fn settle(&self, ctx: &mut EditorContext) {
        apply_workspace_clip(ctx);
        if zorder::enforce_layering(&mut ctx.scene) {
            ctx.request_render();
        }
    }
}

const SUBSCRIPTIONS: &[EventKind] = &[
    EventKind::ObjectAdded,
    EventKind::ObjectRemoved,
    EventKind::ObjectModified,
    EventKind::WorkspaceResized,
    EventKind::GuideToggled,
];

impl Plugin for WorkspacePlugin {
    fn name(&self) -> &'static str {
        "workspace"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        SUBSCRIPTIONS
    }

    fn mounted(&mut self, ctx: &mut EditorContext) -> QuireResult<()> {
        sync_workspace_object(&mut ctx.scene, &ctx.workspace)?;
        self.regenerate_guides(ctx)?;
        self.settle(ctx);
        Ok(())
    }

    fn after_load(&mut self, ctx: &mut EditorContext) -> QuireResult<()> {
        sync_workspace_object(&mut ctx.scene, &ctx.workspace)?;
        self.regenerate_guides(ctx)?;
        self.settle(ctx);
        Ok(())
    }

    fn before_save(&mut self, ctx: &mut EditorContext) -> QuireResult<()> {
        self.guides.suppress();
        self.regenerate_guides(ctx)
    }

    fn after_save(&mut self, ctx: &mut EditorContext) -> QuireResult<()> {
        self.guides.restore();
        self.regenerate_guides(ctx)?;
        self.settle(ctx);
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut EditorContext, event: &EditorEvent) -> QuireResult<()> {
        match event {
            EditorEvent::Scene(SceneEvent::Added { extension, .. })
            | EditorEvent::Scene(SceneEvent::Removed { extension, .. })
            | EditorEvent::Scene(SceneEvent::Modified { extension, .. }) => {
                if *extension == ExtensionType::Background {
                    self.regenerate_guides(ctx)?;
                }
                self.settle(ctx);
            }
            EditorEvent::WorkspaceResized { .. } => {
                sync_workspace_object(&mut ctx.scene, &ctx.workspace)?;
                self.regenerate_guides(ctx)?;
                self.settle(ctx);
            }
            EditorEvent::GuideToggled { guide, visible } => {
                self.guides.set(*guide, *visible);
                self.regenerate_guides(ctx)?;
                self.settle(ctx);
            }
            EditorEvent::Scene(SceneEvent::SelectionChanged)
            | EditorEvent::ViewportChanged
            | EditorEvent::RulerToggled { .. } => {}
        }
        Ok(())
    }
}

/// Point background and content objects at the workspace clip when the profile clips, and
/// drop workspace clips when it does not. Object clips (fill images) are left alone.
fn apply_workspace_clip(ctx: &mut EditorContext) {
    let clips = ctx.workspace.profile.clips_content();
    let keys: Vec<_> = ctx
        .scene
        .iter()
        .filter(|(_, o)| matches!(o.band(), Band::Background | Band::Content))
        .filter(|(_, o)| !matches!(o.clip, Some(ClipRegion::Object { .. })))
        .filter(|(_, o)| (o.clip == Some(ClipRegion::Workspace)) != clips)
        .map(|(k, _)| k)
        .collect();
    for key in keys {
        if let Some(obj) = ctx.scene.get_mut(key) {
            obj.clip = clips.then_some(ClipRegion::Workspace);
        }
    }
}

impl Editor {
    /// Replace the workspace options and replay guide and clip recomputation.
    pub fn set_workspace_options(&mut self, opts: WorkspaceOptions) -> QuireResult<()> {
        if !self.ensure_live("set_workspace_options") {
            return Ok(());
        }
        opts.validate()?;
        self.ctx.workspace = opts;
        self.ctx.bus.publish(EditorEvent::WorkspaceResized {
            width: opts.width,
            height: opts.height,
        });
        self.ctx.request_render();
        self.dispatch();
        Ok(())
    }

    /// Resize for a two-page spread around a spine of `spine_width` pixels.
    ///
    /// `spine_width` comes from the external spine calculator; the workspace becomes
    /// `2 * page_width + spine_width` wide.
    pub fn resize_for_spine(&mut self, page_width: f64, spine_width: f64) -> QuireResult<()> {
        if !page_width.is_finite() || page_width <= 0.0 {
            return Err(QuireError::validation("page width must be finite and > 0"));
        }
        if !spine_width.is_finite() || spine_width < 0.0 {
            return Err(QuireError::validation("spine width must be finite and >= 0"));
        }
        let opts = WorkspaceOptions {
            width: 2.0 * page_width + spine_width,
            ..self.ctx.workspace
        };
        self.set_workspace_options(opts)
    }

    /// Show or hide one print guide.
    pub fn set_print_guide_visible(&mut self, guide: PrintGuideKind, visible: bool) {
        if !self.ensure_live("set_print_guide_visible") {
            return;
        }
        self.publish(EditorEvent::GuideToggled { guide, visible });
    }

    /// Flip one print guide and return its new state.
    pub fn toggle_print_guide(&mut self, guide: PrintGuideKind) -> GuideVisibility {
        let current = self
            .plugin::<WorkspacePlugin>()
            .map(|p| p.guides().visibility(guide))
            .unwrap_or_default();
        let next = current.toggled();
        self.set_print_guide_visible(guide, next == GuideVisibility::Visible);
        next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/plugin.rs"]
mod tests;
