use crate::foundation::core::{Point, Unit, Vec2};
use crate::foundation::error::QuireResult;
use crate::foundation::math::StateHasher;
use crate::layers::engine;
use crate::plugin::event::{EditorEvent, EventKind};
use crate::plugin::kernel::{Editor, EditorContext, Plugin};
use crate::ruler::guideline::{
    GUIDE_ID_PREFIX, guide_position, guideline_object, over_origin_ruler, set_guide_position,
    snapped_guide_position,
};
use crate::ruler::snap::{CenterSnap, snap_angle, snap_center, snap_to_grid};
use crate::ruler::ticks::{Tick, ruler_ticks};
use crate::ruler::viewport::Viewport;
use crate::scene::arena::ObjectKey;
use crate::scene::object::{ExtensionType, GuideAxis};

/// Centerlines currently shown while dragging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Centerlines {
    /// Vertical line through the workspace center.
    pub vertical: bool,
    /// Horizontal line through the workspace center.
    pub horizontal: bool,
}

/// Everything needed to paint both ruler strips for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RulerFrame {
    /// Ticks of the top strip.
    pub horizontal: Vec<Tick>,
    /// Ticks of the left strip.
    pub vertical: Vec<Tick>,
    /// Screen x extents of the selected objects.
    pub highlight_x: Vec<(f64, f64)>,
    /// Screen y extents of the selected objects.
    pub highlight_y: Vec<(f64, f64)>,
    /// Unit labels are expressed in.
    pub unit: Unit,
}

/// Rulers, guide lines and drag snapping.
///
/// Ruler frames are produced on demand and skipped when nothing they depend on changed.
#[derive(Debug)]
pub struct RulerPlugin {
    enabled: bool,
    last_hash: Option<u64>,
    centerlines: Centerlines,
    dragging: bool,
}

impl RulerPlugin {
    /// Plugin with rulers initially on or off.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_hash: None,
            centerlines: Centerlines::default(),
            dragging: false,
        }
    }

    /// `true` while rulers and guide dragging are active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Centerlines shown by the last object drag step.
    pub fn centerlines(&self) -> Centerlines {
        self.centerlines
    }

    /// Ruler frame for the current state, or `None` when it matches the previous one.
    pub fn frame(&mut self, ctx: &EditorContext) -> Option<RulerFrame> {
        if !self.enabled {
            return None;
        }
        let hash = ruler_state_hash(ctx);
        if self.last_hash == Some(hash) {
            return None;
        }
        self.last_hash = Some(hash);

        let vp = &ctx.viewport;
        let unit = ctx.workspace.unit;
        let (mut highlight_x, mut highlight_y) = (Vec::new(), Vec::new());
        for key in ctx.scene.selection() {
            let Some(obj) = ctx.scene.get(*key) else {
                continue;
            };
            let r = vp.transform().transform_rect_bbox(obj.bounding_rect());
            highlight_x.push((r.x0, r.x1));
            highlight_y.push((r.y0, r.y1));
        }
        Some(RulerFrame {
            horizontal: ruler_ticks(GuideAxis::Horizontal, vp, unit, ctx.workspace.dpi),
            vertical: ruler_ticks(GuideAxis::Vertical, vp, unit, ctx.workspace.dpi),
            highlight_x,
            highlight_y,
            unit,
        })
    }

    fn apply_guide_state(&self, ctx: &mut EditorContext) {
        let guides: Vec<ObjectKey> = ctx
            .scene
            .iter()
            .filter(|(_, o)| o.extension == ExtensionType::Guideline)
            .map(|(k, _)| k)
            .collect();
        for key in guides {
            if let Some(obj) = ctx.scene.get_mut(key) {
                obj.flags.visible = self.enabled;
                obj.flags.selectable = self.enabled;
            }
        }
        ctx.request_render();
    }
}

fn ruler_state_hash(ctx: &EditorContext) -> u64 {
    let vp = &ctx.viewport;
    let mut h = StateHasher::new();
    h.write_affine(vp.transform());
    h.write_f64(vp.canvas_width);
    h.write_f64(vp.canvas_height);
    h.write_u8(match ctx.workspace.unit {
        Unit::Px => 0,
        Unit::Mm => 1,
    });
    h.write_f64(ctx.workspace.dpi);
    h.write_u32(u32::try_from(ctx.scene.selection().len()).unwrap_or(u32::MAX));
    for key in ctx.scene.selection() {
        if let Some(obj) = ctx.scene.get(*key) {
            h.write_rect(obj.bounding_rect());
        }
    }
    h.finish()
}

const SUBSCRIPTIONS: &[EventKind] = &[EventKind::RulerToggled];

impl Plugin for RulerPlugin {
    fn name(&self) -> &'static str {
        "ruler"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        SUBSCRIPTIONS
    }

    fn mounted(&mut self, ctx: &mut EditorContext) -> QuireResult<()> {
        self.apply_guide_state(ctx);
        Ok(())
    }

    fn destroyed(&mut self, _ctx: &mut EditorContext) -> QuireResult<()> {
        self.last_hash = None;
        self.centerlines = Centerlines::default();
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut EditorContext, event: &EditorEvent) -> QuireResult<()> {
        if let EditorEvent::RulerToggled { enabled } = event {
            self.enabled = *enabled;
            self.last_hash = None;
            self.apply_guide_state(ctx);
        }
        Ok(())
    }
}

impl Editor {
    /// `true` when the ruler plugin is registered and enabled.
    pub fn ruler_enabled(&self) -> bool {
        self.plugin::<RulerPlugin>().is_some_and(RulerPlugin::is_enabled)
    }

    /// Switch rulers on or off. Disabled rulers hide guides and refuse guide dragging.
    pub fn set_ruler_enabled(&mut self, enabled: bool) {
        if !self.ensure_live("set_ruler_enabled") {
            return;
        }
        self.publish(EditorEvent::RulerToggled { enabled });
    }

    /// Current zoom and pan.
    pub fn viewport(&self) -> &Viewport {
        &self.ctx.viewport
    }

    /// Replace zoom, pan and canvas size.
    pub fn set_viewport(&mut self, viewport: Viewport) -> QuireResult<()> {
        if !self.ensure_live("set_viewport") {
            return Ok(());
        }
        viewport.validate()?;
        self.ctx.viewport = viewport;
        self.ctx.request_render();
        self.publish(EditorEvent::ViewportChanged);
        Ok(())
    }

    /// Zoom around a screen-space anchor.
    pub fn zoom_at(&mut self, zoom: f64, anchor: Point) {
        if !self.ensure_live("zoom_at") {
            return;
        }
        if let Err(e) = self.ctx.viewport.zoom_at(zoom, anchor) {
            tracing::debug!(zoom, error = %e, "zoom ignored");
            return;
        }
        self.ctx.request_render();
        self.publish(EditorEvent::ViewportChanged);
    }

    /// Ruler frame to paint, or `None` when rulers are off or nothing changed.
    pub fn ruler_frame(&mut self) -> Option<RulerFrame> {
        let (plugin, ctx) = self.plugin_with_context::<RulerPlugin>()?;
        plugin.frame(ctx)
    }

    /// Start dragging a guide out of a ruler strip at `screen`.
    ///
    /// Horizontal guides come from the top strip, vertical ones from the left strip.
    pub fn begin_guide_drag(&mut self, axis: GuideAxis, screen: Point) -> Option<ObjectKey> {
        if !self.ensure_live("begin_guide_drag") {
            return None;
        }
        if !self.ruler_enabled() {
            tracing::debug!("rulers are disabled; no guide created");
            return None;
        }
        let scene_pt = self.ctx.viewport.screen_to_scene(screen);
        let ws = self.ctx.workspace;
        let position = snapped_guide_position(axis, scene_pt, ws.unit, ws.dpi);
        let id = self.ctx.scene.unique_id(GUIDE_ID_PREFIX);
        let key = match self.ctx.scene.add(guideline_object(id, axis, position)) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(error = %e, "failed to create guide");
                return None;
            }
        };
        self.dispatch();
        Some(key)
    }

    /// Move a guide to follow the pointer, snapped to whole units.
    pub fn drag_guide(&mut self, key: ObjectKey, screen: Point) -> bool {
        if !self.ensure_live("drag_guide") || !self.ruler_enabled() {
            return false;
        }
        let Some((axis, _)) = self.ctx.scene.get(key).and_then(guide_position) else {
            return false;
        };
        let scene_pt = self.ctx.viewport.screen_to_scene(screen);
        let ws = self.ctx.workspace;
        let position = snapped_guide_position(axis, scene_pt, ws.unit, ws.dpi);
        let moved = self
            .ctx
            .scene
            .modify(key, |o| set_guide_position(o, axis, position));
        self.dispatch();
        moved
    }

    /// Finish a guide drag. Returns `true` when the guide was dropped on its ruler and removed.
    pub fn end_guide_drag(&mut self, key: ObjectKey, screen: Point) -> bool {
        if !self.ensure_live("end_guide_drag") {
            return false;
        }
        let Some((axis, _)) = self.ctx.scene.get(key).and_then(guide_position) else {
            return false;
        };
        if !over_origin_ruler(axis, screen) {
            return false;
        }
        let removed = self.ctx.scene.remove(key).is_some();
        self.dispatch();
        removed
    }

    /// Keys of all guide lines in paint order.
    pub fn guidelines(&self) -> Vec<ObjectKey> {
        self.ctx
            .scene
            .iter()
            .filter(|(_, o)| o.extension == ExtensionType::Guideline)
            .map(|(k, _)| k)
            .collect()
    }

    /// One pointer step of an object drag towards placement `(left, top)`.
    ///
    /// Grid snapping applies first, then centerline snapping per axis. The object's
    /// companions follow. History is recorded once by [`Editor::end_object_drag`].
    pub fn drag_object(&mut self, key: ObjectKey, left: f64, top: f64) -> Option<CenterSnap> {
        if !self.ensure_live("drag_object") {
            return None;
        }
        let obj = self.ctx.scene.get(key)?;
        if !obj.is_user_movable() {
            tracing::debug!(id = %obj.id, "object is not movable");
            return None;
        }
        let mut target = Point::new(left, top);
        if let Some(pitch) = self.ctx.snap.grid {
            target = snap_to_grid(target, pitch);
        }
        let mut delta = target - Point::new(obj.transform.left, obj.transform.top);
        let bounds = obj.bounding_rect() + delta;
        let snap = snap_center(bounds, self.ctx.workspace.rect(), &self.ctx.snap);
        delta += snap.center - bounds.center();

        if delta != Vec2::ZERO {
            engine::move_by(&mut self.ctx.scene, key, delta);
        }
        self.with_plugin::<RulerPlugin, _>(|p, _| {
            p.dragging = true;
            p.centerlines = Centerlines {
                vertical: snap.show_vertical,
                horizontal: snap.show_horizontal,
            };
        });
        Some(snap)
    }

    /// Finish an object drag: hide centerlines and record one undo step.
    pub fn end_object_drag(&mut self) {
        if !self.ensure_live("end_object_drag") {
            return;
        }
        let was_dragging = self
            .with_plugin::<RulerPlugin, _>(|p, _| {
                p.centerlines = Centerlines::default();
                std::mem::take(&mut p.dragging)
            })
            .unwrap_or(false);
        if was_dragging {
            self.ctx.history.record(&self.ctx.scene);
            self.ctx.request_render();
        }
    }

    /// Rotate `key` about its center to `angle` degrees, snapping near multiples of the
    /// configured step. Returns the applied angle.
    pub fn rotate_object(&mut self, key: ObjectKey, angle: f64) -> Option<f64> {
        if !self.ensure_live("rotate_object") {
            return None;
        }
        let obj = self.ctx.scene.get(key)?;
        if !obj.is_user_movable() || !angle.is_finite() {
            tracing::debug!(id = %obj.id, "object cannot be rotated");
            return None;
        }
        let snapped = snap_angle(angle, &self.ctx.snap);
        self.transact(|ctx| {
            ctx.scene.modify(key, |o| {
                let c = o.center();
                o.transform.angle = snapped;
                o.set_center(c);
            })
        });
        Some(snapped)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ruler/plugin.rs"]
mod tests;
