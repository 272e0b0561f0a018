use std::any::Any;
use std::time::Instant;

use crate::foundation::error::{QuireError, QuireResult};
use crate::plugin::bus::{EventBus, PluginId};
use crate::plugin::event::{EditorEvent, EventKind};
use crate::plugin::options::EditorOptions;
use crate::render::cache::CacheManager;
use crate::render::scheduler::RenderScheduler;
use crate::render::surface::RenderSurface;
use crate::ruler::snap::SnapConfig;
use crate::ruler::viewport::Viewport;
use crate::scene::arena::ObjectKey;
use crate::scene::document::SceneDocument;
use crate::scene::history::{History, restore_snapshot};
use crate::scene::object::SceneObject;
use crate::scene::store::{Scene, SceneId};
use crate::workspace::settings::WorkspaceOptions;

/// Upper bound on events delivered by one [`Editor::dispatch`] call.
const MAX_DISPATCH_EVENTS: usize = 100_000;

/// Lifecycle checkpoint a plugin hook runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// Plugin is registered and the editor is ready.
    Mounted,
    /// A document is about to replace the scene content.
    BeforeLoad,
    /// A document was loaded.
    AfterLoad,
    /// The scene is about to be serialized.
    BeforeSave,
    /// The scene was serialized.
    AfterSave,
    /// The editor is shutting down.
    Destroyed,
    /// Delivery of a bus event.
    Event,
}

impl Hook {
    /// `after*` and `destroyed` run in reverse registration order.
    pub fn is_reverse(self) -> bool {
        matches!(self, Hook::AfterLoad | Hook::AfterSave | Hook::Destroyed)
    }
}

/// A hook that returned an error. The remaining plugins still ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    /// Name of the failing plugin.
    pub plugin: &'static str,
    /// Checkpoint that failed.
    pub hook: Hook,
    /// Rendered error.
    pub message: String,
}

/// An editor extension driven by lifecycle hooks and bus events.
///
/// Every hook returns its completion signal as a `QuireResult`; the kernel waits for all
/// plugins at a checkpoint before moving on. Plugins never reference each other: they publish
/// on `ctx.bus` and subscribe through [`Plugin::subscriptions`].
pub trait Plugin: Any {
    /// Stable plugin name used in logs.
    fn name(&self) -> &'static str;

    /// Event kinds delivered to [`Plugin::on_event`].
    fn subscriptions(&self) -> &'static [EventKind] {
        &[]
    }

    /// Called once after registration when the editor is mounted.
    fn mounted(&mut self, _ctx: &mut EditorContext) -> QuireResult<()> {
        Ok(())
    }

    /// Called before `doc` replaces the scene content.
    fn before_load(&mut self, _ctx: &mut EditorContext, _doc: &SceneDocument) -> QuireResult<()> {
        Ok(())
    }

    /// Called after a document was loaded.
    fn after_load(&mut self, _ctx: &mut EditorContext) -> QuireResult<()> {
        Ok(())
    }

    /// Called before the scene is serialized.
    fn before_save(&mut self, _ctx: &mut EditorContext) -> QuireResult<()> {
        Ok(())
    }

    /// Called after the scene was serialized.
    fn after_save(&mut self, _ctx: &mut EditorContext) -> QuireResult<()> {
        Ok(())
    }

    /// Release listeners and caches.
    fn destroyed(&mut self, _ctx: &mut EditorContext) -> QuireResult<()> {
        Ok(())
    }

    /// Handle one subscribed event.
    fn on_event(&mut self, _ctx: &mut EditorContext, _event: &EditorEvent) -> QuireResult<()> {
        Ok(())
    }
}

/// Shared state every plugin operates on.
pub struct EditorContext {
    /// The scene graph.
    pub scene: Scene,
    /// Current page geometry.
    pub workspace: WorkspaceOptions,
    /// Undo/redo log.
    pub history: History,
    /// Render coalescing.
    pub scheduler: RenderScheduler,
    /// Per-object raster cache bookkeeping.
    pub caches: CacheManager,
    /// Lateral plugin messaging.
    pub bus: EventBus,
    /// Zoom and pan.
    pub viewport: Viewport,
    /// Snapping thresholds.
    pub snap: SnapConfig,
    surface: Option<Box<dyn RenderSurface>>,
    now: Instant,
}

impl EditorContext {
    fn new(opts: &EditorOptions, scene_id: SceneId) -> Self {
        Self {
            scene: Scene::new(scene_id),
            workspace: opts.workspace,
            history: History::new(opts.history_limit),
            scheduler: RenderScheduler::new(opts.frame_window()),
            caches: CacheManager::new(opts.cache_opts()),
            bus: EventBus::new(),
            viewport: opts.viewport,
            snap: opts.snap,
            surface: None,
            now: Instant::now(),
        }
    }

    /// Clock value of the most recent [`Editor::tick`].
    pub fn now(&self) -> Instant {
        self.now
    }

    /// `false` once the scene or the attached surface has been torn down.
    pub fn is_live(&self) -> bool {
        self.scene.is_alive() && self.surface.as_ref().is_none_or(|s| s.is_alive())
    }

    /// Schedule a coalesced render.
    pub fn request_render(&mut self) {
        let id = self.scene.id();
        self.scheduler.request(id, self.now);
    }

    /// Schedule a render for the next tick.
    pub fn request_render_immediate(&mut self) {
        let id = self.scene.id();
        self.scheduler.request_immediate(id, self.now);
    }

    /// Run `f` as one undo step.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.history.suspend();
        let out = f(self);
        self.history.record(&self.scene);
        self.history.resume(&self.scene);
        out
    }

    /// Run `f` as one undo step with rendering paused; exactly one render follows.
    pub fn bulk<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let id = self.scene.id();
        self.scheduler.pause(id);
        let out = self.transaction(f);
        self.scheduler.resume(id, self.now);
        out
    }
}

struct Slot {
    id: PluginId,
    plugin: Box<dyn Plugin>,
}

/// Summary of one [`Editor::tick`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// A render was issued to the surface.
    pub rendered: bool,
    /// Object caches evicted by the sweep.
    pub evicted: usize,
}

/// Plugin host owning one scene.
pub struct Editor {
    pub(crate) ctx: EditorContext,
    plugins: Vec<Slot>,
    next_plugin: u32,
    failures: Vec<HookFailure>,
    mounted: bool,
    options: EditorOptions,
}

impl Editor {
    /// Editor with no plugins and a workspace object sized from `options`.
    pub fn new(options: EditorOptions) -> QuireResult<Self> {
        options.validate()?;
        let mut ctx = EditorContext::new(&options, next_scene_id());
        crate::workspace::sync_workspace_object(&mut ctx.scene, &ctx.workspace)?;
        // Construction is not a mutation plugins can observe.
        ctx.scene.drain_events();
        ctx.history.reset(&ctx.scene);
        Ok(Self {
            ctx,
            plugins: Vec::new(),
            next_plugin: 0,
            failures: Vec::new(),
            mounted: false,
            options,
        })
    }

    /// Editor with the workspace, ruler and cache plugins registered and mounted.
    pub fn with_default_plugins(options: EditorOptions) -> QuireResult<Self> {
        let ruler_enabled = options.ruler_enabled;
        let mut editor = Self::new(options)?;
        editor.register(crate::workspace::plugin::WorkspacePlugin::new());
        editor.register(crate::ruler::plugin::RulerPlugin::new(ruler_enabled));
        editor.register(crate::render::plugin::CachePlugin::new());
        editor.mount();
        Ok(editor)
    }

    /// Options the editor was created with.
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Shared state.
    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    /// Shared state, mutably. Callers are responsible for calling [`Editor::dispatch`].
    pub fn context_mut(&mut self) -> &mut EditorContext {
        &mut self.ctx
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.ctx.scene
    }

    /// Current workspace options.
    pub fn workspace(&self) -> &WorkspaceOptions {
        &self.ctx.workspace
    }

    /// Attach the drawing surface renders are issued to.
    pub fn set_surface(&mut self, surface: Box<dyn RenderSurface>) {
        self.ctx.surface = Some(surface);
        self.ctx.request_render_immediate();
    }

    /// Detach and return the drawing surface.
    pub fn take_surface(&mut self) -> Option<Box<dyn RenderSurface>> {
        self.ctx.surface.take()
    }

    /// Register a plugin. When the editor is already mounted its `mounted` hook runs now.
    pub fn register<P: Plugin>(&mut self, plugin: P) -> PluginId {
        let id = PluginId(self.next_plugin);
        self.next_plugin += 1;
        self.ctx.bus.subscribe(id, plugin.subscriptions());
        tracing::debug!(plugin = plugin.name(), "plugin registered");
        self.plugins.push(Slot {
            id,
            plugin: Box::new(plugin),
        });
        if self.mounted {
            let last = self.plugins.len() - 1;
            self.run_hook_on(last, Hook::Mounted, &mut |p, ctx| p.mounted(ctx));
            self.dispatch();
        }
        id
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Run every `mounted` hook in registration order.
    pub fn mount(&mut self) {
        if self.mounted {
            tracing::debug!("editor already mounted");
            return;
        }
        self.mounted = true;
        self.run_hook(Hook::Mounted, &mut |p, ctx| p.mounted(ctx));
        self.dispatch();
    }

    /// Borrow the first registered plugin of type `T`.
    pub fn plugin<T: Plugin>(&self) -> Option<&T> {
        self.plugins.iter().find_map(|s| {
            let any: &dyn Any = s.plugin.as_ref();
            any.downcast_ref::<T>()
        })
    }

    /// Run `f` against plugin `T` and the shared context, then dispatch resulting events.
    pub fn with_plugin<T: Plugin, R>(
        &mut self,
        f: impl FnOnce(&mut T, &mut EditorContext) -> R,
    ) -> Option<R> {
        let slot = self.plugins.iter_mut().find(|s| {
            let any: &dyn Any = s.plugin.as_ref();
            any.is::<T>()
        })?;
        let any: &mut dyn Any = slot.plugin.as_mut();
        let plugin = any.downcast_mut::<T>()?;
        let out = f(plugin, &mut self.ctx);
        self.dispatch();
        Some(out)
    }

    pub(crate) fn plugin_with_context<T: Plugin>(&mut self) -> Option<(&mut T, &EditorContext)> {
        let plugin = self.plugins.iter_mut().find_map(|s| {
            let any: &mut dyn Any = s.plugin.as_mut();
            any.downcast_mut::<T>()
        })?;
        Some((plugin, &self.ctx))
    }

    /// Hook failures recorded since the last [`Editor::take_hook_failures`].
    pub fn hook_failures(&self) -> &[HookFailure] {
        &self.failures
    }

    /// Drain recorded hook failures.
    pub fn take_hook_failures(&mut self) -> Vec<HookFailure> {
        std::mem::take(&mut self.failures)
    }

    fn run_hook(
        &mut self,
        hook: Hook,
        f: &mut dyn FnMut(&mut dyn Plugin, &mut EditorContext) -> QuireResult<()>,
    ) {
        let n = self.plugins.len();
        if hook.is_reverse() {
            for i in (0..n).rev() {
                self.run_hook_on(i, hook, f);
            }
        } else {
            for i in 0..n {
                self.run_hook_on(i, hook, f);
            }
        }
    }

    fn run_hook_on(
        &mut self,
        index: usize,
        hook: Hook,
        f: &mut dyn FnMut(&mut dyn Plugin, &mut EditorContext) -> QuireResult<()>,
    ) {
        let slot = &mut self.plugins[index];
        if let Err(e) = f(slot.plugin.as_mut(), &mut self.ctx) {
            record_failure(&mut self.failures, slot.plugin.name(), hook, &e);
        }
    }

    /// Forward scene events to the bus and deliver queued events until the queues settle.
    ///
    /// Returns the number of events delivered.
    pub fn dispatch(&mut self) -> usize {
        let mut delivered = 0usize;
        while delivered < MAX_DISPATCH_EVENTS {
            if self.ctx.scene.has_pending_events() {
                for ev in self.ctx.scene.drain_events() {
                    self.ctx.bus.publish(EditorEvent::Scene(ev));
                }
                self.ctx.request_render();
            }
            let Some(event) = self.ctx.bus.pop() else {
                return delivered;
            };
            let subscribers = self.ctx.bus.subscribers(event.kind()).to_vec();
            for id in subscribers {
                let Some(slot) = self.plugins.iter_mut().find(|s| s.id == id) else {
                    continue;
                };
                if let Err(e) = slot.plugin.on_event(&mut self.ctx, &event) {
                    record_failure(&mut self.failures, slot.plugin.name(), Hook::Event, &e);
                }
            }
            delivered += 1;
        }
        tracing::warn!(
            delivered,
            pending = self.ctx.bus.pending(),
            "event dispatch did not settle; dropping queued events"
        );
        self.ctx.bus.clear();
        delivered
    }

    /// Publish an event and dispatch it.
    pub fn publish(&mut self, event: EditorEvent) {
        self.ctx.bus.publish(event);
        self.dispatch();
    }

    pub(crate) fn ensure_live(&self, op: &str) -> bool {
        let live = self.ctx.is_live();
        if !live {
            tracing::warn!(op, "editor surface is torn down; ignoring");
        }
        live
    }

    /// Run `f` as one undo step, letting plugins react before the step is recorded.
    pub fn transact<R>(&mut self, f: impl FnOnce(&mut EditorContext) -> R) -> R {
        self.ctx.history.suspend();
        let out = f(&mut self.ctx);
        self.dispatch();
        self.ctx.history.record(&self.ctx.scene);
        self.ctx.history.resume(&self.ctx.scene);
        out
    }

    /// Add a user object at the top of the content band.
    pub fn add_object(&mut self, obj: SceneObject) -> QuireResult<ObjectKey> {
        if !self.ensure_live("add_object") {
            return Err(QuireError::surface("editor is torn down"));
        }
        self.transact(|ctx| ctx.scene.add(obj))
    }

    /// Replace the selection; renders on the next tick.
    pub fn select(&mut self, keys: &[ObjectKey]) {
        if !self.ensure_live("select") {
            return;
        }
        self.ctx.scene.select(keys);
        self.ctx.request_render_immediate();
        self.dispatch();
    }

    /// Step back one history entry.
    pub fn undo(&mut self) -> bool {
        if !self.ensure_live("undo") {
            return false;
        }
        let Some(snap) = self.ctx.history.undo() else {
            tracing::debug!("nothing to undo");
            return false;
        };
        restore_snapshot(&mut self.ctx.scene, &snap);
        self.dispatch();
        true
    }

    /// Step forward one history entry.
    pub fn redo(&mut self) -> bool {
        if !self.ensure_live("redo") {
            return false;
        }
        let Some(snap) = self.ctx.history.redo() else {
            tracing::debug!("nothing to redo");
            return false;
        };
        restore_snapshot(&mut self.ctx.scene, &snap);
        self.dispatch();
        true
    }

    /// Replace the scene content with `doc`.
    ///
    /// `before_load` hooks run in registration order, `after_load` in reverse. History is reset
    /// to the loaded state.
    #[tracing::instrument(skip(self, doc), fields(objects = doc.objects.len()))]
    pub fn load(&mut self, doc: SceneDocument) -> QuireResult<()> {
        if !self.ensure_live("load") {
            return Ok(());
        }
        doc.validate()?;
        self.run_hook(Hook::BeforeLoad, &mut |p, ctx| p.before_load(ctx, &doc));
        self.dispatch();

        let workspace = doc.workspace;
        let result = self.ctx.bulk(|ctx| -> QuireResult<()> {
            ctx.scene.clear_selection();
            ctx.scene.clear_persisted();
            ctx.workspace = workspace;
            crate::workspace::sync_workspace_object(&mut ctx.scene, &ctx.workspace)?;
            for obj in doc.objects {
                ctx.scene.add(obj)?;
            }
            Ok(())
        });
        self.dispatch();
        self.ctx.history.reset(&self.ctx.scene);
        result?;

        self.run_hook(Hook::AfterLoad, &mut |p, ctx| p.after_load(ctx));
        self.dispatch();
        self.ctx.history.reset(&self.ctx.scene);
        tracing::info!(objects = self.ctx.scene.len(), "document loaded");
        Ok(())
    }

    /// Serialize the scene. Transient guides are hidden around the capture.
    #[tracing::instrument(skip(self))]
    pub fn save(&mut self) -> QuireResult<SceneDocument> {
        if !self.ensure_live("save") {
            return Err(QuireError::surface("editor is torn down"));
        }
        self.run_hook(Hook::BeforeSave, &mut |p, ctx| p.before_save(ctx));
        self.dispatch();
        let doc = SceneDocument::capture(&self.ctx.scene, &self.ctx.workspace);
        self.run_hook(Hook::AfterSave, &mut |p, ctx| p.after_save(ctx));
        self.dispatch();
        Ok(doc)
    }

    /// Run `destroyed` hooks in reverse order, drop subscriptions and tear the scene down.
    pub fn destroy(&mut self) {
        if !self.ctx.scene.is_alive() {
            tracing::debug!("editor already destroyed");
            return;
        }
        self.run_hook(Hook::Destroyed, &mut |p, ctx| p.destroyed(ctx));
        for slot in &self.plugins {
            self.ctx.bus.unsubscribe_all(slot.id);
        }
        self.ctx.bus.clear();
        let id = self.ctx.scene.id();
        self.ctx.scheduler.cancel(id);
        self.ctx.caches.clear();
        self.ctx.scene.tear_down();
        self.mounted = false;
    }

    /// Advance the clock: deliver events, issue a due render and sweep caches.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();
        if !self.ensure_live("tick") {
            return report;
        }
        self.ctx.now = now;
        self.dispatch();

        let id = self.ctx.scene.id();
        if self.ctx.scheduler.poll(now).contains(&id) {
            report.rendered = self.render_frame(now);
        }
        if self.ctx.caches.sweep_due(now) {
            let protected = self.ctx.scene.workspace_key();
            report.evicted = self.ctx.caches.sweep(now, protected).len();
        }
        report
    }

    fn render_frame(&mut self, now: Instant) -> bool {
        let ctx = &mut self.ctx;
        let Some(surface) = ctx.surface.as_mut() else {
            return false;
        };
        if !surface.is_alive() {
            tracing::warn!("render skipped: surface is torn down");
            return false;
        }
        match surface.render(&ctx.scene, &ctx.workspace) {
            Ok(outcome) => {
                for c in outcome.cached {
                    if ctx.caches.entry(c.key).is_none() {
                        ctx.caches.on_created(c.key, c.width, c.height, now);
                    }
                }
                // The active selection is in use every frame it is drawn.
                for key in ctx.scene.selection() {
                    ctx.caches.touch(*key, now);
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "render failed");
                false
            }
        }
    }
}

fn record_failure(
    failures: &mut Vec<HookFailure>,
    plugin: &'static str,
    hook: Hook,
    e: &QuireError,
) {
    tracing::warn!(plugin, ?hook, error = %e, "plugin hook failed");
    failures.push(HookFailure {
        plugin,
        hook,
        message: e.to_string(),
    });
}

fn next_scene_id() -> SceneId {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT: AtomicU64 = AtomicU64::new(1);
    SceneId(NEXT.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/kernel.rs"]
mod tests;
