use crate::foundation::core::{Affine, BezPath, OriginX, OriginY, Point, Rect, Rgba8, Size, Vec2};
use kurbo::Shape;

/// Role tag of a scene object.
///
/// Every layering and export decision matches on this enum exhaustively; there is no
/// free-form string tagging.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionType {
    /// The page rectangle itself. Exactly one per scene.
    Workspace,
    /// Template or user background art, kept directly above the workspace.
    Background,
    /// Ingested template object the user may not move or select.
    TemplateElement,
    /// User image bound to a mold/shape, kept directly above its parent.
    FillImage,
    /// Outline companion drawn over a shape.
    Outline,
    /// "Add content" affordance icon shown on an empty mold.
    MoldIcon,
    /// Ruler guide line.
    Guideline,
    /// Cut-border or safe-border path.
    PrintGuide,
    /// Decorative overlay kept above content.
    Overlay,
    /// Regular user content.
    #[default]
    Ordinary,
}

/// Z-order band an object is confined to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    /// Bottom-most: the workspace.
    Workspace,
    /// Directly above the workspace.
    Background,
    /// User and template content.
    Content,
    /// Always-on-top helpers.
    Top,
}

impl ExtensionType {
    /// Z-order band for this tag, ignoring the per-object `always_top` flag.
    pub fn band(self) -> Band {
        match self {
            ExtensionType::Workspace => Band::Workspace,
            ExtensionType::Background => Band::Background,
            ExtensionType::TemplateElement
            | ExtensionType::FillImage
            | ExtensionType::Ordinary => Band::Content,
            ExtensionType::Outline
            | ExtensionType::MoldIcon
            | ExtensionType::Guideline
            | ExtensionType::PrintGuide
            | ExtensionType::Overlay => Band::Top,
        }
    }

    /// Objects that are regenerated by the editor and never persisted.
    pub fn is_transient(self) -> bool {
        match self {
            ExtensionType::Workspace | ExtensionType::Guideline | ExtensionType::PrintGuide => {
                true
            }
            ExtensionType::Background
            | ExtensionType::TemplateElement
            | ExtensionType::FillImage
            | ExtensionType::Outline
            | ExtensionType::MoldIcon
            | ExtensionType::Overlay
            | ExtensionType::Ordinary => false,
        }
    }
}

/// Axis a guide line is locked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// Line parallel to the x axis; moves vertically.
    Horizontal,
    /// Line parallel to the y axis; moves horizontally.
    Vertical,
}

/// Geometry payload of a scene object, in object-local coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    /// Axis-aligned rectangle anchored at the local origin.
    Rect {
        /// Width in local units.
        width: f64,
        /// Height in local units.
        height: f64,
        /// Corner radius.
        #[serde(default)]
        rx: f64,
    },
    /// Arbitrary vector outline.
    Path {
        /// Outline in local units.
        path: BezPath,
    },
    /// Text run whose box was measured with its font loaded.
    Text {
        /// Text content.
        text: String,
        /// Font family name.
        font_family: String,
        /// Font size in local units.
        font_size: f64,
        /// Measured box width.
        width: f64,
        /// Measured box height.
        height: f64,
    },
    /// Raster image.
    Image {
        /// Source reference, if known.
        #[serde(default)]
        src: Option<String>,
        /// Natural width.
        width: f64,
        /// Natural height.
        height: f64,
    },
    /// Zero-thickness line used by guides.
    Line {
        /// Axis the line runs along.
        axis: GuideAxis,
        /// Line length.
        length: f64,
    },
    /// Nested objects positioned in the group's local space.
    Group {
        /// Children in paint order.
        children: Vec<SceneObject>,
    },
}

/// Fabric-style placement: `left`/`top` locate the origin anchor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectTransform {
    /// Anchor x in scene units.
    pub left: f64,
    /// Anchor y in scene units.
    pub top: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Rotation in degrees, clockwise around the anchor.
    pub angle: f64,
    /// Horizontal anchor.
    #[serde(default)]
    pub origin_x: OriginX,
    /// Vertical anchor.
    #[serde(default)]
    pub origin_y: OriginY,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            origin_x: OriginX::Left,
            origin_y: OriginY::Top,
        }
    }
}

impl ObjectTransform {
    /// Transform placed at `(left, top)` with unit scale.
    pub fn at(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            ..Self::default()
        }
    }

    /// Return `true` when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.scale_x.is_finite()
            && self.scale_y.is_finite()
            && self.angle.is_finite()
    }
}

/// Visibility, lock and interaction flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObjectFlags {
    /// Drawn when `true`.
    pub visible: bool,
    /// Movement, scaling and rotation are locked.
    pub locked: bool,
    /// Can be picked by the pointer.
    pub selectable: bool,
    /// Always re-raised above content.
    #[serde(default)]
    pub always_top: bool,
    /// Layer reordering and deletion are refused.
    #[serde(default)]
    pub lock_layer_order: bool,
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self {
            visible: true,
            locked: false,
            selectable: true,
            always_top: false,
            lock_layer_order: false,
        }
    }
}

/// Clip region an object is drawn through.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClipRegion {
    /// The workspace rectangle.
    Workspace,
    /// The outline of another object.
    Object {
        /// Id of the clipping object.
        id: String,
    },
}

/// Fill and stroke paint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Paint {
    /// Fill color, `None` for no fill.
    #[serde(default)]
    pub fill: Option<Rgba8>,
    /// Stroke color, `None` for no stroke.
    #[serde(default)]
    pub stroke: Option<Rgba8>,
    /// Stroke width in local units.
    #[serde(default)]
    pub stroke_width: f64,
    /// Dash pattern; empty for solid strokes.
    #[serde(default)]
    pub stroke_dash: Vec<f64>,
    /// Object opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Some(Rgba8::BLACK),
            stroke: None,
            stroke_width: 0.0,
            stroke_dash: Vec::new(),
            opacity: 1.0,
        }
    }
}

/// A node of the editable scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneObject {
    /// Stable string identity, unique within a scene.
    pub id: String,
    /// Geometry payload.
    pub kind: ObjectKind,
    /// Placement.
    #[serde(default)]
    pub transform: ObjectTransform,
    /// Role tag.
    #[serde(default)]
    pub extension: ExtensionType,
    /// Optional clip region.
    #[serde(default)]
    pub clip: Option<ClipRegion>,
    /// Id of the object this one is bound to (fill image, outline, mold icon).
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Visibility and lock flags.
    #[serde(default)]
    pub flags: ObjectFlags,
    /// Paint.
    #[serde(default)]
    pub paint: Paint,
}

impl SceneObject {
    /// Create an ordinary object at the origin.
    pub fn new(id: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id: id.into(),
            kind,
            transform: ObjectTransform::default(),
            extension: ExtensionType::Ordinary,
            clip: None,
            parent_id: None,
            flags: ObjectFlags::default(),
            paint: Paint::default(),
        }
    }

    /// Rectangle of `width` x `height` at the origin.
    pub fn rect(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self::new(
            id,
            ObjectKind::Rect {
                width,
                height,
                rx: 0.0,
            },
        )
    }

    /// Builder-style placement.
    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.transform.left = left;
        self.transform.top = top;
        self
    }

    /// Builder-style role tag.
    pub fn with_extension(mut self, extension: ExtensionType) -> Self {
        self.extension = extension;
        self
    }

    /// Builder-style parent association.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Z-order band, honoring the `always_top` flag for content objects.
    pub fn band(&self) -> Band {
        match self.extension.band() {
            Band::Content if self.flags.always_top => Band::Top,
            band => band,
        }
    }

    /// Template elements and locked objects cannot be moved by the user.
    pub fn is_user_movable(&self) -> bool {
        self.extension != ExtensionType::TemplateElement
            && self.extension != ExtensionType::Workspace
            && !self.flags.locked
    }

    /// Geometry extent in local coordinates, before placement.
    pub fn local_rect(&self) -> Rect {
        match &self.kind {
            ObjectKind::Rect { width, height, .. }
            | ObjectKind::Text { width, height, .. }
            | ObjectKind::Image { width, height, .. } => Rect::new(0.0, 0.0, *width, *height),
            ObjectKind::Path { path } => {
                if path.elements().is_empty() {
                    Rect::ZERO
                } else {
                    path.bounding_box()
                }
            }
            ObjectKind::Line { axis, length } => match axis {
                GuideAxis::Horizontal => Rect::new(0.0, 0.0, *length, 0.0),
                GuideAxis::Vertical => Rect::new(0.0, 0.0, 0.0, *length),
            },
            ObjectKind::Group { children } => children
                .iter()
                .map(SceneObject::bounding_rect)
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO),
        }
    }

    /// Unscaled size of the local geometry.
    pub fn intrinsic_size(&self) -> Size {
        self.local_rect().size()
    }

    /// Local-to-scene transform.
    pub fn affine(&self) -> Affine {
        let local = self.local_rect();
        let t = &self.transform;
        let anchor = Vec2::new(
            local.x0 + local.width() * t.origin_x.factor(),
            local.y0 + local.height() * t.origin_y.factor(),
        );
        Affine::translate(Vec2::new(t.left, t.top))
            * Affine::rotate(t.angle.to_radians())
            * Affine::scale_non_uniform(t.scale_x, t.scale_y)
            * Affine::translate(-anchor)
    }

    /// Axis-aligned bounding box in scene coordinates.
    pub fn bounding_rect(&self) -> Rect {
        self.affine().transform_rect_bbox(self.local_rect())
    }

    /// Center of the placed geometry in scene coordinates.
    pub fn center(&self) -> Point {
        self.affine() * self.local_rect().center()
    }

    /// Shift the placement by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.transform.left += delta.x;
        self.transform.top += delta.y;
    }

    /// Move so that [`Self::center`] lands on `p`.
    pub fn set_center(&mut self, p: Point) {
        let delta = p - self.center();
        self.translate(delta);
    }

    /// Outline of the placed geometry in scene coordinates, when it has one.
    pub fn scene_outline(&self) -> Option<BezPath> {
        let local = match &self.kind {
            ObjectKind::Path { path } => path.clone(),
            ObjectKind::Rect { width, height, .. } => {
                Rect::new(0.0, 0.0, *width, *height).to_path(0.1)
            }
            ObjectKind::Image { width, height, .. } => {
                Rect::new(0.0, 0.0, *width, *height).to_path(0.1)
            }
            ObjectKind::Text { .. } | ObjectKind::Line { .. } | ObjectKind::Group { .. } => {
                return None;
            }
        };
        let mut path = local;
        path.apply_affine(self.affine());
        Some(path)
    }

    /// Return `true` when placement and geometry contain only finite numbers.
    pub fn is_finite(&self) -> bool {
        let r = self.local_rect();
        self.transform.is_finite()
            && r.x0.is_finite()
            && r.y0.is_finite()
            && r.x1.is_finite()
            && r.y1.is_finite()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/object.rs"]
mod tests;
