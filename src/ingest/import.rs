use std::collections::HashSet;

use kurbo::Shape;
use usvg::tiny_skia_path::{PathSegment, Transform};

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};
use crate::foundation::error::{QuireError, QuireResult};
use crate::ingest::fonts::{FontCache, font_resolver};
use crate::scene::object::{ClipRegion, ExtensionType, ObjectKind, Paint, SceneObject};

/// One primitive produced by a vector import, placed in page coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedObject {
    /// The primitive.
    pub object: SceneObject,
    /// Ids of the groups it was nested in, outermost first.
    pub ancestors: Vec<String>,
}

/// Flat primitive list for one page.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedPage {
    /// Bounding box of the page content, honoring clips.
    pub bounds: Rect,
    /// Primitives in paint order.
    pub objects: Vec<ImportedObject>,
}

/// Turns standalone SVG markup into scene primitives.
///
/// Text geometry depends on the fonts in `fonts`, so callers load fonts first.
pub trait VectorImporter {
    /// Import one page's markup.
    fn import(&self, markup: &str, fonts: &FontCache) -> QuireResult<ImportedPage>;
}

/// [`VectorImporter`] backed by usvg: one primitive per path, text and image leaf.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsvgImporter;

impl VectorImporter for UsvgImporter {
    fn import(&self, markup: &str, fonts: &FontCache) -> QuireResult<ImportedPage> {
        let opts = usvg::Options {
            fontdb: fonts.database(),
            font_resolver: font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(markup, &opts)
            .map_err(|e| QuireError::ingest(format!("import page markup: {e}")))?;

        let mut walker = Walker::default();
        walker.group(tree.root(), &Scope::default());

        let size = tree.size();
        let bounds = walker.bounds.unwrap_or_else(|| {
            Rect::new(0.0, 0.0, f64::from(size.width()), f64::from(size.height()))
        });
        Ok(ImportedPage {
            bounds,
            objects: walker.objects,
        })
    }
}

#[derive(Clone)]
struct Scope {
    ancestors: Vec<String>,
    opacity: f64,
    clip: Option<(String, Rect)>,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            ancestors: Vec::new(),
            opacity: 1.0,
            clip: None,
        }
    }
}

#[derive(Default)]
struct Walker {
    objects: Vec<ImportedObject>,
    ids: HashSet<String>,
    bounds: Option<Rect>,
    anonymous: usize,
}

impl Walker {
    fn group(&mut self, group: &usvg::Group, parent: &Scope) {
        let mut scope = parent.clone();
        scope.opacity *= f64::from(group.opacity().get());
        if !group.id().is_empty() {
            scope.ancestors.push(group.id().to_string());
        }

        let mut clip_object = None;
        if let Some(clip) = group.clip_path() {
            let base = affine(group.abs_transform()) * affine(clip.transform());
            let mut outline = BezPath::new();
            clip_outline(clip.root(), base, &mut outline);
            if !outline.elements().is_empty() {
                let id = self.claim_id(clip.id(), &scope.ancestors);
                let rect = outline.bounding_box();
                let mut obj = placed_path(id.clone(), outline);
                obj.extension = ExtensionType::TemplateElement;
                obj.paint.fill = None;
                obj.flags.visible = false;
                obj.flags.selectable = false;
                obj.flags.locked = true;
                let rect = match &scope.clip {
                    Some((_, outer)) => rect.intersect(*outer),
                    None => rect,
                };
                scope.clip = Some((id, rect));
                clip_object = Some(obj);
            }
        }

        for child in group.children() {
            match child {
                usvg::Node::Group(g) => self.group(g, &scope),
                usvg::Node::Path(p) => self.path(p, &scope),
                usvg::Node::Text(t) => self.text(t, &scope),
                usvg::Node::Image(i) => self.image(i, &scope),
            }
        }

        if let Some(obj) = clip_object {
            self.objects.push(ImportedObject {
                object: obj,
                ancestors: parent.ancestors.clone(),
            });
        }
    }

    fn path(&mut self, path: &usvg::Path, scope: &Scope) {
        if !path.is_visible() {
            return;
        }
        let xf = affine(path.abs_transform());
        let outline = bez_path(path.data(), xf);
        if outline.elements().is_empty() {
            return;
        }
        let id = self.claim_id(path.id(), &scope.ancestors);
        let mut obj = placed_path(id, outline);
        obj.paint = Paint {
            fill: path.fill().and_then(|f| color(f.paint(), f.opacity().get())),
            stroke: path
                .stroke()
                .and_then(|s| color(s.paint(), s.opacity().get())),
            stroke_width: path
                .stroke()
                .map_or(0.0, |s| f64::from(s.width().get()) * uniform_scale(xf)),
            stroke_dash: path
                .stroke()
                .and_then(|s| s.dasharray())
                .map(|d| d.iter().map(|v| f64::from(*v)).collect())
                .unwrap_or_default(),
            opacity: scope.opacity,
        };
        self.push(obj, scope);
    }

    fn text(&mut self, text: &usvg::Text, scope: &Scope) {
        let content = text
            .chunks()
            .iter()
            .map(|c| c.text())
            .collect::<Vec<_>>()
            .join("\n");
        if content.trim().is_empty() {
            return;
        }
        let span = text.chunks().iter().flat_map(|c| c.spans()).next();
        let font_family = span
            .and_then(|s| {
                s.font().families().iter().find_map(|f| match f {
                    usvg::FontFamily::Named(name) => Some(name.clone()),
                    _ => None,
                })
            })
            .unwrap_or_else(|| "sans-serif".to_string());
        let scale = uniform_scale(affine(text.abs_transform()));
        let font_size = span.map_or(12.0, |s| f64::from(s.font_size().get())) * scale;
        let fill = span
            .and_then(|s| s.fill())
            .and_then(|f| color(f.paint(), f.opacity().get()));

        let bbox = rect(text.abs_bounding_box());
        let id = self.claim_id(text.id(), &scope.ancestors);
        let mut obj = SceneObject::new(
            id,
            ObjectKind::Text {
                text: content,
                font_family,
                font_size,
                width: bbox.width(),
                height: bbox.height(),
            },
        )
        .at(bbox.x0, bbox.y0);
        obj.paint.fill = fill;
        obj.paint.opacity = scope.opacity;
        self.push(obj, scope);
    }

    fn image(&mut self, image: &usvg::Image, scope: &Scope) {
        let bbox = rect(image.abs_bounding_box());
        let id = self.claim_id(image.id(), &scope.ancestors);
        let mut obj = SceneObject::new(
            id,
            ObjectKind::Image {
                src: None,
                width: bbox.width(),
                height: bbox.height(),
            },
        )
        .at(bbox.x0, bbox.y0);
        obj.paint.fill = None;
        obj.paint.opacity = scope.opacity;
        self.push(obj, scope);
    }

    fn push(&mut self, mut obj: SceneObject, scope: &Scope) {
        let mut extent = obj.bounding_rect();
        if let Some((clip_id, clip_rect)) = &scope.clip {
            obj.clip = Some(ClipRegion::Object {
                id: clip_id.clone(),
            });
            extent = extent.intersect(*clip_rect);
        }
        if extent.width() > 0.0 || extent.height() > 0.0 {
            self.bounds = Some(match self.bounds {
                Some(b) => b.union(extent),
                None => extent,
            });
        }
        self.objects.push(ImportedObject {
            object: obj,
            ancestors: scope.ancestors.clone(),
        });
    }

    /// Source id when unused, otherwise a fresh id derived from it or the nearest group.
    fn claim_id(&mut self, source: &str, ancestors: &[String]) -> String {
        if !source.is_empty() && self.ids.insert(source.to_string()) {
            return source.to_string();
        }
        let base = if source.is_empty() {
            ancestors.last().map_or("shape", String::as_str)
        } else {
            source
        };
        loop {
            self.anonymous += 1;
            let candidate = format!("{base}-{}", self.anonymous);
            if self.ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn clip_outline(group: &usvg::Group, xf: Affine, out: &mut BezPath) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => clip_outline(g, xf * affine(g.transform()), out),
            usvg::Node::Path(p) => {
                out.extend(bez_path(p.data(), xf).elements().iter().copied());
            }
            usvg::Node::Text(_) | usvg::Node::Image(_) => {
                tracing::debug!("non-path clip content ignored");
            }
        }
    }
}

/// Path object whose outline is stored relative to its bounding-box origin.
fn placed_path(id: String, mut outline: BezPath) -> SceneObject {
    let bbox = outline.bounding_box();
    outline.apply_affine(Affine::translate((-bbox.x0, -bbox.y0)));
    SceneObject::new(id, ObjectKind::Path { path: outline }).at(bbox.x0, bbox.y0)
}

fn bez_path(data: &usvg::tiny_skia_path::Path, xf: Affine) -> BezPath {
    let pt = |p: usvg::tiny_skia_path::Point| xf * Point::new(f64::from(p.x), f64::from(p.y));
    let mut out = BezPath::new();
    for seg in data.segments() {
        match seg {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(c, p) => out.quad_to(pt(c), pt(p)),
            PathSegment::CubicTo(c1, c2, p) => out.curve_to(pt(c1), pt(c2), pt(p)),
            PathSegment::Close => out.close_path(),
        }
    }
    out
}

fn affine(t: Transform) -> Affine {
    Affine::new([
        f64::from(t.sx),
        f64::from(t.ky),
        f64::from(t.kx),
        f64::from(t.sy),
        f64::from(t.tx),
        f64::from(t.ty),
    ])
}

fn rect(r: usvg::Rect) -> Rect {
    Rect::new(
        f64::from(r.left()),
        f64::from(r.top()),
        f64::from(r.right()),
        f64::from(r.bottom()),
    )
}

fn uniform_scale(xf: Affine) -> f64 {
    xf.determinant().abs().sqrt()
}

fn color(paint: &usvg::Paint, opacity: f32) -> Option<Rgba8> {
    let c = match paint {
        usvg::Paint::Color(c) => *c,
        usvg::Paint::LinearGradient(g) => g.stops().first()?.color(),
        usvg::Paint::RadialGradient(g) => g.stops().first()?.color(),
        usvg::Paint::Pattern(_) => return None,
    };
    Some(Rgba8 {
        r: c.red,
        g: c.green,
        b: c.blue,
        a: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/import.rs"]
mod tests;
