use std::fmt::Write as _;

use crate::foundation::core::{Affine, Rgba8};
use crate::scene::object::{ClipRegion, ExtensionType, GuideAxis, ObjectKind, Paint, SceneObject};
use crate::scene::store::Scene;
use crate::workspace::settings::WorkspaceOptions;

/// Controls what [`scene_to_svg`] emits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgExportOpts {
    /// Emit guidelines and print guides.
    pub include_transient: bool,
    /// Emit hidden objects.
    pub include_hidden: bool,
}

/// Serialize the scene as a standalone SVG document sized to the workspace.
pub fn scene_to_svg(scene: &Scene, workspace: &WorkspaceOptions, opts: SvgExportOpts) -> String {
    let mut defs = String::new();
    let mut body = String::new();
    let mut clip_ids = Vec::<String>::new();

    for (_, obj) in scene.iter() {
        if !opts.include_hidden && !obj.flags.visible {
            continue;
        }
        if !opts.include_transient
            && matches!(
                obj.extension,
                ExtensionType::Guideline | ExtensionType::PrintGuide
            )
        {
            continue;
        }

        let clip_ref = obj.clip.as_ref().and_then(|clip| match clip {
            ClipRegion::Workspace => Some(ensure_clip(
                &mut defs,
                &mut clip_ids,
                "clip-workspace",
                &format!(
                    "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\"/>",
                    num(workspace.width),
                    num(workspace.height)
                ),
            )),
            ClipRegion::Object { id } => {
                let outline = scene.get_by_id(id).and_then(SceneObject::scene_outline)?;
                Some(ensure_clip(
                    &mut defs,
                    &mut clip_ids,
                    &format!("clip-{}", sanitize_id(id)),
                    &format!("<path d=\"{}\"/>", outline.to_svg()),
                ))
            }
        });

        match clip_ref {
            Some(clip) => {
                let _ = write!(body, "<g clip-path=\"url(#{clip})\">");
                write_object(&mut body, obj);
                body.push_str("</g>");
            }
            None => write_object(&mut body, obj),
        }
    }

    let mut out = String::with_capacity(defs.len() + body.len() + 256);
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = num(workspace.width),
        h = num(workspace.height)
    );
    if !defs.is_empty() {
        let _ = write!(out, "<defs>{defs}</defs>");
    }
    out.push_str(&body);
    out.push_str("</svg>");
    out
}

fn ensure_clip(defs: &mut String, seen: &mut Vec<String>, id: &str, shape: &str) -> String {
    if !seen.iter().any(|s| s == id) {
        let _ = write!(
            defs,
            "<clipPath id=\"{id}\" clipPathUnits=\"userSpaceOnUse\">{shape}</clipPath>"
        );
        seen.push(id.to_string());
    }
    id.to_string()
}

fn write_object(out: &mut String, obj: &SceneObject) {
    let transform = matrix(obj.affine());
    let paint = paint_attrs(&obj.paint);
    let id = escape(&obj.id);
    match &obj.kind {
        ObjectKind::Rect { width, height, rx } => {
            let _ = write!(
                out,
                "<rect id=\"{id}\" width=\"{}\" height=\"{}\" rx=\"{}\" transform=\"{transform}\"{paint}/>",
                num(*width),
                num(*height),
                num(*rx)
            );
        }
        ObjectKind::Path { path } => {
            let _ = write!(
                out,
                "<path id=\"{id}\" d=\"{}\" transform=\"{transform}\"{paint}/>",
                path.to_svg()
            );
        }
        ObjectKind::Text {
            text,
            font_family,
            font_size,
            ..
        } => {
            let _ = write!(
                out,
                "<text id=\"{id}\" x=\"0\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" transform=\"{transform}\"{paint}>{}</text>",
                num(*font_size),
                escape(font_family),
                num(*font_size),
                escape(text)
            );
        }
        ObjectKind::Image { src, width, height } => match src {
            Some(src) => {
                let _ = write!(
                    out,
                    "<image id=\"{id}\" width=\"{}\" height=\"{}\" xlink:href=\"{}\" transform=\"{transform}\" opacity=\"{}\"/>",
                    num(*width),
                    num(*height),
                    escape(src),
                    num(obj.paint.opacity)
                );
            }
            None => {
                let _ = write!(
                    out,
                    "<rect id=\"{id}\" width=\"{}\" height=\"{}\" transform=\"{transform}\" fill=\"#d9d9d9\"/>",
                    num(*width),
                    num(*height)
                );
            }
        },
        ObjectKind::Line { axis, length } => {
            let (x2, y2) = match axis {
                GuideAxis::Horizontal => (*length, 0.0),
                GuideAxis::Vertical => (0.0, *length),
            };
            let _ = write!(
                out,
                "<line id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"{}\" y2=\"{}\" transform=\"{transform}\"{paint}/>",
                num(x2),
                num(y2)
            );
        }
        ObjectKind::Group { children } => {
            let _ = write!(out, "<g id=\"{id}\" transform=\"{transform}\"{paint}>");
            for child in children.iter().filter(|c| c.flags.visible) {
                write_object(out, child);
            }
            out.push_str("</g>");
        }
    }
}

fn paint_attrs(p: &Paint) -> String {
    let mut s = String::new();
    match p.fill {
        Some(c) => write_color(&mut s, "fill", c),
        None => s.push_str(" fill=\"none\""),
    }
    if let Some(c) = p.stroke {
        write_color(&mut s, "stroke", c);
        let _ = write!(s, " stroke-width=\"{}\"", num(p.stroke_width));
        if !p.stroke_dash.is_empty() {
            let dash: Vec<String> = p.stroke_dash.iter().map(|d| num(*d)).collect();
            let _ = write!(s, " stroke-dasharray=\"{}\"", dash.join(" "));
        }
    }
    if p.opacity < 1.0 {
        let _ = write!(s, " opacity=\"{}\"", num(p.opacity));
    }
    s
}

fn write_color(s: &mut String, attr: &str, c: Rgba8) {
    let _ = write!(s, " {attr}=\"{}\"", c.to_hex_rgb());
    if c.a < 255 {
        let _ = write!(s, " {attr}-opacity=\"{}\"", num(c.opacity()));
    }
}

fn matrix(a: Affine) -> String {
    let [a, b, c, d, e, f] = a.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        num(a),
        num(b),
        num(c),
        num(d),
        num(e),
        num(f)
    )
}

fn num(v: f64) -> String {
    let r = (v * 10_000.0).round() / 10_000.0;
    if r == 0.0 { "0".to_string() } else { r.to_string() }
}

fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg_export.rs"]
mod tests;
