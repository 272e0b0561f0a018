use crate::foundation::core::Unit;
use crate::ruler::viewport::Viewport;
use crate::scene::object::GuideAxis;

/// Zoom levels indexing the gap tables.
const ZOOMS: [f64; 9] = [0.02, 0.03, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0];
/// Pixel-mode label gaps, in pixels.
const PX_GAPS: [f64; 9] = [5000.0, 2500.0, 1000.0, 500.0, 200.0, 100.0, 50.0, 20.0, 10.0];
/// Millimeter gaps at 300 DPI and above.
const MM_GAPS_HIGH: [f64; 9] = [500.0, 200.0, 100.0, 50.0, 20.0, 10.0, 5.0, 2.0, 1.0];
/// Millimeter gaps from 150 DPI.
const MM_GAPS_MEDIUM: [f64; 9] = [1000.0, 500.0, 200.0, 100.0, 50.0, 20.0, 10.0, 5.0, 2.0];
/// Millimeter gaps below 150 DPI.
const MM_GAPS_LOW: [f64; 9] = [2000.0, 1000.0, 500.0, 200.0, 100.0, 50.0, 20.0, 10.0, 5.0];

const MINOR_DIVISIONS: f64 = 5.0;
const MAX_TICKS: usize = 4096;

/// One tick mark on a ruler strip.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Offset along the strip in screen pixels.
    pub screen: f64,
    /// Coordinate in the display unit.
    pub value: f64,
    /// Labeled tick.
    pub major: bool,
    /// Caption for major ticks.
    pub label: Option<String>,
}

/// Labeled tick spacing, in `unit`, for the given zoom and DPI.
///
/// The table entry for the largest listed zoom not exceeding `zoom` wins; zooms below the
/// table fall back to the coarsest gap.
pub fn tick_gap(zoom: f64, unit: Unit, dpi: f64) -> f64 {
    let table = match unit {
        Unit::Px => &PX_GAPS,
        Unit::Mm if dpi >= 300.0 => &MM_GAPS_HIGH,
        Unit::Mm if dpi >= 150.0 => &MM_GAPS_MEDIUM,
        Unit::Mm => &MM_GAPS_LOW,
    };
    ZOOMS
        .iter()
        .rposition(|z| zoom >= *z)
        .map_or(table[0], |i| table[i])
}

/// Ticks for the ruler strip running along `axis` (horizontal strip for `Horizontal`).
pub fn ruler_ticks(axis: GuideAxis, viewport: &Viewport, unit: Unit, dpi: f64) -> Vec<Tick> {
    let (len, pan) = match axis {
        GuideAxis::Horizontal => (viewport.canvas_width, viewport.pan.x),
        GuideAxis::Vertical => (viewport.canvas_height, viewport.pan.y),
    };
    let zoom = viewport.zoom;
    if !(zoom.is_finite() && zoom > 0.0 && len > 0.0) {
        return Vec::new();
    }

    let major = tick_gap(zoom, unit, dpi);
    let minor = major / MINOR_DIVISIONS;
    let start = unit.from_px(-pan / zoom, dpi);
    let end = unit.from_px((len - pan) / zoom, dpi);

    let first = (start / minor).floor() as i64;
    let last = (end / minor).ceil() as i64;
    let mut ticks = Vec::new();
    for n in first..=last {
        if ticks.len() >= MAX_TICKS {
            break;
        }
        let value = n as f64 * minor;
        let screen = unit.to_px(value, dpi) * zoom + pan;
        if screen < 0.0 || screen > len {
            continue;
        }
        let is_major = n.rem_euclid(MINOR_DIVISIONS as i64) == 0;
        ticks.push(Tick {
            screen,
            value,
            major: is_major,
            label: is_major.then(|| format_label(value)),
        });
    }
    ticks
}

fn format_label(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ruler/ticks.rs"]
mod tests;
