use kurbo::{Affine, Rect};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x51_7a_2e_c0_93_4d_b1_6f;

/// Order-sensitive hasher over geometry values.
///
/// Floats are hashed by bit pattern so `-0.0` and `0.0` differ; callers hash values that come
/// straight from state, never recomputed ones.
pub(crate) struct StateHasher {
    inner: Xxh3,
}

impl StateHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn write_affine(&mut self, a: Affine) {
        for c in a.as_coeffs() {
            self.write_f64(c);
        }
    }

    pub(crate) fn write_rect(&mut self, r: Rect) {
        self.write_f64(r.x0);
        self.write_f64(r.y0);
        self.write_f64(r.x1);
        self.write_f64(r.y1);
    }

    pub(crate) fn finish(self) -> u64 {
        self.inner.digest()
    }
}

/// Scale factor that fits `inner` into `outer` without distortion.
///
/// Degenerate inner sizes return `1.0` so callers never divide by zero.
pub(crate) fn uniform_fit_scale(outer_w: f64, outer_h: f64, inner_w: f64, inner_h: f64) -> f64 {
    if inner_w <= 0.0 || inner_h <= 0.0 || !inner_w.is_finite() || !inner_h.is_finite() {
        return 1.0;
    }
    (outer_w / inner_w).min(outer_h / inner_h)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
