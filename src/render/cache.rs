use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::scene::arena::ObjectKey;

/// Cache budget configuration.
#[derive(Debug, Clone, Copy)]
pub struct CacheOpts {
    /// Total bytes allowed across all per-object rasters.
    pub ceiling_bytes: u64,
    /// Minimum time between two sweeps driven by `Editor::tick`.
    pub sweep_interval: Duration,
    /// Fraction of the ceiling a sweep evicts down to.
    pub target_ratio: f64,
}

impl Default for CacheOpts {
    fn default() -> Self {
        Self {
            ceiling_bytes: 256 * 1024 * 1024,
            sweep_interval: Duration::from_millis(1000),
            target_ratio: 0.8,
        }
    }
}

/// One per-object raster cache reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Creation or most recent access.
    pub last_access: Instant,
}

impl CacheEntry {
    /// Estimated RGBA footprint.
    pub fn bytes(&self) -> u64 {
        u64::from(self.width)
            .saturating_mul(u64::from(self.height))
            .saturating_mul(4)
    }
}

/// Sweep counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Sweeps that ran.
    pub sweeps: u64,
    /// Entries dropped by sweeps.
    pub evicted: u64,
}

/// Tracks per-object raster caches and evicts them under a byte ceiling.
///
/// The renderer owns the pixels; this manager only owns the bookkeeping and decides which
/// object caches should be released.
#[derive(Debug)]
pub struct CacheManager {
    opts: CacheOpts,
    entries: HashMap<ObjectKey, CacheEntry>,
    last_sweep: Option<Instant>,
    stats: CacheStats,
}

impl CacheManager {
    /// Empty manager.
    pub fn new(opts: CacheOpts) -> Self {
        Self {
            opts,
            entries: HashMap::new(),
            last_sweep: None,
            stats: CacheStats::default(),
        }
    }

    /// Configured budget.
    pub fn opts(&self) -> CacheOpts {
        self.opts
    }

    /// Register (or replace) the cache of `key`, stamping it with `now`.
    pub fn on_created(&mut self, key: ObjectKey, width: u32, height: u32, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                width,
                height,
                last_access: now,
            },
        );
    }

    /// Refresh the access stamp of `key`.
    pub fn touch(&mut self, key: ObjectKey, now: Instant) -> bool {
        match self.entries.get_mut(&key) {
            Some(e) => {
                e.last_access = now;
                true
            }
            None => false,
        }
    }

    /// Drop the cache of `key`.
    pub fn remove(&mut self, key: ObjectKey) -> bool {
        self.entries.remove(&key).is_some()
    }

    /// Keep only the caches whose key satisfies `keep`. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(ObjectKey) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| keep(*k));
        before - self.entries.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Bookkeeping for `key`.
    pub fn entry(&self, key: ObjectKey) -> Option<&CacheEntry> {
        self.entries.get(&key)
    }

    /// Number of tracked caches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of [`CacheEntry::bytes`].
    pub fn total_bytes(&self) -> u64 {
        self.entries.values().map(CacheEntry::bytes).sum()
    }

    /// `true` once `sweep_interval` elapsed since the previous sweep.
    pub fn sweep_due(&self, now: Instant) -> bool {
        self.last_sweep
            .is_none_or(|last| now.saturating_duration_since(last) >= self.opts.sweep_interval)
    }

    /// Counters since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Evict least-recently-accessed caches once the total exceeds the ceiling.
    ///
    /// Eviction continues until the total is at most `target_ratio * ceiling`. The `protected`
    /// key (the workspace) is never evicted. Returns the evicted keys, oldest first.
    #[tracing::instrument(skip(self), fields(entries = self.entries.len()))]
    pub fn sweep(&mut self, now: Instant, protected: Option<ObjectKey>) -> Vec<ObjectKey> {
        self.last_sweep = Some(now);
        self.stats.sweeps += 1;

        let mut total = self.total_bytes();
        if total <= self.opts.ceiling_bytes {
            return Vec::new();
        }
        let target = (self.opts.ceiling_bytes as f64 * self.opts.target_ratio).floor() as u64;

        let mut candidates: Vec<(Instant, ObjectKey, u64)> = self
            .entries
            .iter()
            .filter(|(k, _)| Some(**k) != protected)
            .map(|(k, e)| (e.last_access, *k, e.bytes()))
            .collect();
        candidates.sort_by_key(|(at, k, _)| (*at, k.index(), k.generation()));

        let mut evicted = Vec::new();
        for (_, key, bytes) in candidates {
            if total <= target {
                break;
            }
            self.entries.remove(&key);
            total = total.saturating_sub(bytes);
            evicted.push(key);
        }

        self.stats.evicted += evicted.len() as u64;
        tracing::debug!(
            evicted = evicted.len(),
            remaining_bytes = total,
            "render cache sweep"
        );
        evicted
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
