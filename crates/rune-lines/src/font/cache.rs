use hashbrown::HashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::font::{Font, FontId, FontMetrics};

/// Memoized font metrics keyed by font identity.
///
/// Owned by a [`crate::Context`]; entries live until [`MetricsCache::clear`].
#[derive(Debug, Default)]
pub struct MetricsCache {
    entries: Mutex<HashMap<FontId, FontMetrics>>,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get the metrics of `font`, querying the font on a miss.
    pub fn get_or_load(&self, font: &dyn Font) -> FontMetrics {
        let id = font.id();
        let mut entries = self.entries.lock();
        if let Some(metrics) = entries.get(&id) {
            return *metrics;
        }
        let metrics = font.metrics();
        debug!(font = id.0, "metrics cache miss");
        entries.insert(id, metrics);
        metrics
    }

    pub fn get(&self, id: FontId) -> Option<FontMetrics> {
        self.entries.lock().get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fixed::FixedFont;

    #[test]
    fn test_cache_hit_and_clear() {
        let cache = MetricsCache::new();
        let font = FixedFont::new(FontId(7));
        assert!(cache.is_empty());

        let first = cache.get_or_load(&font);
        let second = cache.get_or_load(&font);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(FontId(7)), Some(first));

        cache.clear();
        assert!(cache.get(FontId(7)).is_none());
    }
}
