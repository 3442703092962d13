use std::sync::Arc;

use rune_config::LinesConfig;

use crate::font::cache::MetricsCache;
use crate::font::{Font, FontMetrics};

/// Shared environment for lines: the default font, the policy
/// configuration and the font metrics cache.
#[derive(Debug)]
pub struct Context {
    font: Arc<dyn Font>,
    config: LinesConfig,
    metrics: MetricsCache,
}

impl Context {
    /// Create a context with default configuration.
    pub fn new(font: Arc<dyn Font>) -> Self {
        Self::with_config(font, LinesConfig::default())
    }

    pub fn with_config(font: Arc<dyn Font>, config: LinesConfig) -> Self {
        Self {
            font,
            config,
            metrics: MetricsCache::new(),
        }
    }

    /// Create a context whose configuration is read from `rune-lines.toml`
    /// and `RUNE_LINES_*` environment variables.
    pub fn from_env(font: Arc<dyn Font>) -> Self {
        Self::with_config(font, LinesConfig::load())
    }

    /// Font used where no run or attribute names one.
    pub fn font(&self) -> &Arc<dyn Font> {
        &self.font
    }

    pub fn config(&self) -> &LinesConfig {
        &self.config
    }

    /// Metrics of `font`, served from the cache.
    pub fn metrics(&self, font: &dyn Font) -> FontMetrics {
        self.metrics.get_or_load(font)
    }

    pub fn metrics_cache(&self) -> &MetricsCache {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fixed::FixedFont;
    use crate::font::FontId;

    #[test]
    fn test_metrics_are_cached() {
        let font: Arc<dyn Font> = Arc::new(FixedFont::new(FontId(4)));
        let ctx = Context::new(font.clone());
        assert!(ctx.metrics_cache().is_empty());
        let m = ctx.metrics(font.as_ref());
        assert_eq!(m, font.metrics());
        assert_eq!(ctx.metrics_cache().len(), 1);
        assert_eq!(ctx.font().id(), FontId(4));
    }
}
