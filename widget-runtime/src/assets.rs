//! Asset Loading
//!
//! Injects the stylesheets and scripts declared under `settings` and calls the
//! host integration hook once every declared script has loaded.
//!
//! Script `error` events are not observed: a script that fails to load holds
//! the barrier open for the life of the page. An empty script map means the
//! hook is never called.

use std::collections::BTreeSet;

use crate::config::WidgetConfig;
use crate::surface::Surface;

/// Completion counter over the declared scripts
#[derive(Debug, Clone, Default)]
pub struct AssetLoadBarrier {
    total: usize,
    completed: usize,
    pending: BTreeSet<String>,
}

impl AssetLoadBarrier {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pending: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self {
            total: pending.len(),
            completed: 0,
            pending,
        }
    }

    /// Count a load. Returns `false` for names that are unknown or already counted.
    pub fn record(&mut self, name: &str) -> bool {
        if self.pending.remove(name) {
            self.completed += 1;
            true
        } else {
            false
        }
    }

    /// Satisfied once every declared script loaded; never for an empty set
    pub fn is_satisfied(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }
}

/// Injects declared assets and gates the host hook on the script barrier
#[derive(Debug, Default)]
pub struct AssetLoader {
    barrier: AssetLoadBarrier,
    hook_called: bool,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject every stylesheet and script of the config
    pub fn start<S: Surface>(&mut self, config: &WidgetConfig, surface: &mut S) {
        for (name, href) in &config.settings.css {
            surface.inject_stylesheet(name, href);
        }

        self.barrier = AssetLoadBarrier::new(config.settings.js.keys().cloned());
        for (name, src) in &config.settings.js {
            surface.inject_script(name, src);
        }

        if self.barrier.total() == 0 {
            tracing::debug!("No scripts declared, host init hook will not be called");
        } else {
            tracing::debug!(
                "Injected {} stylesheet(s) and {} script(s)",
                config.settings.css.len(),
                self.barrier.total()
            );
        }
    }

    /// Record a script `load` event
    pub fn script_loaded<S: Surface>(&mut self, name: &str, config: &WidgetConfig, surface: &mut S) {
        if !self.barrier.record(name) {
            tracing::debug!("Ignoring load event for script '{}'", name);
            return;
        }

        tracing::debug!(
            "Script '{}' loaded ({}/{})",
            name,
            self.barrier.completed(),
            self.barrier.total()
        );

        if self.barrier.is_satisfied() && !self.hook_called {
            self.hook_called = true;
            if surface.invoke_host_hook(config) {
                tracing::info!("Host init hook called");
            } else {
                tracing::debug!("All scripts loaded, no host init hook defined");
            }
        }
    }

    pub fn barrier(&self) -> &AssetLoadBarrier {
        &self.barrier
    }

    pub fn hook_called(&self) -> bool {
        self.hook_called
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSurface;

    fn config_with(js: &[(&str, &str)], css: &[(&str, &str)]) -> WidgetConfig {
        let mut config = WidgetConfig::default();
        for (name, url) in js {
            config.settings.js.insert(name.to_string(), url.to_string());
        }
        for (name, url) in css {
            config.settings.css.insert(name.to_string(), url.to_string());
        }
        config
    }

    #[test]
    fn test_barrier_counts_each_name_once() {
        let mut barrier = AssetLoadBarrier::new(["a", "b"]);
        assert!(barrier.record("a"));
        assert!(!barrier.record("a"));
        assert!(!barrier.record("zzz"));
        assert!(!barrier.is_satisfied());
        assert!(barrier.record("b"));
        assert!(barrier.is_satisfied());
    }

    #[test]
    fn test_empty_barrier_never_satisfied() {
        let barrier = AssetLoadBarrier::new(Vec::<String>::new());
        assert!(!barrier.is_satisfied());
    }

    #[test]
    fn test_start_injects_everything() {
        let config = config_with(
            &[("sdk", "/sdk.js"), ("chat", "/chat.js")],
            &[("theme", "/theme.css")],
        );
        let mut surface = RecordingSurface::new();
        let mut loader = AssetLoader::new();
        loader.start(&config, &mut surface);

        assert_eq!(surface.stylesheets, vec![("theme".to_string(), "/theme.css".to_string())]);
        assert_eq!(surface.scripts.len(), 2);
        assert_eq!(loader.barrier().total(), 2);
    }

    #[test]
    fn test_hook_waits_for_both_scripts_in_any_order() {
        for order in [["sdk", "chat"], ["chat", "sdk"]] {
            let config = config_with(&[("sdk", "/sdk.js"), ("chat", "/chat.js")], &[]);
            let mut surface = RecordingSurface::new();
            let mut loader = AssetLoader::new();
            loader.start(&config, &mut surface);

            loader.script_loaded(order[0], &config, &mut surface);
            assert_eq!(surface.host_hook_calls, 0);

            loader.script_loaded(order[1], &config, &mut surface);
            assert_eq!(surface.host_hook_calls, 1);

            // A replayed load must not call the hook again
            loader.script_loaded(order[1], &config, &mut surface);
            assert_eq!(surface.host_hook_calls, 1);
        }
    }

    #[test]
    fn test_failed_script_stalls_hook() {
        let config = config_with(&[("sdk", "/sdk.js"), ("broken", "/missing.js")], &[]);
        let mut surface = RecordingSurface::new();
        let mut loader = AssetLoader::new();
        loader.start(&config, &mut surface);

        loader.script_loaded("sdk", &config, &mut surface);
        assert!(!loader.hook_called());
        assert_eq!(surface.host_hook_calls, 0);
    }

    #[test]
    fn test_missing_host_hook_still_marks_called() {
        let config = config_with(&[("sdk", "/sdk.js")], &[]);
        let mut surface = RecordingSurface::new();
        surface.host_hook_present = false;
        let mut loader = AssetLoader::new();
        loader.start(&config, &mut surface);
        loader.script_loaded("sdk", &config, &mut surface);

        assert!(loader.hook_called());
        assert_eq!(surface.host_hook_calls, 0);
    }
}
