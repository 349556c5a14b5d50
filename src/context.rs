//! Execution context for distributed runs.
//!
//! When the same scenario runs on many workers in parallel, identifiers such
//! as test names are prefixed with the worker's region, global client index
//! and iteration so results from different workers never collide.

use crate::config::ReporterConfig;

/// Naming context of the current worker process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Region the worker runs in.
    pub region_name: Option<String>,
    /// Worker index across all regions.
    pub global_client_index: Option<String>,
    /// Iteration of the scenario on this worker.
    pub iteration: Option<String>,
}

impl ExecutionContext {
    /// Derives the context from configuration. Never fails.
    #[must_use]
    pub fn resolve(config: &ReporterConfig) -> Self {
        Self {
            region_name: config.region_name.clone(),
            global_client_index: config.global_client_index.clone(),
            iteration: config.iteration.clone(),
        }
    }

    /// Returns `true` when no region is known (standalone run).
    #[must_use]
    pub const fn is_standalone(&self) -> bool {
        self.region_name.is_none()
    }

    /// Prefixes `base` with `region-clientIndex-iteration-`.
    ///
    /// Without a region the name is returned unchanged. With a region,
    /// absent client index or iteration segments are left out rather than
    /// rendered as placeholders, so `{region: "eu"}` turns `login` into
    /// `eu-login`.
    #[must_use]
    pub fn namespaced_name(&self, base: &str) -> String {
        let Some(region) = self.region_name.as_deref() else {
            return base.to_owned();
        };

        [
            Some(region),
            self.global_client_index.as_deref(),
            self.iteration.as_deref(),
            Some(base),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("-")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn full() -> ExecutionContext {
        ExecutionContext {
            region_name: Some("us-east".to_owned()),
            global_client_index: Some("2".to_owned()),
            iteration: Some("5".to_owned()),
        }
    }

    #[test]
    fn full_context_prefixes_all_segments() {
        assert_eq!(full().namespaced_name("checkout"), "us-east-2-5-checkout");
    }

    #[test]
    fn empty_context_keeps_name() {
        let ctx = ExecutionContext::default();
        assert!(ctx.is_standalone());
        assert_eq!(ctx.namespaced_name("checkout"), "checkout");
    }

    #[test]
    fn missing_segments_are_omitted() {
        let ctx = ExecutionContext {
            iteration: None,
            ..full()
        };
        assert_eq!(ctx.namespaced_name("checkout"), "us-east-2-checkout");

        let ctx = ExecutionContext {
            region_name: Some("eu".to_owned()),
            ..ExecutionContext::default()
        };
        assert_eq!(ctx.namespaced_name("login"), "eu-login");
    }

    #[test]
    fn index_without_region_is_ignored() {
        let ctx = ExecutionContext {
            region_name: None,
            ..full()
        };
        assert_eq!(ctx.namespaced_name("checkout"), "checkout");
    }

    #[test]
    fn resolve_copies_config_values() {
        let config = ReporterConfig {
            region_name: Some("us-east".to_owned()),
            global_client_index: Some("2".to_owned()),
            iteration: Some("5".to_owned()),
            ..ReporterConfig::default()
        };
        assert_eq!(ExecutionContext::resolve(&config), full());
    }

    proptest! {
        #[test]
        fn namespaced_name_ends_with_base(base in "[a-zA-Z0-9 _.]{0,32}") {
            let name = full().namespaced_name(&base);
            prop_assert!(name.ends_with(&base));
            prop_assert_eq!(name, format!("us-east-2-5-{base}"));
        }

        #[test]
        fn namespacing_is_deterministic(base in ".{0,32}") {
            let ctx = full();
            prop_assert_eq!(ctx.namespaced_name(&base), ctx.namespaced_name(&base));
            prop_assert_eq!(ExecutionContext::default().namespaced_name(&base), base);
        }
    }
}
