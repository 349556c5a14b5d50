//! Process configuration for the reporter.
//!
//! All values are read once at startup and threaded explicitly into the
//! sink and context constructors. Every field is optional: an absent value
//! changes behavior (console output, no name prefix) and never fails.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Environment variable holding the result stream path.
pub const RESULT_FILE_VAR: &str = "TESTABLE_RESULT_FILE";
/// Environment variable holding the region the worker runs in.
pub const REGION_NAME_VAR: &str = "TESTABLE_REGION_NAME";
/// Environment variable holding the worker index across all regions.
pub const GLOBAL_CLIENT_INDEX_VAR: &str = "TESTABLE_GLOBAL_CLIENT_INDEX";
/// Environment variable holding the current iteration number.
pub const ITERATION_VAR: &str = "TESTABLE_ITERATION";
/// Environment variable holding the proxy autoconfiguration URL.
pub const PROXY_AUTOCONFIG_URL_VAR: &str = "PROXY_AUTOCONFIG_URL";
/// Environment variable holding the directory for test artifacts.
pub const OUTPUT_DIR_VAR: &str = "OUTPUT_DIR";
/// Environment variable listing extra directories searched for data files.
pub const RESOURCE_PATH_VAR: &str = "TESTABLE_RESOURCE_PATH";

/// Reporter configuration, populated once per process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Result stream path. `None` selects console mode.
    pub result_file: Option<PathBuf>,

    /// Region name of the distributed worker.
    pub region_name: Option<String>,

    /// Worker index across the whole distributed run.
    pub global_client_index: Option<String>,

    /// Iteration number of the current scenario execution.
    pub iteration: Option<String>,

    /// Proxy autoconfiguration URL handed to browser drivers.
    pub proxy_autoconfig_url: Option<String>,

    /// Directory where the platform collects test artifacts.
    pub output_dir: Option<PathBuf>,

    /// Directories searched, after the working directory, for data files.
    pub resource_dirs: Vec<PathBuf>,
}

impl ReporterConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as absent. Paths are kept as raw OS
    /// strings; text values that are not valid Unicode are converted
    /// lossily.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let get = |name: &str| non_blank(lookup(name));
        let text = |name: &str| get(name).map(|v| v.to_string_lossy().into_owned());

        Self {
            result_file: get(RESULT_FILE_VAR).map(PathBuf::from),
            region_name: text(REGION_NAME_VAR),
            global_client_index: text(GLOBAL_CLIENT_INDEX_VAR),
            iteration: text(ITERATION_VAR),
            proxy_autoconfig_url: text(PROXY_AUTOCONFIG_URL_VAR),
            output_dir: get(OUTPUT_DIR_VAR).map(PathBuf::from),
            resource_dirs: split_resource_path(get(RESOURCE_PATH_VAR)),
        }
    }

    /// Returns `true` when the process runs under the hosted platform.
    #[must_use]
    pub const fn is_distributed(&self) -> bool {
        self.region_name.is_some()
    }
}

/// Drops a value that is empty or only whitespace.
///
/// Shared by the environment reader and the CLI so both treat a blank
/// variable as unset.
#[must_use]
pub fn non_blank<T: AsRef<OsStr>>(value: Option<T>) -> Option<T> {
    value.filter(|v| !v.as_ref().to_string_lossy().trim().is_empty())
}

/// Splits a platform path list into its non-blank entries.
#[must_use]
pub fn split_resource_path(value: Option<OsString>) -> Vec<PathBuf> {
    value
        .map(|v| {
            std::env::split_paths(&v)
                .filter(|p| !p.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), OsString::from(*v)))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_default() {
        let config = ReporterConfig::from_lookup(|_| None);
        assert_eq!(config, ReporterConfig::default());
        assert!(!config.is_distributed());
    }

    #[test]
    fn reads_all_variables() {
        let config = ReporterConfig::from_lookup(lookup(&[
            (RESULT_FILE_VAR, "/tmp/results.jsonl"),
            (REGION_NAME_VAR, "us-east"),
            (GLOBAL_CLIENT_INDEX_VAR, "2"),
            (ITERATION_VAR, "5"),
            (PROXY_AUTOCONFIG_URL_VAR, "http://proxy/pac"),
            (OUTPUT_DIR_VAR, "/tmp/out"),
        ]));

        assert_eq!(config.result_file, Some(PathBuf::from("/tmp/results.jsonl")));
        assert_eq!(config.region_name.as_deref(), Some("us-east"));
        assert_eq!(config.global_client_index.as_deref(), Some("2"));
        assert_eq!(config.iteration.as_deref(), Some("5"));
        assert_eq!(config.proxy_autoconfig_url.as_deref(), Some("http://proxy/pac"));
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/out")));
        assert!(config.is_distributed());
    }

    #[test]
    fn blank_values_are_absent() {
        let config = ReporterConfig::from_lookup(lookup(&[
            (RESULT_FILE_VAR, ""),
            (REGION_NAME_VAR, "   "),
        ]));
        assert!(config.result_file.is_none());
        assert!(config.region_name.is_none());
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(Some(" \t")), None);
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(Some(PathBuf::from(" "))), None);
        assert_eq!(non_blank(Some("3")), Some("3"));
        assert_eq!(non_blank::<&str>(None), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_result_path_is_kept() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"/tmp/r\xe9sultats.jsonl".to_vec());
        let expected = PathBuf::from(raw.clone());
        let config = ReporterConfig::from_lookup(move |name| {
            (name == RESULT_FILE_VAR).then(|| raw.clone())
        });
        assert_eq!(config.result_file, Some(expected));
    }

    #[test]
    fn resource_path_is_split() {
        let joined = std::env::join_paths(["/data/a", "/data/b"]).unwrap();
        let joined = joined.to_string_lossy().into_owned();
        let config = ReporterConfig::from_lookup(lookup(&[(RESOURCE_PATH_VAR, joined.as_str())]));
        assert_eq!(
            config.resource_dirs,
            vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")]
        );
    }
}
