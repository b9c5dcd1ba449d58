// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr, time::Duration};

use clap::ValueEnum;

pub(crate) const DEFAULT_SEARCH_URL: &str = "https://images-api.nasa.gov/search";
/// Upper bound on catalog items considered per search, bounding secondary-lookup fan-out.
pub(crate) const DEFAULT_MAX_ITEMS: usize = 20;
pub(crate) const DEFAULT_THROTTLE: Duration = Duration::from_millis(100);
pub(crate) const DEFAULT_CONCURRENCY: usize = 8;

const ENV_PREFIX: &str = "WALLSY_";

/// How per-item resolution is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum DeliveryMode {
    /// One item at a time, throttled, each delivered once fully resolved.
    #[default]
    Sequential,
    /// Preliminary records first, then resolved records as lookups complete.
    Progressive,
}

/// What happens to items whose resolution fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum FailurePolicy {
    /// Log and drop.
    #[default]
    Skip,
    /// Log, drop, and list the item in the search report.
    Collect,
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ClientConfig {
    pub search_url: String,
    /// Catalog items resolved per search, capped at [`DEFAULT_MAX_ITEMS`].
    pub max_items: usize,
    /// Pause before each manifest lookup in sequential mode.
    pub throttle: Duration,
    /// Manifest lookups in flight in progressive mode. 0 means no cap.
    pub concurrency: usize,
    pub mode: DeliveryMode,
    pub failure_policy: FailurePolicy,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            max_items: DEFAULT_MAX_ITEMS,
            throttle: DEFAULT_THROTTLE,
            concurrency: DEFAULT_CONCURRENCY,
            mode: DeliveryMode::default(),
            failure_policy: FailurePolicy::default(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("wallsy/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Builds the configuration from `WALLSY_*` environment variables.
    ///
    /// Unparsable values are logged and replaced by their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        Self {
            search_url: var("SEARCH_URL").unwrap_or(defaults.search_url),
            max_items: parse_or(&var, "MAX_ITEMS", defaults.max_items),
            throttle: Duration::from_millis(parse_or(
                &var,
                "THROTTLE_MS",
                defaults.throttle.as_millis() as u64,
            )),
            concurrency: parse_or(&var, "CONCURRENCY", defaults.concurrency),
            mode: parse_or(&var, "MODE", defaults.mode),
            failure_policy: parse_or(&var, "FAILURE_POLICY", defaults.failure_policy),
            request_timeout: Duration::from_secs(parse_or(
                &var,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            connect_timeout: Duration::from_secs(parse_or(
                &var,
                "CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
            user_agent: var("USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }
}

fn parse_or<T, F>(var: &F, name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(val) => match val.trim().parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    "Invalid value '{}' for {}{}: {}. Using default.",
                    val,
                    ENV_PREFIX,
                    name,
                    e
                );
                default
            }
        },
        None => default,
    }
}
