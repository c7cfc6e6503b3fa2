//! Version comparison for the release update notice. Fetching the release is
//! left to the host; these helpers only interpret the response.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

pub const REPO_URL: &str = "https://github.com/rmaafs/WelcomeTale";

static VERSION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").unwrap());

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("invalid version: {0}")]
    InvalidVersion(String),
    #[error("release response is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("release response has no tag_name")]
    MissingTag,
}

/// GitHub endpoint for the latest release of this project.
pub fn latest_release_url() -> String {
    format!(
        "{}/releases/latest",
        REPO_URL.replace("github.com", "api.github.com/repos")
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FromStr for Version {
    type Err = UpdateError;

    /// Uses the first `major.minor.patch` triple in `s`, so `v1.2.3-beta`
    /// parses as `1.2.3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UpdateError::InvalidVersion(s.to_owned());
        let caps = VERSION_REGEX.captures(s).ok_or_else(invalid)?;
        let part = |i: usize| caps[i].parse::<u32>().map_err(|_| invalid());
        Ok(Version {
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Whether `latest` is a newer release than `current`. Unparsable versions
/// are never newer.
pub fn is_newer(current: &str, latest: &str) -> bool {
    match (current.parse::<Version>(), latest.parse::<Version>()) {
        (Ok(current), Ok(latest)) => latest > current,
        _ => false,
    }
}

#[derive(Deserialize)]
struct Release {
    tag_name: Option<String>,
}

/// Reads the release tag from a GitHub release response, without a leading `v`.
pub fn latest_tag(body: &str) -> Result<String, UpdateError> {
    let release: Release = serde_json::from_str(body)?;
    let tag = release.tag_name.ok_or(UpdateError::MissingTag)?;
    Ok(tag.strip_prefix('v').unwrap_or(&tag).to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    pub current: String,
    pub latest: String,
    pub using_latest: bool,
}

impl UpdateStatus {
    /// Compares `current` with the release in `body`. A response that can't be
    /// read counts as being up to date.
    pub fn evaluate(current: &str, body: &str) -> UpdateStatus {
        match latest_tag(body) {
            Ok(latest) => UpdateStatus {
                using_latest: !is_newer(current, &latest),
                current: current.to_owned(),
                latest,
            },
            Err(err) => {
                debug!("Could not read latest release: {}", err);
                UpdateStatus {
                    current: current.to_owned(),
                    latest: current.to_owned(),
                    using_latest: true,
                }
            }
        }
    }

    pub fn log_notice(&self) {
        if self.using_latest {
            return;
        }
        warn!("════════════════════ WelcomeTale ═════════════════════");
        warn!(
            "New version available! (v{}) - Current: (v{})",
            self.latest, self.current
        );
        warn!("Download it at {}/releases", REPO_URL);
        warn!("════════════════════ WelcomeTale ═════════════════════");
    }
}
