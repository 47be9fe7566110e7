use url::Url;

use crate::labels::{Labels, Locale};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_TICKER_PERIOD_MS: i64 = 1_000;
pub const DEFAULT_POLL_PERIOD_MS: i64 = 1_000;
pub const DEFAULT_FEEDBACK_MS: i64 = 2_000;
pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_OUT_DIR: &str = "data/naver_collected";

/// Knobs of the synchronization engine. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSettings {
    /// Root of the job API; image and log links are resolved against it.
    pub base_url: Url,
    pub per_page: u32,
    pub ticker_period_ms: i64,
    pub poll_period_ms: i64,
    /// How long copy feedback stays on a control before reverting.
    pub feedback_ms: i64,
    pub default_limit: u32,
    pub default_out_dir: String,
    pub locale: Locale,
}

impl PanelSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            per_page: DEFAULT_PER_PAGE,
            ticker_period_ms: DEFAULT_TICKER_PERIOD_MS,
            poll_period_ms: DEFAULT_POLL_PERIOD_MS,
            feedback_ms: DEFAULT_FEEDBACK_MS,
            default_limit: DEFAULT_LIMIT,
            default_out_dir: DEFAULT_OUT_DIR.to_string(),
            locale: Locale::default(),
        }
    }

    pub fn labels(&self) -> &'static Labels {
        self.locale.labels()
    }
}

/// Appends percent-encoded path segments to `base`.
///
/// A trailing empty segment of `base` is dropped first, so both `http://h/` and
/// `http://h/panel/` compose as expected.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub fn image_url(base: &Url, job_id: &str, file: &str) -> Url {
    endpoint(base, &["api", "jobs", job_id, "images", file])
}

pub fn log_url(base: &Url, job_id: &str) -> Url {
    let mut url = endpoint(base, &["static", "log.html"]);
    url.query_pairs_mut().append_pair("job_id", job_id);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_file_names_are_percent_encoded() {
        let base = Url::parse("http://panel.test/").unwrap();
        let url = image_url(&base, "7", "a b/#1.jpg");
        assert_eq!(
            url.as_str(),
            "http://panel.test/api/jobs/7/images/a%20b%2F%231.jpg"
        );
    }

    #[test]
    fn nested_base_keeps_its_prefix() {
        let base = Url::parse("http://panel.test/ops/").unwrap();
        assert_eq!(
            log_url(&base, "x1").as_str(),
            "http://panel.test/ops/static/log.html?job_id=x1"
        );
    }
}
