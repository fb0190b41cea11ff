use regex::Regex;
use std::sync::LazyLock;

static JOB_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"JobID=(\d+)").expect("job ID pattern is valid"));

/// Extracts the numeric job ID from a detail-page URL
///
/// Returns `None` when the URL carries no `JobID=<digits>` token; such links
/// are not job listings and are dropped.
///
/// # Examples
///
/// ```
/// use job_sieve::url::extract_job_id;
///
/// assert_eq!(
///     extract_job_id("https://seeker.worksourcewa.com/jobdetail.aspx?JobID=123456"),
///     Some("123456".to_string())
/// );
/// assert_eq!(extract_job_id("https://seeker.worksourcewa.com/about"), None);
/// ```
pub fn extract_job_id(url: &str) -> Option<String> {
    JOB_ID_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
