use crate::UrlError;
use url::Url;

/// Path of the search results page, relative to the site root
const SEARCH_PATH: &str = "jobsearch/powersearch.aspx";

/// Builds the URL of one search results page
///
/// The query is trimmed and form-encoded (spaces become `+`). The remaining
/// parameters pin the site to 25 results per page, the list view and the
/// newest-first ordering.
///
/// # Examples
///
/// ```
/// use job_sieve::url::build_search_url;
///
/// let url = build_search_url("https://seeker.worksourcewa.com/", " software developer ", 2).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://seeker.worksourcewa.com/jobsearch/powersearch.aspx?q=software+developer&rad_units=miles&pp=25&nosal=true&vw=b&setype=2&pg=2&re=3"
/// );
/// ```
pub fn build_search_url(base_url: &str, query: &str, page: u32) -> Result<Url, UrlError> {
    let base = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(UrlError::InvalidScheme(base.scheme().to_string()));
    }

    let mut url = base
        .join(SEARCH_PATH)
        .map_err(|e| UrlError::Malformed(format!("Failed to join search path: {}", e)))?;

    url.query_pairs_mut()
        .clear()
        .append_pair("q", query.trim())
        .append_pair("rad_units", "miles")
        .append_pair("pp", "25")
        .append_pair("nosal", "true")
        .append_pair("vw", "b")
        .append_pair("setype", "2")
        .append_pair("pg", &page.to_string())
        .append_pair("re", "3");

    Ok(url)
}
