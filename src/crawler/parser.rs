//! HTML parsing for results pages and job detail pages
//!
//! This module handles:
//! - Pulling job detail links off a search results page
//! - Extracting listing fields from a detail page, across both page layouts
//!   the job board serves

use crate::model::{
    Job, NO_DESCRIPTION, SALARY_NOT_SPECIFIED, UNKNOWN_COMPANY, UNKNOWN_DATE, UNKNOWN_LOCATION,
    UNKNOWN_TITLE,
};
use crate::url::extract_job_id;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Selector for job title anchors on a results page
const RESULT_LINK_SELECTOR: &str = "h2.with-badge a";

const TITLE_SELECTORS: &[&str] = &["h1.margin-bottom", "h1.job-view-header"];
const COMPANY_SELECTORS: &[&str] = &["h4 .capital-letter", "span.job-view-employer"];
const LOCATION_SELECTORS: &[&str] = &["h4 small.wrappable", "span.job-view-location"];
const DESCRIPTION_SELECTORS: &[&str] = &[
    "span#TrackingJobBody",
    "div.JobViewJobBody",
    "div.job-view-description",
    "div.directJobBody",
    "#jobViewFrame",
];

static POSTED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Posted:\s*(.+?)\s*-").expect("posted pattern is valid"));

static EXPIRES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Expires:\s*<strong>(.*?)</strong>").expect("expires pattern is valid")
});

/// A job detail link found on a results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLink {
    pub job_id: String,
    /// Absolute detail page URL
    pub url: String,
}

/// Extracts job detail links from a results page
///
/// Only anchors whose resolved URL stays on the results page's host and carries
/// a `JobID` are returned. Links are
/// kept in document order and duplicates are NOT removed; deduplication is the
/// caller's job.
///
/// # Example
///
/// ```
/// use job_sieve::crawler::extract_job_links;
/// use url::Url;
///
/// let html = r#"<h2 class="with-badge"><a href="/jobdetail.aspx?JobID=42">Dev</a></h2>"#;
/// let base = Url::parse("https://seeker.worksourcewa.com/jobsearch/powersearch.aspx").unwrap();
/// let links = extract_job_links(html, &base);
///
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].job_id, "42");
/// assert_eq!(links[0].url, "https://seeker.worksourcewa.com/jobdetail.aspx?JobID=42");
/// ```
pub fn extract_job_links(html: &str, base_url: &Url) -> Vec<JobLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse(RESULT_LINK_SELECTOR) {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(url) = resolve_link(href, base_url) else {
                continue;
            };
            if let Some(job_id) = extract_job_id(&url) {
                links.push(JobLink { job_id, url });
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None for empty hrefs, fragment-only links, non-navigational
/// schemes, anything that does not resolve to HTTP(S) and links to another host.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("tel:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.host_str() != base_url.host_str() {
        return None;
    }

    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}

/// Builds a [`Job`] from a detail page
///
/// Every text field tries the current page layout first and the legacy layout
/// second. Fields that are still empty get their fallback literal, so the
/// returned job always has a non-empty title, company, location, posted date,
/// salary and description. Enrichment fields are left unset.
pub fn parse_job_detail(html: &str, job_id: &str, url: &str) -> Job {
    let document = Html::parse_document(html);

    let title = first_text(&document, TITLE_SELECTORS);
    let company = first_text(&document, COMPANY_SELECTORS);
    let location = first_text(&document, LOCATION_SELECTORS);
    let posted_date = extract_posted_date(&document);
    let salary = extract_salary(&document);
    let description = first_text(&document, DESCRIPTION_SELECTORS);

    let expires_date = EXPIRES_PATTERN
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    Job {
        job_id: job_id.to_string(),
        title: or_fallback(title, UNKNOWN_TITLE),
        company: or_fallback(company, UNKNOWN_COMPANY),
        location: or_fallback(location, UNKNOWN_LOCATION),
        modality: None,
        posted_date: or_fallback(posted_date, UNKNOWN_DATE),
        expires_date,
        salary: or_fallback(salary, SALARY_NOT_SPECIFIED),
        url: url.to_string(),
        min_years_experience: None,
        min_degree: None,
        domain: None,
        description: or_fallback(description, NO_DESCRIPTION),
        parsed_description: None,
        languages: Vec::new(),
        technologies: Vec::new(),
        is_software_engineer_related: false,
    }
}

/// Reads the posting date, normalized to `YYYY-MM-DD` where it parses
///
/// The current layout embeds the date in a paragraph such as
/// `Posted: 3/7/2024 - Expires: ...`. The legacy layout has a dedicated span.
fn extract_posted_date(document: &Html) -> String {
    if let Ok(selector) = Selector::parse("p") {
        let posted = document
            .select(&selector)
            .map(element_text)
            .find(|text| text.contains("Posted:"));

        if let Some(text) = posted {
            if let Some(raw) = POSTED_PATTERN.captures(&text).and_then(|caps| caps.get(1)) {
                return normalize_date(raw.as_str());
            }
        }
    }

    first_text(document, &["span.job-view-posting-date"])
}

/// Converts `M/D/YYYY` to `YYYY-MM-DD`, returning the input unchanged if it
/// does not parse
fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    match NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Reads the salary, either from its own paragraph or from a `dt`/`dd` pair
/// labelled "Salary". When several pairs are labelled, the last one wins.
fn extract_salary(document: &Html) -> String {
    let salary = first_text(document, &["p.job-view-salary"]);
    if !salary.is_empty() {
        return salary;
    }

    let (Ok(span_selector), Ok(dt_selector), Ok(dd_selector)) = (
        Selector::parse("dl span"),
        Selector::parse("dt"),
        Selector::parse("dd"),
    ) else {
        return String::new();
    };

    let mut salary = String::new();
    for span in document.select(&span_selector) {
        let label: String = span.select(&dt_selector).map(element_text).collect();
        if label.contains("Salary") {
            let value: String = span.select(&dd_selector).map(element_text).collect();
            if !value.is_empty() {
                salary = value;
            }
        }
    }

    salary
}

/// Returns the trimmed text of the first selector that yields any
fn first_text(document: &Html, selectors: &[&str]) -> String {
    for css in selectors {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        let text: String = document.select(&selector).map(element_text).collect();
        let text = text.trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }
    String::new()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
