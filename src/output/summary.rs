use crate::pipeline::RunReport;

/// Renders the end-of-run summary
///
/// Every number comes from the single snapshot stored in the report.
pub fn format_summary(report: &RunReport) -> String {
    let stats = &report.stats;
    let mut out = String::from("\nJob Processing Statistics:\n");

    out.push_str(&format!("   Total Jobs Scraped: {}\n", stats.total));
    out.push_str(&format!("   Duplicates Skipped: {}\n", stats.skipped));
    out.push_str(&format!("   Jobs Processed: {}\n", stats.processed));
    out.push_str(&format!("   Unrelated Jobs: {}\n", stats.unrelated));
    out.push_str(&format!("   Successfully Enriched: {}\n", stats.successful));
    out.push_str(&format!("   Failed to Enrich: {}\n", stats.failed));

    if let Some(rate) = stats.success_rate() {
        out.push_str(&format!("   Success Rate: {:.1}%\n", rate));
    }

    out.push_str(&format!(
        "   Execution Time: {:.2} seconds\n",
        report.execution_time.as_secs_f64()
    ));
    if let Some(per_second) = stats.jobs_per_second(report.execution_time) {
        out.push_str(&format!("   Jobs per Second: {:.2}\n", per_second));
    }

    if report.cache_enabled {
        out.push_str(&format!(
            "   Job ID Cache: {} -> {} entries ({} added)\n",
            report.cache_initial_size, report.cache_final_size, report.jobs_added_to_cache
        ));
    }

    if report.cancelled {
        out.push_str("   Run was cancelled before completion\n");
    }

    out
}

pub fn print_summary(report: &RunReport) {
    print!("{}", format_summary(report));
}
