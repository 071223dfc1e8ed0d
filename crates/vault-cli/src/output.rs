//! Plain-text rendering of API results.

use std::fmt::Write;

use tracing::warn;

use vault_core::models::{FileListResponse, StatsResponse, UploadResult};
use vault_core::utils::{format_bytes, format_date, format_percentage, truncate_string};

/// Widest filename shown before truncation
const FILENAME_COLUMN_WIDTH: usize = 40;

pub fn file_table(listing: &FileListResponse) -> String {
    let mut out = String::new();
    if listing.files.is_empty() {
        out.push_str("No files found.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>6}  {:<width$}  {:>9}  {:<8}  {:<12}  {}",
        "ID",
        "NAME",
        "SIZE",
        "TYPE",
        "UPLOADED",
        "VISIBILITY",
        width = FILENAME_COLUMN_WIDTH
    );
    for file in &listing.files {
        let _ = writeln!(
            out,
            "{:>6}  {:<width$}  {:>9}  {:<8}  {:<12}  {}",
            file.id,
            truncate_string(&file.filename, FILENAME_COLUMN_WIDTH),
            format_bytes(file.size_bytes),
            file.category().label(),
            format_date(&file.created_at),
            file.visibility_display(),
            width = FILENAME_COLUMN_WIDTH
        );
    }

    let p = &listing.pagination;
    if !p.is_consistent() {
        warn!(
            current_page = p.current_page,
            total_pages = p.total_pages,
            total_files = p.total_files,
            "Server returned inconsistent pagination"
        );
    }
    let _ = writeln!(
        out,
        "\nPage {} of {} ({} files)",
        p.current_page, p.total_pages, p.total_files
    );
    if p.has_previous_page() {
        let _ = writeln!(out, "Previous: --page {}", p.current_page - 1);
    }
    if p.has_next_page() {
        let _ = writeln!(out, "Next: --page {}", p.current_page + 1);
    }
    out
}

pub fn stats_report(stats: &StatsResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Storage used:   {} of {} ({} of quota)",
        format_bytes(stats.total_storage_used_bytes),
        format_bytes(stats.quota_bytes()),
        format_percentage(stats.quota_used_percentage)
    );
    let _ = writeln!(
        out,
        "Original size:  {}",
        format_bytes(stats.original_storage_used_bytes)
    );
    let _ = writeln!(
        out,
        "Space saved:    {} ({} via deduplication)",
        format_bytes(stats.storage_savings_bytes),
        format_percentage(stats.storage_savings_percentage)
    );
    let _ = writeln!(
        out,
        "Deduplication:  {}",
        if stats.dedup_active() { "Active" } else { "Standard" }
    );
    out
}

pub fn upload_report(results: &[UploadResult]) -> String {
    let mut out = String::new();
    for result in results {
        let status = if result.deduplicated { "duplicate" } else { "new" };
        let _ = writeln!(
            out,
            "{:<9}  {}  {}  {}",
            status,
            result.filename,
            format_bytes(result.size),
            result.hash
        );
    }
    out
}
