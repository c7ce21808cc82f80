//! Output formatting utilities

use crate::application::{AttachReport, ExportReport, ExportTarget};

/// Format attach reports for display
pub fn format_attach_reports(reports: &[AttachReport]) -> String {
    if reports.is_empty() {
        return "No items processed".to_string();
    }

    let mut output = String::new();
    for report in reports {
        output.push_str(&format!(
            "{}: {} probed, {} found, {} attached, {} already attached",
            report.item_code, report.probes, report.hits, report.attached, report.already_attached
        ));
        if report.failed_inserts > 0 {
            output.push_str(&format!(", {} failed", report.failed_inserts));
        }
        output.push('\n');
        for url in &report.attached_urls {
            output.push_str(&format!("  + {}\n", url));
        }
    }
    output
}

/// Format an export summary for display
pub fn format_export_report(report: &ExportReport) -> String {
    let mut output = format!(
        "Exported {} products ({} images, {} bytes) at {}\n",
        report.products,
        report.images,
        report.bytes,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    match &report.target {
        ExportTarget::LocalFile(path) => {
            output.push_str(&format!("Wrote {}\n", path.display()));
        }
        ExportTarget::Publish => {
            if let Some(outcome) = &report.publish {
                output.push_str(&format!(
                    "Replaced {} previous snapshot(s)",
                    outcome.deleted
                ));
                if outcome.failed_deletes > 0 {
                    output.push_str(&format!(", {} could not be deleted", outcome.failed_deletes));
                }
                output.push('\n');
                if let Some(url) = &outcome.file_url {
                    output.push_str(&format!("Published {}\n", url));
                }
            }
        }
        ExportTarget::Stdout => {}
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::PublishOutcome;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn export_report(target: ExportTarget, publish: Option<PublishOutcome>) -> ExportReport {
        ExportReport {
            products: 2,
            images: 5,
            bytes: 812,
            generated_at: Utc.with_ymd_and_hms(2025, 1, 17, 8, 30, 0).unwrap(),
            target,
            publish,
            payload: "[]".to_string(),
        }
    }

    #[test]
    fn test_format_empty_attach_reports() {
        assert_eq!(format_attach_reports(&[]), "No items processed");
    }

    #[test]
    fn test_format_attach_reports() {
        let reports = vec![AttachReport {
            item_code: "KM-01".to_string(),
            probes: 60,
            hits: 2,
            misses: 58,
            attached: 1,
            already_attached: 1,
            failed_inserts: 0,
            attached_urls: vec!["https://img/KM-01_depan_gallery.jpg".to_string()],
        }];

        let output = format_attach_reports(&reports);
        assert_eq!(
            output,
            "KM-01: 60 probed, 2 found, 1 attached, 1 already attached\n  + https://img/KM-01_depan_gallery.jpg\n"
        );
    }

    #[test]
    fn test_format_attach_reports_with_failures() {
        let reports = vec![AttachReport {
            item_code: "KM-02".to_string(),
            failed_inserts: 3,
            ..AttachReport::default()
        }];
        assert!(format_attach_reports(&reports).contains(", 3 failed"));
    }

    #[test]
    fn test_format_export_publish() {
        let report = export_report(
            ExportTarget::Publish,
            Some(PublishOutcome {
                deleted: 1,
                failed_deletes: 1,
                file_id: Some("abc123".to_string()),
                file_url: Some("/files/website-products.json".to_string()),
            }),
        );
        let output = format_export_report(&report);
        assert!(output.contains("Exported 2 products (5 images, 812 bytes) at 2025-01-17 08:30:00 UTC"));
        assert!(output.contains("Replaced 1 previous snapshot(s), 1 could not be deleted"));
        assert!(output.contains("Published /files/website-products.json"));
    }

    #[test]
    fn test_format_export_local_file() {
        let report = export_report(ExportTarget::LocalFile(PathBuf::from("out.json")), None);
        assert!(format_export_report(&report).contains("Wrote out.json"));
    }
}
