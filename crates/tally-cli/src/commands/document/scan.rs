use std::collections::HashSet;

use tally_core::responses::ScanReport;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::files;
use crate::output::output;
use crate::progress::Progress;

/// How the files on disk line up with the registered paths.
#[derive(Debug, Default, PartialEq, Eq)]
struct ScanPlan<'a> {
    new: Vec<&'a str>,
    already_known: u32,
    missing: Vec<String>,
}

fn plan_scan<'a>(on_disk: &'a [String], registered: &[String]) -> ScanPlan<'a> {
    let known: HashSet<&str> = registered.iter().map(String::as_str).collect();
    let present: HashSet<&str> = on_disk.iter().map(String::as_str).collect();

    let mut plan = ScanPlan::default();
    for relative_path in on_disk {
        if known.contains(relative_path.as_str()) {
            plan.already_known += 1;
        } else {
            plan.new.push(relative_path);
        }
    }
    plan.missing = registered
        .iter()
        .filter(|path| !present.contains(path.as_str()))
        .cloned()
        .collect();
    plan
}

/// Register files found under the documents folder and report registered
/// documents whose file is gone.
pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let on_disk = files::document_files(&ctx.paths.documents)?;
    let registered = ctx.service.document_paths().await?;
    let plan = plan_scan(&on_disk, &registered);

    let mut report = ScanReport {
        already_known: plan.already_known,
        missing: plan.missing,
        ..ScanReport::default()
    };
    let progress = Progress::bar(plan.new.len() as u64, "Registering documents");
    for relative_path in plan.new {
        progress.set_message(relative_path);
        report
            .registered
            .push(ctx.service.register_document(relative_path).await?);
        progress.inc(1);
    }
    progress.finish_ok(&format!("{} new", report.registered.len()));

    for path in &report.missing {
        tracing::warn!(%path, "registered document is missing on disk");
    }

    output(&report, flags.format)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ScanPlan, plan_scan};

    fn paths(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn splits_new_known_and_missing() {
        let on_disk = paths(&["a.pdf", "plans/b.pdf", "plans/c.pdf"]);
        let registered = paths(&["old.pdf", "plans/b.pdf"]);

        assert_eq!(
            plan_scan(&on_disk, &registered),
            ScanPlan {
                new: vec!["a.pdf", "plans/c.pdf"],
                already_known: 1,
                missing: paths(&["old.pdf"]),
            }
        );
    }

    #[test]
    fn large_registries_report_nothing_new() {
        let on_disk: Vec<String> = (0..10_001).map(|n| format!("docs/{n:05}.pdf")).collect();

        let plan = plan_scan(&on_disk, &on_disk);
        assert!(plan.new.is_empty());
        assert_eq!(plan.already_known, 10_001);
        assert!(plan.missing.is_empty());
    }
}
