use std::fmt::Write;

use crate::models::{DevOpsStatus, DevOpsSystem, SystemReport};

use super::styling::{bright, dim, status_styled};
use super::tables::{apply_styling, create_table, header_cells, status_table};

/// Prints one status table per polled system to stdout.
pub fn print_reports(reports: &[SystemReport]) {
    for report in reports {
        println!("{}", render_report(report, true));
    }
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

/// Status counts in display order, skipping zeros.
fn render_counts(report: &SystemReport) -> String {
    let separator = dim(" · ").to_string();
    DevOpsStatus::ALL
        .iter()
        .filter_map(|&status| {
            let count = report.count(status);
            (count > 0).then(|| {
                status_styled(status, format!("{count} {}", status.label())).to_string()
            })
        })
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Renders one system's report. `styled` keeps table colors, which only
/// belong on a terminal.
pub fn render_report(report: &SystemReport, styled: bool) -> String {
    let mut output = String::new();

    add_section_header(
        &mut output,
        "📡",
        &format!("{} ({})", report.system, report.tenant),
    );
    let _ = writeln!(output, "{}", status_table(&report.records, styled));

    if report.records.is_empty() {
        let _ = writeln!(output, "  {}", dim("No repositories observed"));
    } else {
        let _ = writeln!(output, "  {}", render_counts(report));
    }
    let _ = writeln!(
        output,
        "  {}",
        dim(format!(
            "Collected at {}",
            report.collected_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
    );

    output
}

/// Lists configured systems and their observed repositories.
pub fn render_systems(systems: &[DevOpsSystem], styled: bool) -> String {
    let mut output = String::new();

    if systems.is_empty() {
        let _ = writeln!(output, "{}", dim("No systems configured"));
        return output;
    }

    for system in systems {
        add_section_header(&mut output, "⚙️", system.display_name());
        let _ = writeln!(output, "  {} {}", dim("guid:"), system.guid);
        let _ = writeln!(
            output,
            "  {} {}/2.0/repositories/{}",
            dim("endpoint:"),
            system.server_url.trim_end_matches('/'),
            system.tenant
        );

        let mut table = create_table();
        apply_styling(&mut table, styled);
        table.set_header(header_cells(&["Alias", "Repository", "Branch"]));
        for item in &system.observed_automations {
            table.add_row(vec![
                item.alias.as_str(),
                item.repository_name.as_str(),
                item.repository_branch.as_str(),
            ]);
        }
        let _ = writeln!(output, "{table}");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::StatusRecord;
    use chrono::Utc;

    fn record(alias: &str, status: DevOpsStatus) -> StatusRecord {
        StatusRecord {
            alias: alias.to_string(),
            status,
            ..StatusRecord::default()
        }
    }

    fn report(records: Vec<StatusRecord>) -> SystemReport {
        SystemReport {
            system: "Acme Bitbucket".to_string(),
            guid: "a1".to_string(),
            tenant: "acme".to_string(),
            server_type: "Bitbucket".to_string(),
            collected_at: Utc::now(),
            records,
        }
    }

    #[test]
    fn test_render_report_includes_counts() {
        console::set_colors_enabled(false);
        let output = render_report(&report(vec![
            record("A", DevOpsStatus::Success),
            record("B", DevOpsStatus::Success),
            record("C", DevOpsStatus::Fail),
        ]), true);

        assert!(output.contains("Acme Bitbucket (acme)"));
        assert!(output.contains("2 Success"));
        assert!(output.contains("1 Fail"));
        assert!(!output.contains("0 Error"));
    }

    #[test]
    fn test_render_report_empty_system() {
        console::set_colors_enabled(false);
        let output = render_report(&report(vec![]), true);

        assert!(output.contains("No repositories observed"));
    }

    #[test]
    fn test_render_systems_lists_observed_items() {
        console::set_colors_enabled(false);
        let config = Config::sample();
        let output = render_systems(&config.systems, true);

        assert!(output.contains("Bitbucket Cloud"));
        assert!(output.contains("https://api.bitbucket.org/2.0/repositories/your-workspace"));
        assert!(output.contains("your-repository"));
        assert!(output.contains("My service"));
    }

    #[test]
    fn test_unstyled_report_is_plain_text() {
        console::set_colors_enabled(false);
        let output = render_report(&report(vec![record("A", DevOpsStatus::Error)]), false);

        assert!(output.contains("1 Error"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_render_systems_without_configuration() {
        console::set_colors_enabled(false);
        assert!(render_systems(&[], true).contains("No systems configured"));
    }
}
