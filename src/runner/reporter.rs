use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::http::Status;
use crate::runner::types::{RunReport, RunSummary, TestResult, TestStatus};
use crate::utils::{format_bytes, format_ms};

pub struct TestReporter {
    enabled: bool,
}

impl TestReporter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn print_header(&self) {
        if self.enabled {
            println!("\n{}\n", "🚀 Starting API tests".blue().bold());
        }
    }

    /// 打印结果表格和摘要
    pub fn print_report(&self, report: &RunReport) {
        if !self.enabled {
            return;
        }
        println!("{}", self.render_table(&report.results));
        self.print_summary(&report.summary);
        println!("\n{}\n", "Tests completed ✅".green().bold());
    }

    pub fn render_table(&self, results: &[TestResult]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Method", "URL", "Status", "Response Time", "Result"]);

        for result in results {
            let status_color = status_color(result.status);
            let verdict = if result.success {
                Cell::new("✅ Pass").fg(Color::Green)
            } else {
                Cell::new("❌ Fail").fg(Color::Red)
            };

            table.add_row(vec![
                Cell::new(result.method.as_str()),
                Cell::new(&result.url).add_attribute(Attribute::Dim),
                Cell::new(result.status).fg(status_color),
                Cell::new(result.response_time.map(|d| format!("{}ms", d.as_millis())).unwrap_or_else(|| "-".to_string())),
                verdict,
            ]);
        }

        table
    }

    pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
        vec![
            format!(
                "Total request: {} ✅ Pass, {} ❌ Fail",
                summary.success_count, summary.failure_count
            ),
            format!("Total run duration: {:.2}s", summary.duration_seconds),
            format!(
                "Total Data Received: {} (approx)",
                format_bytes(summary.total_bytes_received)
            ),
            format!(
                "Average Response Time: {} [min: {}, max: {}, s.d.: {}]",
                format_ms(summary.avg_response_time_ms),
                format_ms(summary.min_response_time_ms),
                format_ms(summary.max_response_time_ms),
                format_ms(summary.std_dev_response_time_ms)
            ),
        ]
    }

    fn print_summary(&self, summary: &RunSummary) {
        println!("\n{}", "━".repeat(50));
        println!(
            "{} ({})",
            "Summary".bold(),
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("{}", "━".repeat(50));
        for line in Self::summary_lines(summary) {
            if summary.failure_count == 0 {
                println!("  {}", line.green());
            } else {
                println!("  {}", line.yellow());
            }
        }
    }
}

fn status_color(status: TestStatus) -> Color {
    let TestStatus::Code(code) = status else {
        return Color::Red;
    };
    match Status::new(code) {
        Ok(s) if s.is_success() => Color::Green,
        Ok(s) if s.is_redirect() => Color::Cyan,
        Ok(s) if s.is_client_error() => Color::Yellow,
        Ok(s) if s.is_server_error() => Color::Magenta,
        _ => Color::DarkGrey,
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(true)
    }
}
