mod progress;
mod report;
mod styling;
mod tables;

pub use progress::PollProgress;
pub use report::{print_reports, render_report, render_systems};
use styling::{dim, magenta_bold};

/// Prints the banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("📡 DevOps Observer"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Bitbucket pipeline status")
    );
}
