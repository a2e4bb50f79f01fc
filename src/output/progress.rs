use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright_green, bright_yellow};

/// Spinner shown on stderr while one system is being polled
pub struct PollProgress {
    pb: ProgressBar,
}

impl PollProgress {
    pub fn start(system: &str, repositories: usize) -> Self {
        let pb = create_spinner(
            bright_yellow(format!("Polling {repositories} repositories on {system}")).to_string(),
        );
        Self { pb }
    }

    pub fn finish(self, system: &str, records: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Collected {records} statuses from {system} ✓")).to_string(),
        );
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
