//! Progress bars for record loops.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a progress bar over `total` records.
///
/// Returns `None` when disabled or there is nothing to do.
pub fn create_record_progress(total: usize, action: &str, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total == 0 {
        return None;
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} {action} ({{eta}})"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Create a spinner for work of unknown length, such as paging search results.
pub fn create_spinner(message: &str, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

/// Increment a progress bar.
pub fn inc_progress(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb {
        pb.inc(1);
    }
}

/// Update a spinner's message.
pub fn set_message(pb: Option<&ProgressBar>, message: String) {
    if let Some(pb) = pb {
        pb.set_message(message);
    }
}
