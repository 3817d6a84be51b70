pub mod lenient;
pub mod state;

pub use state::{AppState, PollStatus};

/// Wall-clock label for a chart point, e.g. `14:03:27`.
#[must_use]
pub fn time_label(at: chrono::DateTime<chrono::Local>) -> String {
    at.format("%H:%M:%S").to_string()
}
