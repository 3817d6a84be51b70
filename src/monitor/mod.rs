pub mod alarms;
pub mod dashboard;
pub mod overview;

pub use alarms::{AlarmLog, AlarmNotice, AlarmSource};
pub use dashboard::{BatchOutcome, DashboardMonitor};
pub use overview::StatusOverview;
