mod handlers;
pub mod types;

pub use handlers::{alarm_stream, list_alarms};
pub use types::{AlarmResponse, AlarmsQuery};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_alarm_stream, __path_list_alarms};
