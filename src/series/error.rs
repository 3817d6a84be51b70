/// Contract violations raised by the series layer.
///
/// Bad sensor data never ends up here; it is defaulted to zero during
/// ingestion. These variants mean the caller asked for something that
/// cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("window capacity must be greater than zero")]
    InvalidCapacity,

    #[error("unknown sensor field: {0}. Must be one of: temperature, humidity, smoke, flame, light")]
    UnknownField(String),

    #[error("unknown chart view: {0}. Must be one of: combined, temperature, smoke, flame, humidity, light")]
    UnknownView(String),
}
