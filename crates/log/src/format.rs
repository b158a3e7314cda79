/// Output encoding for the global log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// ANSI-colored, human-readable — the default for local development.
    Pretty,
    /// One JSON object per line — for production log aggregation.
    Json,
}
