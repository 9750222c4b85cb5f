//! Mode control tests
//!
//! How the active tracer decides between running and recording.
