//! Adaptation tests
//!
//! Functions and objects made traceable, and what they keep from the original.

mod functions;
mod objects;
