//! Graph shape tests
