//! Functional test suite
