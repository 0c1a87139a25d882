//! Unit test suite

mod registry_test;
mod response_test;
