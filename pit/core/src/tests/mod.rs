//! Unit tests for pit-core against an instrumented fake peripheral

mod fake;

mod value;
