//! Test suites for the sylva daemon.

pub(crate) mod support;
