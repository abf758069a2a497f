//! End-to-end tests for the rule-based engine.
