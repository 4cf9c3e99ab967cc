//! Property-based tests for listing order and mutation guarantees

mod listing;
