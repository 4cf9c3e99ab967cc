//! Integration tests for the Rolodeck contact book

mod deadline;
mod latency_gate;
mod optimistic_protocol;
mod test_utils;
