//! Tests for BFS core assignment.

mod assigner_tests;
