//! Tests for edge aggregation.

mod aggregator_tests;
