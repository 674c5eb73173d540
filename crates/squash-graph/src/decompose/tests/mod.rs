//! Tests for k-core decomposition.
