//! Tests for the compression orchestrator.
