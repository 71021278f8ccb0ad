//! Tests for credential utilities
