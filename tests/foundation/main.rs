//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: BoxId, Kind/Subkind tags, Error, and randomness.
