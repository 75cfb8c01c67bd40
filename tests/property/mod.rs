// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! This module contains property-based tests using proptest to verify
//! the invariants every producer and consumer relies on.

mod entity_properties;
mod timestamp_properties;
