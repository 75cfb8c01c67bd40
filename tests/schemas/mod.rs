// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schema Tests Module

mod configuration;
mod entities;
