// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - [`strategies`]: generators for inventories and policies
//! - [`topology`]: tier heuristic and resolver properties
//! - [`markup`]: balance of the rendered Mermaid markup

mod markup;
mod strategies;
mod topology;
