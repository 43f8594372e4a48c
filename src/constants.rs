// ABOUTME: Re-export of application constants from the core crate
// ABOUTME: Duration units, ingestion defaults, service names, and environment variable keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Application constants

pub use recipe_hub_core::constants::*;
