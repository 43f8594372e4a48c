// ABOUTME: Re-export of the unified error system from the core crate
// ABOUTME: Keeps crate::errors paths stable for every module in the service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling
//!
//! `AppError`, `ErrorCode`, and `AppResult` live in `recipe-hub-core` so the
//! models there can return them too.

pub use recipe_hub_core::errors::*;
