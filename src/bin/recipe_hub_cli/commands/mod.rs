// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for recipe-hub-cli
// ABOUTME: Provides access to recipe and maintenance commands

pub mod maintenance;
pub mod recipes;
