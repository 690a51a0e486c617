// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for garmin-cli
// ABOUTME: Provides the end-to-end checks and the data display/export commands

pub mod checks;
pub mod data;
