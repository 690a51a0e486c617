// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports helper modules for garmin-cli
// ABOUTME: Provides check reporting and the interactive login used by every command

pub mod report;
pub mod session;
