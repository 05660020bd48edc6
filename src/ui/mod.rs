// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the canvas host.

pub mod canvas;
pub mod notices;
pub mod settings;
pub mod toolbar;
