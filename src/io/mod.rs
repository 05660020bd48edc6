// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for canvas documents and settings.

pub mod document;
pub mod settings;
pub mod store;
