// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: viewport records, device identity, settings and canvas scenes.

pub mod canvas;
pub mod device;
pub mod settings;
pub mod viewport;
