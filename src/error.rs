// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for viewport persistence.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not read canvas: {0}")]
    Read(#[source] std::io::Error),

    #[error("canvas is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("canvas root is not a JSON object")]
    NotAnObject,

    #[error("\"viewports\" is not a JSON object")]
    MalformedViewports,

    #[error("viewport has a non-finite component")]
    NonFinite,

    #[error("could not serialize canvas: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("could not write canvas: {0}")]
    Write(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
