// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas scene data structures.
//!
//! A read-only projection of the `nodes` and `edges` of a canvas document,
//! used by the host to draw it. Unknown fields are ignored here; the
//! document itself keeps them.

use serde::{Deserialize, Serialize};

/// A card placed on the canvas, in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl CanvasNode {
    /// Create a text card centred on the given point.
    pub fn text_card(id: String, center_x: f64, center_y: f64, text: String) -> Self {
        let width = 250.0;
        let height = 60.0;
        Self {
            id,
            node_type: "text".to_string(),
            x: center_x - width / 2.0,
            y: center_y - height / 2.0,
            width,
            height,
            text: Some(text),
            file: None,
        }
    }

    /// Label shown inside the card.
    pub fn label(&self) -> &str {
        self.text
            .as_deref()
            .or(self.file.as_deref())
            .unwrap_or(&self.node_type)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A connection between two cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
}

/// Nodes and edges of one canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasScene {
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
}

impl CanvasScene {
    /// Parse the scene out of canvas document text. Malformed text gives an
    /// empty scene so the view still opens.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(text) {
            Ok(scene) => scene,
            Err(e) => {
                log::warn!("Canvas content could not be parsed: {}", e);
                Self::default()
            }
        }
    }

    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
