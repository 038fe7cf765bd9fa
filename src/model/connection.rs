// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::Anchor;
use super::ids::NodeId;
use super::palette::ConnectionColor;

/// One end of a connection: a node plus the anchor on that node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub node_id: NodeId,
    pub anchor: Anchor,
}

impl Endpoint {
    pub const fn new(node_id: NodeId, anchor: Anchor) -> Self {
        Self { node_id, anchor }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_id, self.anchor)
    }
}

/// Which ends of a connection carry an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "one-way")]
    OneWay,
    #[serde(rename = "two-way")]
    TwoWay,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::None, Direction::OneWay, Direction::TwoWay];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OneWay => "one-way",
            Self::TwoWay => "two-way",
        }
    }

    pub fn has_end_arrow(self) -> bool {
        matches!(self, Self::OneWay | Self::TwoWay)
    }

    pub fn has_start_arrow(self) -> bool {
        matches!(self, Self::TwoWay)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    value: String,
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction {:?} (expected none/one-way/two-way)", self.value)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "one-way" => Ok(Self::OneWay),
            "two-way" => Ok(Self::TwoWay),
            other => Err(ParseDirectionError {
                value: other.to_owned(),
            }),
        }
    }
}

/// A curved edge between two node anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    start: Endpoint,
    end: Endpoint,
    direction: Direction,
    color: ConnectionColor,
}

impl Connection {
    pub fn new(start: Endpoint, end: Endpoint) -> Self {
        Self {
            start,
            end,
            direction: Direction::default(),
            color: ConnectionColor::default(),
        }
    }

    pub fn new_with(
        start: Endpoint,
        end: Endpoint,
        direction: Direction,
        color: ConnectionColor,
    ) -> Self {
        Self {
            start,
            end,
            direction,
            color,
        }
    }

    pub fn start(&self) -> Endpoint {
        self.start
    }

    pub fn end(&self) -> Endpoint {
        self.end
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn color(&self) -> ConnectionColor {
        self.color
    }

    pub fn set_color(&mut self, color: ConnectionColor) {
        self.color = color;
    }

    pub fn references(&self, node_id: NodeId) -> bool {
        self.start.node_id == node_id || self.end.node_id == node_id
    }

    pub fn is_self_loop(&self) -> bool {
        self.start.node_id == self.end.node_id
    }
}
