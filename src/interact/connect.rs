// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::Endpoint;
use crate::ops::Op;

/// Two-click connect gesture: pick a first anchor, then an anchor on another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectGesture {
    #[default]
    Idle,
    Connecting { from: Endpoint },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectStep {
    Started,
    Completed(Op),
    /// Both anchors belong to the same node; nothing is created.
    RejectedSelfLoop,
}

impl ConnectGesture {
    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting { .. })
    }

    pub fn pending_from(&self) -> Option<Endpoint> {
        match self {
            Self::Connecting { from } => Some(*from),
            Self::Idle => None,
        }
    }

    pub fn click_anchor(&mut self, endpoint: Endpoint) -> ConnectStep {
        match std::mem::take(self) {
            Self::Idle => {
                *self = Self::Connecting { from: endpoint };
                ConnectStep::Started
            }
            Self::Connecting { from } if from.node_id == endpoint.node_id => {
                ConnectStep::RejectedSelfLoop
            }
            Self::Connecting { from } => ConnectStep::Completed(Op::connect(from, endpoint)),
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectGesture, ConnectStep};
    use crate::model::{Anchor, Endpoint, NodeId};
    use crate::ops::Op;

    #[test]
    fn second_anchor_on_other_node_completes() {
        let a = Endpoint::new(NodeId::new(1), Anchor::Right);
        let b = Endpoint::new(NodeId::new(2), Anchor::Left);
        let mut gesture = ConnectGesture::default();

        assert_eq!(gesture.click_anchor(a), ConnectStep::Started);
        assert_eq!(gesture.pending_from(), Some(a));
        assert_eq!(gesture.click_anchor(b), ConnectStep::Completed(Op::connect(a, b)));
        assert_eq!(gesture, ConnectGesture::Idle);
    }

    #[test]
    fn same_node_is_rejected_for_any_anchor() {
        let mut gesture = ConnectGesture::default();
        gesture.click_anchor(Endpoint::new(NodeId::new(3), Anchor::Top));
        assert_eq!(
            gesture.click_anchor(Endpoint::new(NodeId::new(3), Anchor::Bottom)),
            ConnectStep::RejectedSelfLoop
        );
        assert!(!gesture.is_connecting());
    }
}
