// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvas geometry: viewport transform, node regions, connection curves and hit testing.
//!
//! Everything here is pure and allocation-light so it can run on every pointer event.

pub mod curve;
pub mod hit;
pub mod layout;
pub mod viewport;

pub use curve::{Arrowhead, ConnectionGeometry, CubicCurve};
pub use hit::{hit_test, ConnectionPart, Hit};
pub use layout::{NodeLayout, NodeRegion};
pub use viewport::{Viewport, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
