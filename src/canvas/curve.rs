// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Connection geometry: cubic curves between anchors and chevron arrowheads.

use std::f64::consts::PI;

use crate::model::{Anchor, Connection, Diagram, Point, Vector};

pub const CONTROL_OFFSET_FACTOR: f64 = 0.25;
pub const MIN_CONTROL_OFFSET: f64 = 50.0;
pub const MAX_CONTROL_OFFSET: f64 = 100.0;
pub const ARROW_LENGTH: f64 = 12.0;
pub const ARROW_HALF_ANGLE: f64 = PI / 8.0;
/// Polyline resolution used for hit testing and for terminal rendering.
pub const CURVE_SEGMENTS: usize = 32;
pub const CURVE_HIT_TOLERANCE: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// Builds the curve between two anchor points, bending out of each anchor along its normal.
    pub fn between(start: Point, start_anchor: Anchor, end: Point, end_anchor: Anchor) -> Self {
        let offset = control_offset(start.distance(end));
        Self {
            start,
            control1: start + start_anchor.outward_normal() * offset,
            control2: end + end_anchor.outward_normal() * offset,
            end,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point::new(
            b0 * self.start.x + b1 * self.control1.x + b2 * self.control2.x + b3 * self.end.x,
            b0 * self.start.y + b1 * self.control1.y + b2 * self.control2.y + b3 * self.end.y,
        )
    }

    /// `segments + 1` evenly parameterized points from start to end.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    /// Shortest distance from `point` to the sampled curve polyline.
    pub fn distance_to(&self, point: Point) -> f64 {
        self.sample(CURVE_SEGMENTS)
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn end_arrow(&self) -> Arrowhead {
        Arrowhead::pointing(self.end, self.end - self.control2)
    }

    pub fn start_arrow(&self) -> Arrowhead {
        Arrowhead::pointing(self.start, self.start - self.control1)
    }
}

pub fn control_offset(distance: f64) -> f64 {
    (distance * CONTROL_OFFSET_FACTOR).clamp(MIN_CONTROL_OFFSET, MAX_CONTROL_OFFSET)
}

/// A two-segment chevron: `left -> tip -> right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
}

impl Arrowhead {
    /// Arrowhead whose tip sits at `tip`, pointing along `direction`.
    pub fn pointing(tip: Point, direction: Vector) -> Self {
        let angle = direction.angle();
        Self {
            tip,
            left: tip - Vector::from_angle(angle - ARROW_HALF_ANGLE) * ARROW_LENGTH,
            right: tip - Vector::from_angle(angle + ARROW_HALF_ANGLE) * ARROW_LENGTH,
        }
    }

    /// Point-in-triangle test over the chevron's closed hull.
    pub fn contains(&self, point: Point) -> bool {
        let d1 = (self.left - self.tip).cross(point - self.tip);
        let d2 = (self.right - self.left).cross(point - self.left);
        let d3 = (self.tip - self.right).cross(point - self.right);
        let has_negative = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_positive = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_negative && has_positive)
    }
}

/// Everything needed to draw or hit-test one connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionGeometry {
    pub curve: CubicCurve,
    pub start_arrow: Option<Arrowhead>,
    pub end_arrow: Option<Arrowhead>,
}

impl ConnectionGeometry {
    /// `None` when an endpoint node is missing from `diagram`.
    pub fn of(diagram: &Diagram, connection: &Connection) -> Option<Self> {
        let start = connection.start();
        let end = connection.end();
        let start_point = diagram.node(start.node_id)?.anchor_point(start.anchor);
        let end_point = diagram.node(end.node_id)?.anchor_point(end.anchor);
        let curve = CubicCurve::between(start_point, start.anchor, end_point, end.anchor);
        let direction = connection.direction();

        Some(Self {
            curve,
            start_arrow: direction.has_start_arrow().then(|| curve.start_arrow()),
            end_arrow: direction.has_end_arrow().then(|| curve.end_arrow()),
        })
    }

    pub fn arrows(&self) -> impl Iterator<Item = Arrowhead> {
        self.start_arrow.into_iter().chain(self.end_arrow)
    }
}

fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let length_sq = ab.dot(ab);
    if length_sq <= f64::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{control_offset, Arrowhead, ConnectionGeometry, CubicCurve, ARROW_LENGTH};
    use crate::model::{
        Anchor, Connection, Diagram, Direction, Endpoint, Node, NodeId, Point, Vector,
    };

    fn two_nodes() -> Diagram {
        let nodes = [
            (NodeId::new(1), Node::new(Point::new(100.0, 100.0))),
            (NodeId::new(2), Node::new(Point::new(300.0, 100.0))),
        ]
        .into_iter()
        .collect();
        Diagram::from_parts(nodes, Vec::new()).expect("diagram")
    }

    fn right_to_left(direction: Direction) -> Connection {
        let mut connection = Connection::new(
            Endpoint::new(NodeId::new(1), Anchor::Right),
            Endpoint::new(NodeId::new(2), Anchor::Left),
        );
        connection.set_direction(direction);
        connection
    }

    #[rstest]
    #[case(0.0, 50.0)]
    #[case(100.0, 50.0)]
    #[case(280.0, 70.0)]
    #[case(400.0, 100.0)]
    #[case(5000.0, 100.0)]
    fn control_offset_is_clamped(#[case] distance: f64, #[case] expected: f64) {
        assert_eq!(control_offset(distance), expected);
    }

    #[test]
    fn control_points_follow_outward_normals() {
        let curve = CubicCurve::between(
            Point::new(0.0, 0.0),
            Anchor::Top,
            Point::new(0.0, 400.0),
            Anchor::Bottom,
        );
        assert_eq!(curve.control1, Point::new(0.0, -100.0));
        assert_eq!(curve.control2, Point::new(0.0, 500.0));
        assert_eq!(curve.point_at(0.0), curve.start);
        assert_eq!(curve.point_at(1.0), curve.end);
    }

    #[test]
    fn one_way_has_single_arrow_at_end_anchor() {
        let diagram = two_nodes();
        let geometry =
            ConnectionGeometry::of(&diagram, &right_to_left(Direction::OneWay)).expect("geometry");

        assert!(geometry.start_arrow.is_none());
        let end_arrow = geometry.end_arrow.expect("end arrow");
        assert_eq!(end_arrow.tip, Point::new(300.0, 130.0));
        assert_eq!(geometry.arrows().count(), 1);
    }

    #[test]
    fn two_way_adds_start_arrow_without_moving_endpoints() {
        let diagram = two_nodes();
        let one_way =
            ConnectionGeometry::of(&diagram, &right_to_left(Direction::OneWay)).expect("one-way");
        let two_way =
            ConnectionGeometry::of(&diagram, &right_to_left(Direction::TwoWay)).expect("two-way");

        assert_eq!(one_way.curve, two_way.curve);
        assert_eq!(two_way.arrows().count(), 2);
        let start_arrow = two_way.start_arrow.expect("start arrow");
        assert_eq!(start_arrow.tip, Point::new(300.0, 130.0));
        assert_eq!(start_arrow.tip, two_way.curve.start);
    }

    #[test]
    fn two_way_arrows_sit_on_their_own_anchors_and_trail_along_the_curve() {
        let nodes = [
            (NodeId::new(1), Node::new(Point::new(0.0, 0.0))),
            (NodeId::new(2), Node::new(Point::new(600.0, 0.0))),
        ]
        .into_iter()
        .collect();
        let diagram = Diagram::from_parts(nodes, Vec::new()).expect("diagram");
        let geometry =
            ConnectionGeometry::of(&diagram, &right_to_left(Direction::TwoWay)).expect("geometry");

        let start_arrow = geometry.start_arrow.expect("start arrow");
        let end_arrow = geometry.end_arrow.expect("end arrow");
        assert_eq!(start_arrow.tip, Point::new(200.0, 30.0));
        assert_eq!(end_arrow.tip, Point::new(600.0, 30.0));

        // Wings open toward the curve, so each tip points into its node.
        assert!(start_arrow.left.x > start_arrow.tip.x);
        assert!(start_arrow.right.x > start_arrow.tip.x);
        assert!(end_arrow.left.x < end_arrow.tip.x);
        assert!(end_arrow.right.x < end_arrow.tip.x);
        let start_direction = geometry.curve.start - geometry.curve.control1;
        let start_wings =
            (start_arrow.left - start_arrow.tip) + (start_arrow.right - start_arrow.tip);
        assert!(start_direction.dot(start_wings) < 0.0);
    }

    #[test]
    fn no_arrows_without_direction() {
        let diagram = two_nodes();
        let geometry =
            ConnectionGeometry::of(&diagram, &right_to_left(Direction::None)).expect("geometry");
        assert_eq!(geometry.arrows().count(), 0);
    }

    #[test]
    fn geometry_needs_both_endpoints() {
        let diagram = Diagram::new();
        assert!(ConnectionGeometry::of(&diagram, &right_to_left(Direction::None)).is_none());
    }

    #[test]
    fn arrowhead_wings_sit_at_fixed_length_behind_tip() {
        let arrow = Arrowhead::pointing(Point::new(10.0, 0.0), Vector::new(1.0, 0.0));
        assert!((arrow.tip.distance(arrow.left) - ARROW_LENGTH).abs() < 1e-9);
        assert!((arrow.tip.distance(arrow.right) - ARROW_LENGTH).abs() < 1e-9);
        assert!(arrow.left.x < arrow.tip.x);
        assert!(arrow.right.x < arrow.tip.x);
        assert!(arrow.contains(Point::new(5.0, 0.0)));
        assert!(!arrow.contains(Point::new(15.0, 0.0)));
        assert!(!arrow.contains(Point::new(5.0, 8.0)));
    }

    #[test]
    fn distance_to_curve_is_small_on_path_and_large_off_path() {
        let curve = CubicCurve::between(
            Point::new(0.0, 0.0),
            Anchor::Right,
            Point::new(400.0, 0.0),
            Anchor::Left,
        );
        assert!(curve.distance_to(curve.point_at(0.5)) < 1e-6);
        assert!(curve.distance_to(Point::new(200.0, 80.0)) > 50.0);
    }
}
