//! Miscellaneous geometry helpers, usually related to vectors.

use angle::Angle;

use crate::{V2Ext, V2};

/// An axis-aligned rectangle, stored as its `min` and `max` corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2 {
    min: V2,
    max: V2,
}

impl Rect2 {
    /// A 0-size `Rect2` which contains only `pt`
    pub fn point(pt: V2) -> Self {
        Self { min: pt, max: pt }
    }

    /// Returns the bounding box of a set of points.  Returns `None` if the iterator didn't yield
    /// any points.
    pub fn bbox(points: impl IntoIterator<Item = V2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::point(first), |rect, pt| rect.expanded_to(pt)))
    }

    /// The smallest `Rect2` containing every rectangle in `rects`, or `None` if there are none
    pub fn union_iter(rects: impl IntoIterator<Item = Rect2>) -> Option<Self> {
        rects.into_iter().reduce(Self::union)
    }

    pub fn union(self, other: Self) -> Self {
        self.expanded_to(other.min).expanded_to(other.max)
    }

    fn expanded_to(self, pt: V2) -> Self {
        Self {
            min: V2::new(self.min.x.min(pt.x), self.min.y.min(pt.y)),
            max: V2::new(self.max.x.max(pt.x), self.max.y.max(pt.y)),
        }
    }

    pub fn min(&self) -> V2 {
        self.min
    }

    pub fn max(&self) -> V2 {
        self.max
    }

    pub fn size(&self) -> V2 {
        self.max - self.min
    }
}

/// Compute the average of a set of vectors
pub fn centroid(vs: impl IntoIterator<Item = V2>) -> Option<V2> {
    let mut sum = V2::ZERO;
    let mut num_elems = 0usize;
    for v in vs {
        sum += v;
        num_elems += 1;
    }
    if num_elems == 0 {
        // The centroid of no points is undefined
        None
    } else {
        Some(sum / num_elems as f32)
    }
}

/// Rotates a vector **clockwise** by an angle
pub fn rotate_vec(v: V2, angle: impl Angle<f32> + Copy) -> V2 {
    let sin = angle.sin();
    let cos = angle.cos();
    // Rotation **clockwise** corresponds to multiplication by the following matrix (which looks
    // like the classic anti-clockwise matrix because our y-axis goes down where the one in maths
    // goes up):
    // | cos(angle)  -sin(angle) |
    // | sin(angle)   cos(angle) |
    V2 {
        x: v.x * cos - v.y * sin,
        y: v.x * sin + v.y * cos,
    }
}

/// A circular arc between two points, bulging to the left of the direction `start -> end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    start: V2,
    end: V2,
    radius: f32,
}

impl CircularArc {
    /// Creates an arc from `start` to `end` whose height at its midpoint is `bulge` times the
    /// distance between the end points.  Returns `None` if the end points coincide or `bulge` is
    /// not in `(0, 0.5]`.
    pub fn with_bulge(start: V2, end: V2, bulge: f32) -> Option<Self> {
        let chord = (end - start).length();
        if chord <= f32::EPSILON || !(bulge > 0.0 && bulge <= 0.5) {
            return None;
        }
        // Sagitta `s` and half-chord `c` give the radius as `(c^2 + s^2) / 2s`
        let sagitta = bulge * chord;
        let half_chord = chord / 2.0;
        let radius = (half_chord * half_chord + sagitta * sagitta) / (2.0 * sagitta);
        Some(Self { start, end, radius })
    }

    /// The point of the arc furthest from its chord
    pub fn apex(&self) -> V2 {
        let chord = self.end - self.start;
        let half_chord = chord.length() / 2.0;
        let sagitta = self.radius - (self.radius * self.radius - half_chord * half_chord).sqrt();
        let normal = chord.left_normal() / chord.length();
        self.start.midpoint(self.end) + normal * sagitta
    }

    /// Approximate bounding box, taken over the end points and the apex
    pub fn bbox(&self) -> Rect2 {
        Rect2::point(self.start)
            .expanded_to(self.end)
            .expanded_to(self.apex())
    }

    /// Translates then scales this arc
    pub fn transform(&self, translation: V2, scale: f32) -> Self {
        Self {
            start: (self.start + translation) * scale,
            end: (self.end + translation) * scale,
            radius: self.radius * scale,
        }
    }

    /// The SVG path data (`d` attribute) which draws this arc
    pub fn svg_path_str(&self) -> String {
        // Sweep flag 1 draws clockwise on screen, which puts the bulge on the same side as
        // `V2Ext::left_normal`
        format!(
            "M {} {} A {} {} 0 0 1 {} {}",
            self.start.x, self.start.y, self.radius, self.radius, self.end.x, self.end.y
        )
    }
}

#[cfg(test)]
mod tests {
    use angle::Deg;

    use super::*;

    #[test]
    fn bbox_of_nothing_is_none() {
        assert_eq!(Rect2::bbox(std::iter::empty()), None);
    }

    #[test]
    fn bbox_covers_all_points() {
        let rect = Rect2::bbox(vec![V2::new(1.0, 5.0), V2::new(-2.0, 3.0), V2::new(0.0, 7.0)])
            .unwrap();
        assert_eq!(rect.min(), V2::new(-2.0, 3.0));
        assert_eq!(rect.max(), V2::new(1.0, 7.0));
    }

    #[test]
    fn rotation_is_clockwise_on_screen() {
        let v = rotate_vec(V2::new(1.0, 0.0), Deg(90.0f32));
        assert!((v.x - 0.0).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn half_circle_arc() {
        let arc = CircularArc::with_bulge(V2::new(0.0, 0.0), V2::new(2.0, 0.0), 0.5).unwrap();
        assert!((arc.radius - 1.0).abs() < 1e-6);
        let apex = arc.apex();
        assert!((apex.x - 1.0).abs() < 1e-5);
        assert!((apex.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn arc_bbox_includes_the_bulge() {
        let arc = CircularArc::with_bulge(V2::new(0.0, 0.0), V2::new(2.0, 0.0), 0.5).unwrap();
        let bbox = arc.bbox();
        assert!((bbox.min().y + 1.0).abs() < 1e-5);
        assert!(bbox.max().y.abs() < 1e-5);
        // The bulge is on the left of the direction of travel, so reversing the arc flips it
        let reversed = CircularArc::with_bulge(V2::new(2.0, 0.0), V2::new(0.0, 0.0), 0.5).unwrap();
        assert!((reversed.apex().y - 1.0).abs() < 1e-5);
        assert_eq!(V2::new(1.0, 0.0).left_normal(), V2::new(0.0, -1.0));
    }

    #[test]
    fn degenerate_arcs_are_rejected() {
        assert!(CircularArc::with_bulge(V2::ZERO, V2::ZERO, 0.2).is_none());
        assert!(CircularArc::with_bulge(V2::ZERO, V2::ONE, 0.0).is_none());
        assert!(CircularArc::with_bulge(V2::ZERO, V2::ONE, 0.7).is_none());
    }
}
