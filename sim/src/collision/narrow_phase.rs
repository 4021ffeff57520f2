use rapier3d::parry::{
    query,
    shape::{self as pshape, Shape},
};

use super::settings::{CONTACT_PREDICTION, FEATURE_EPS};
use super::types::{Capsule, Iso, Point3, SphereCollider, Vec3};

/// Penetration of a query shape into one level triangle.
#[derive(Clone, Copy, Debug)]
pub struct TriangleContact {
    /// World-space direction that moves the query shape out of the triangle.
    pub normal: Vec3,
    /// Penetration depth (meters, > 0).
    pub depth: f32,
}

impl TriangleContact {
    #[inline]
    pub fn correction(&self) -> Vec3 {
        self.normal * self.depth
    }
}

/// A level triangle plus the edges it shares with a coplanar neighbour.
///
/// Contacts on such internal edges are answered with the face normal: the
/// edge is not a real corner of the level, and its edge normal would tilt a
/// wall contact upward.
#[derive(Clone, Copy, Debug)]
pub struct LevelTriangle {
    pub shape: pshape::Triangle,
    /// Unit normal following the winding `a, b, c`; zero for slivers.
    pub normal: Vec3,
    /// Edge `i` runs from corner `i` to corner `(i + 1) % 3`.
    pub internal_edges: [bool; 3],
}

impl LevelTriangle {
    pub fn new(corners: &[Point3; 3], internal_edges: [bool; 3]) -> Self {
        let [a, b, c] = *corners;
        Self {
            shape: pshape::Triangle::new(a, b, c),
            normal: face_normal(corners),
            internal_edges,
        }
    }

    #[inline]
    fn corners(&self) -> [Vec3; 3] {
        [self.shape.a.coords, self.shape.b.coords, self.shape.c.coords]
    }

    /// True when `point` is inside the face or only on internal edges.
    fn is_smooth_at(&self, point: &Vec3) -> bool {
        if self.normal == Vec3::zeros() {
            return false;
        }
        let v = self.corners();
        (0..3).all(|i| self.internal_edges[i] || !near_segment(point, &v[i], &v[(i + 1) % 3]))
    }

    /// Replace a raw contact by a push along the face normal when the contact
    /// sits on a smooth part of the surface.
    ///
    /// `core` is the query shape's skeleton (segment endpoints or sphere
    /// center) and `radius` its inflation.
    fn face_contact(
        &self,
        raw: TriangleContact,
        point: &Vec3,
        core: &[Vec3],
        radius: f32,
    ) -> Option<TriangleContact> {
        if !self.is_smooth_at(point) {
            return Some(raw);
        }
        let normal = if self.normal.dot(&raw.normal) >= 0.0 {
            self.normal
        } else {
            -self.normal
        };
        let origin = self.shape.a.coords;
        let height = core
            .iter()
            .map(|p| normal.dot(&(p - origin)))
            .fold(f32::INFINITY, f32::min);
        let depth = radius - height;
        (depth > 0.0 && depth.is_finite()).then_some(TriangleContact { normal, depth })
    }
}

/// Unit normal of a triangle, zero when it has no area.
pub fn face_normal([a, b, c]: &[Point3; 3]) -> Vec3 {
    (b - a)
        .cross(&(c - a))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::zeros)
}

fn near_segment(p: &Vec3, a: &Vec3, b: &Vec3) -> bool {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p - (a + ab * t)).norm() <= FEATURE_EPS
}

/// Penetration of a segment capsule into `triangle`, if any.
pub fn capsule_triangle_contact(
    capsule: &Capsule,
    triangle: &LevelTriangle,
) -> Option<TriangleContact> {
    let shape = pshape::Capsule::new(
        Point3::from(capsule.start),
        Point3::from(capsule.end),
        capsule.radius,
    );
    let (raw, point) = contact_with_pose(&triangle.shape, &Iso::identity(), &shape as &dyn Shape)?;
    triangle.face_contact(raw, &point, &[capsule.start, capsule.end], capsule.radius)
}

/// Penetration of a sphere into `triangle`, if any.
pub fn sphere_triangle_contact(
    sphere: &SphereCollider,
    triangle: &LevelTriangle,
) -> Option<TriangleContact> {
    // Balls are centered on their isometry, so the sphere's position goes there.
    let ball = pshape::Ball::new(sphere.radius);
    let ball_iso = Iso::translation(sphere.center.x, sphere.center.y, sphere.center.z);
    let (raw, point) = contact_with_pose(&triangle.shape, &ball_iso, &ball as &dyn Shape)?;
    triangle.face_contact(raw, &point, &[sphere.center], sphere.radius)
}

/// Raw parry contact plus the touched point on the triangle.
fn contact_with_pose(
    triangle: &pshape::Triangle,
    shape_iso: &Iso,
    shape: &dyn Shape,
) -> Option<(TriangleContact, Vec3)> {
    // Triangles are stored in world space, so they sit at the identity pose.
    let contact = match query::contact(
        &Iso::identity(),
        triangle as &dyn Shape,
        shape_iso,
        shape,
        CONTACT_PREDICTION,
    ) {
        Ok(Some(contact)) => contact,
        Ok(None) => return None,
        Err(_) => {
            log::trace!("unsupported triangle contact pair");
            return None;
        }
    };

    if contact.dist.is_nan() || contact.dist >= 0.0 {
        return None;
    }

    // `normal1` is the outward normal on the triangle, pointing toward the query shape.
    let normal = contact.normal1.into_inner();
    if !normal.iter().all(|v| v.is_finite()) {
        return None;
    }

    let raw = TriangleContact {
        normal,
        depth: -contact.dist,
    };
    Some((raw, contact.point1.coords))
}
