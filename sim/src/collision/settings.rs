/*!
Collision tolerances.

Gameplay tunables live in `SimConfig`; the values here only keep the
geometric queries numerically stable and are not meant to be tuned per level.

Notes
- Distances are in meters.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Corrections shorter than this are treated as "no contact" (meters).
/// Prevents normalising a near-zero vector into noise.
pub const MIN_CORRECTION: f32 = 1.0e-6;

/// Extra margin added around a query AABB when gathering candidate triangles.
/// The working shape moves while it is pushed out, so the candidate set must
/// cover a little more than the starting pose.
pub const CANDIDATE_SKIN: f32 = 0.05;

/// Contact prediction distance passed to parry. Zero keeps only true overlaps.
pub const CONTACT_PREDICTION: f32 = 0.0;

/// Distance from a triangle edge within which a contact point counts as on it.
pub const FEATURE_EPS: f32 = 1.0e-4;

/// Two triangles sharing an edge are coplanar when their normals' dot product
/// reaches this.
pub const COPLANAR_COS: f32 = 0.9999;

/// Normal components smaller than this are rounding noise and snapped to zero
/// before a contact is classified.
pub const NORMAL_SNAP: f32 = 1.0e-5;

/// Fallback normal used when two centers coincide.
pub const FALLBACK_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Fallback push direction for coincident actors.
pub const FALLBACK_PUSH: [f32; 3] = [1.0, 0.0, 0.0];
