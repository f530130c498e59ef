use glam::{Mat4, Vec3};

use crate::camera::Ray;

/// Flat geometry still gets a sliver of depth so taps can land on it.
const MIN_HALF_EXTENT: f32 = 0.005;

/// Distance along `ray` to the first intersection with a box of
/// `half_extents` centered on the origin of `model`'s local space.
///
/// `model` must be rigid (rotation + translation) so distances carry over.
pub fn ray_box_distance(ray: &Ray, model: Mat4, half_extents: Vec3) -> Option<f32> {
    if ray.dir == Vec3::ZERO {
        return None;
    }

    let inv = model.inverse();
    let origin = inv.transform_point3(ray.origin);
    let dir = inv.transform_vector3(ray.dir);
    let ext = half_extents.max(Vec3::splat(MIN_HALF_EXTENT));

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let (o, d, e) = (origin[axis], dir[axis], ext[axis]);
        if d.abs() < f32::EPSILON {
            if o < -e || o > e {
                return None;
            }
            continue;
        }
        let t1 = (-e - o) / d;
        let t2 = (e - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}
