use glam::Vec3;

use super::VisualHandle;

/// A ray in world space
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Vertical ray cast straight down onto the ground-plane point `(x, z)`.
    pub fn downward(x: f32, z: f32, from_height: f32) -> Self {
        Self {
            origin: Vec3::new(x, from_height, z),
            direction: Vec3::NEG_Y,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box of the given size whose center is `center`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Entry/exit distances of the ray through one axis slab. A ray parallel
/// to the slab is either always inside it (boundary included) or never.
fn slab(origin: f32, direction: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if direction == 0.0 {
        return (min..=max)
            .contains(&origin)
            .then_some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let inv = 1.0 / direction;
    let t1 = (min - origin) * inv;
    let t2 = (max - origin) * inv;
    Some((t1.min(t2), t1.max(t2)))
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let (x0, x1) = slab(ray.origin.x, ray.direction.x, aabb.min.x, aabb.max.x)?;
    let (y0, y1) = slab(ray.origin.y, ray.direction.y, aabb.min.y, aabb.max.y)?;
    let (z0, z1) = slab(ray.origin.z, ray.direction.z, aabb.min.z, aabb.max.z)?;

    let tmin = x0.max(y0).max(z0);
    let tmax = x1.min(y1).min(z1);

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Pick the nearest box intersected by the ray.
pub fn pick_nearest<'a>(
    ray: &Ray,
    boxes: impl IntoIterator<Item = (VisualHandle, &'a Aabb)>,
) -> Option<VisualHandle> {
    let mut best: Option<(VisualHandle, f32)> = None;

    for (handle, aabb) in boxes {
        if let Some(dist) = ray_aabb(ray, aabb) {
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((handle, dist));
            }
        }
    }

    best.map(|(handle, _)| handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: f32, height: f32, z: f32) -> Aabb {
        Aabb::from_center_size(Vec3::new(x, height * 0.5, z), Vec3::new(10.0, height, 10.0))
    }

    #[test]
    fn test_downward_ray_hits_top_face() {
        let aabb = unit_box_at(0.0, 40.0, 0.0);
        let ray = Ray::downward(1.0, 2.0, 100.0);
        let dist = ray_aabb(&ray, &aabb).unwrap();
        assert!((dist - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_downward_ray_misses_outside_footprint() {
        let aabb = unit_box_at(0.0, 40.0, 0.0);
        let ray = Ray::downward(20.0, 0.0, 100.0);
        assert!(ray_aabb(&ray, &aabb).is_none());
    }

    #[test]
    fn test_downward_ray_on_box_edge_hits() {
        let aabb = unit_box_at(0.0, 40.0, 0.0);
        for (x, z) in [(-5.0, 0.0), (5.0, 0.0), (0.0, -5.0), (5.0, 5.0)] {
            let dist = ray_aabb(&Ray::downward(x, z, 100.0), &aabb);
            assert_eq!(dist, Some(60.0), "({x}, {z})");
        }
        assert!(ray_aabb(&Ray::downward(5.001, 0.0, 100.0), &aabb).is_none());
    }

    #[test]
    fn test_pick_nearest_prefers_taller_box() {
        let low = unit_box_at(0.0, 20.0, 0.0);
        let high = unit_box_at(2.0, 80.0, 0.0);
        let ray = Ray::downward(1.0, 1.0, 500.0);
        let picked = pick_nearest(&ray, [(VisualHandle(1), &low), (VisualHandle(2), &high)]);
        assert_eq!(picked, Some(VisualHandle(2)));
    }

    #[test]
    fn test_pick_nearest_empty() {
        let ray = Ray::downward(0.0, 0.0, 500.0);
        assert!(pick_nearest(&ray, std::iter::empty::<(VisualHandle, &Aabb)>()).is_none());
    }

    #[test]
    fn test_aabb_center_and_size() {
        let aabb = unit_box_at(5.0, 30.0, -5.0);
        assert_eq!(aabb.center(), Vec3::new(5.0, 15.0, -5.0));
        assert_eq!(aabb.size(), Vec3::new(10.0, 30.0, 10.0));
    }
}
