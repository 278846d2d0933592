//! # Primitive Shape Generation
//!
//! Functions to generate the primitive shapes used by the robot rig and the
//! ground plane. Shapes are centered at the origin with outward normals.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box with the given edge lengths
///
/// Each face carries its own four vertices so that face normals stay sharp.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face (+Z)
        [-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z],
        // Back face (-Z)
        [-x, -y, -z], [-x,  y, -z], [ x,  y, -z], [ x, -y, -z],
        // Left face (-X)
        [-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z],
        // Right face (+X)
        [ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z],
        // Top face (+Y)
        [-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z],
        // Bottom face (-Y)
        [-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z],
    ];

    #[rustfmt::skip]
    let face_normals = [
        [ 0.0,  0.0,  1.0],
        [ 0.0,  0.0, -1.0],
        [-1.0,  0.0,  0.0],
        [ 1.0,  0.0,  0.0],
        [ 0.0,  1.0,  0.0],
        [ 0.0, -1.0,  0.0],
    ];

    data.positions = positions.to_vec();
    for normal in face_normals {
        for _ in 0..4 {
            data.normals.push(normal);
        }
    }

    for face in 0..6u32 {
        let base = face * 4;
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere of the given radius
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (min 3)
/// * `latitude_segments` - Number of horizontal segments (min 2)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 at the north pole
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.positions.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices
                .extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}

/// Generate a cone along the Y axis, apex up
///
/// The apex sits at +height/2 and the base ring at -height/2. Apex vertices
/// are duplicated per segment so the slanted side normals stay smooth around
/// the circumference without averaging across the tip.
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side surface: normal of a cone flank is (cos a, radius/height, sin a) normalized
    let slope = radius / height;
    let inv_len = 1.0 / (1.0 + slope * slope).sqrt();
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();

        let normal = [cos_a * inv_len, slope * inv_len, sin_a * inv_len];

        // Base-ring vertex, then the apex duplicated with the same normal
        data.positions
            .push([radius * cos_a, -half_height, radius * sin_a]);
        data.normals.push(normal);

        data.positions.push([0.0, half_height, 0.0]);
        data.normals.push(normal);
    }

    for i in 0..segs {
        let base = i * 2;
        let apex = base + 1;
        let base_next = base + 2;
        data.indices.extend_from_slice(&[base, apex, base_next]);
    }

    // Base cap, facing -Y
    let cap_start = data.positions.len() as u32;
    data.positions.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        data.positions
            .push([radius * angle.cos(), -half_height, radius * angle.sin()]);
        data.normals.push([0.0, -1.0, 0.0]);
    }

    for i in 0..segs {
        data.indices
            .extend_from_slice(&[cap_start, cap_start + 1 + i, cap_start + 2 + i]);
    }

    data
}

/// Generate a flat rectangle in the XY plane with its normal on +Z
///
/// Lay it flat on the ground by rotating the owning node -90 degrees about X.
pub fn generate_plane(width: f32, height: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (x, y) = (width * 0.5, height * 0.5);

    data.positions = vec![[-x, -y, 0.0], [x, -y, 0.0], [x, y, 0.0], [-x, y, 0.0]];
    data.normals = vec![[0.0, 0.0, 1.0]; 4];
    data.indices = vec![0, 1, 2, 2, 3, 0];

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let cube = generate_box(4.0, 8.0, 1.2);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.triangle_count(), 12);

        // Dimensions are honored on every axis
        let max_y = cube
            .positions
            .iter()
            .map(|p| p[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_y, 4.0);
        let max_z = cube
            .positions
            .iter()
            .map(|p| p[2])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_z, 0.6);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(1.3, 32, 32);
        assert!(!sphere.indices.is_empty());
        assert_eq!(sphere.positions.len(), sphere.normals.len());

        // Every vertex sits on the requested radius
        for p in &sphere.positions {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 1.3).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cone_generation() {
        let cone = generate_cone(0.5, 3.0, 32);

        // Apex at +h/2, base ring at -h/2
        let max_y = cone
            .positions
            .iter()
            .map(|p| p[1])
            .fold(f32::MIN, f32::max);
        let min_y = cone
            .positions
            .iter()
            .map(|p| p[1])
            .fold(f32::MAX, f32::min);
        assert_eq!(max_y, 1.5);
        assert_eq!(min_y, -1.5);

        // side triangles + cap triangles
        assert_eq!(cone.triangle_count(), 64);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(40.0, 30.0);
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.triangle_count(), 2);
        assert!(plane.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }
}
