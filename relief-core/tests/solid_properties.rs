use approx::assert_relative_eq;
use nalgebra::Point3;
use proptest::prelude::*;
use relief_core::{
    extract, face_normals, heightmap_to_mesh, parse_ascii_stl, to_ascii_stl, CancelToken,
    ElevationGrid, Mesh, MeshBuilder, PixelFormat, ReliefError, ReliefParams,
};

fn build(n: usize, values: Vec<f32>, width: f32, scale: f32, base: f32) -> Mesh {
    let grid = ElevationGrid::from_values(n, values).unwrap();
    MeshBuilder::new(width, scale, base)
        .unwrap()
        .build(&grid)
        .unwrap()
}

/// Faces per section, in emission order: top, bottom, then the walls.
fn sections(n: usize) -> (usize, usize) {
    let surface = 2 * (n - 1) * (n - 1);
    (surface, 2 * surface)
}

fn check_orientation(mesh: &Mesh, n: usize) {
    let (top_end, bottom_end) = sections(n);
    for (i, normal) in face_normals(mesh).enumerate() {
        let triangle = mesh.triangle(i);
        if i < top_end {
            assert!(normal.z > 0.0, "top face {i} has normal {normal:?}");
        } else if i < bottom_end {
            assert_relative_eq!(normal.z, -1.0, epsilon = 1e-6);
        } else {
            // The footprint is centred on the origin.
            let c = triangle.centroid();
            let outward = normal.x * c.x + normal.y * c.y;
            assert!(outward >= 0.0, "wall face {i} points inward: {normal:?}");
            assert_relative_eq!(normal.z, 0.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn minimal_solid_is_a_box() {
    let mesh = build(2, vec![0.5; 4], 20.0, 10.0, 3.0);
    assert_eq!(mesh.vertices().len(), 8);
    assert_eq!(mesh.faces().len(), 12);
    assert!(mesh.is_closed_manifold());
    check_orientation(&mesh, 2);
    assert_relative_eq!(mesh.signed_volume(), 20.0 * 20.0 * 8.0, epsilon = 1e-3);
}

#[test]
fn flat_grid_gives_flat_top() {
    let (width, scale, base) = (50.0, 8.0, 1.5);
    let n = 9;
    let mesh = build(n, vec![0.5; n * n], width, scale, base);
    let top = 0.5 * scale + base;

    for v in &mesh.vertices()[..n * n] {
        assert_relative_eq!(v.z, top);
    }
    let bounds = mesh.bounds().unwrap();
    assert_relative_eq!(bounds.size().x, width, epsilon = 1e-4);
    assert_relative_eq!(bounds.size().y, width, epsilon = 1e-4);
    assert_relative_eq!(bounds.size().z, top, epsilon = 1e-4);
    assert_relative_eq!(
        mesh.signed_volume(),
        f64::from(width * width * top),
        max_relative = 1e-5
    );
}

#[test]
fn corners_are_shared_between_walls() {
    let n = 4;
    let mesh = build(n, vec![0.2; n * n], 30.0, 5.0, 1.0);
    let (_, bottom_end) = sections(n);
    let walls = &mesh.faces()[bottom_end..];
    let corner = 0u32;
    let uses = walls
        .iter()
        .filter(|face| face.contains(&corner))
        .count();
    // the front and left walls both meet at grid corner (0, 0)
    assert!(uses >= 2);
    assert!(walls.iter().flatten().all(|&v| (v as usize) < 2 * n * n));
}

#[test]
fn round_trip_preserves_normals() {
    let n = 6;
    let values: Vec<f32> = (0..n * n).map(|i| ((i * 7) % 11) as f32 / 10.0).collect();
    let mesh = build(n, values, 40.0, 6.0, 2.0);
    let stl = to_ascii_stl(&mesh, "terrain").unwrap();
    let document = parse_ascii_stl(std::str::from_utf8(&stl).unwrap()).unwrap();

    assert_eq!(document.name, "terrain");
    assert_eq!(document.facets.len(), mesh.faces().len());
    for ((facet, expected), triangle) in document
        .facets
        .iter()
        .zip(face_normals(&mesh))
        .zip(mesh.triangles())
    {
        assert_relative_eq!(facet.normal, expected, epsilon = 1e-4);
        for (read, written) in facet.vertices.iter().zip(triangle.vertices.iter()) {
            assert_eq!(read, written);
        }
    }
}

#[test]
fn rgba_image_through_pipeline() {
    let n = 4;
    let mut pixels = Vec::with_capacity(n * n * 4);
    for i in 0..n * n {
        let v = (i * 17) as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }
    let params = ReliefParams::default()
        .with_resolution(n)
        .with_width_mm(60.0)
        .with_invert(true);
    let mesh = heightmap_to_mesh(&pixels, PixelFormat::Rgba, &params, &CancelToken::none())
        .unwrap();
    assert!(mesh.is_closed_manifold());

    // Darkest pixel is highest when inverted.
    assert_relative_eq!(
        mesh.vertices()[0].z,
        params.height_scale_mm + params.base_thickness_mm,
        epsilon = 1e-4
    );
    assert_eq!(mesh.vertices()[n * n], Point3::new(-30.0, -30.0, 0.0));
}

#[test]
fn invalid_inputs() {
    for resolution in [0, 1] {
        let params = ReliefParams::default().with_resolution(resolution);
        let err = heightmap_to_mesh(&[], PixelFormat::Gray, &params, &CancelToken::none())
            .unwrap_err();
        assert!(matches!(err, ReliefError::Configuration { .. }));
    }

    let grid = ElevationGrid::from_values(2, vec![0.0, f32::NAN, 0.0, 0.0]).unwrap();
    let err = MeshBuilder::from_params(&ReliefParams::default())
        .unwrap()
        .build(&grid)
        .unwrap_err();
    assert!(matches!(err, ReliefError::InvalidGeometry { .. }));

    let err = extract(&[0; 10], 2, PixelFormat::Rgb, false).unwrap_err();
    assert!(matches!(
        err,
        ReliefError::BufferSizeMismatch {
            expected: 12,
            actual: 10
        }
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_grid_builds_a_closed_solid(
        n in 2usize..12,
        seed in prop::collection::vec(0.0f32..=1.0, 144),
        width in 1.0f32..200.0,
        scale in 0.0f32..50.0,
        base in 0.1f32..10.0,
    ) {
        let values = seed[..n * n].to_vec();
        let mesh = build(n, values, width, scale, base);

        prop_assert_eq!(mesh.vertices().len(), 2 * n * n);
        prop_assert_eq!(mesh.faces().len(), 4 * (n - 1) * (n - 1) + 8 * (n - 1));
        prop_assert!(mesh.is_closed_manifold());
        prop_assert!(mesh.signed_volume() > 0.0);
        check_orientation(&mesh, n);
    }
}
