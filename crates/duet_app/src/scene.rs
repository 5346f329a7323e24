//! Stage scene composition: metal ground disc, lights, camera and its orbit
//! controls.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::path::Path;

use duet_core::StageConfig;
use duet_core::config::{CameraConfig, GroundConfig, LightingConfig};
use glam::{Quat, Vec3, Vec4};
use myth::prelude::*;
use myth::resources::geometry::{Attribute, Geometry};
use wgpu::VertexFormat;

/// Vertex data of a flat disc in the XY plane facing +Z.
///
/// Vertex 0 is the centre; the rim repeats its first vertex so the UV seam
/// stays continuous.
#[derive(Debug, Clone, Default)]
pub struct DiscMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

#[must_use]
pub fn disc_mesh(radius: f32, segments: u32) -> DiscMesh {
    let segments = segments.max(3);
    let mut mesh = DiscMesh::default();

    mesh.positions.push([0.0, 0.0, 0.0]);
    mesh.normals.push([0.0, 0.0, 1.0]);
    mesh.uvs.push([0.5, 0.5]);

    for i in 0..=segments {
        let angle = i as f32 / segments as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        mesh.positions.push([radius * cos, radius * sin, 0.0]);
        mesh.normals.push([0.0, 0.0, 1.0]);
        mesh.uvs.push([(cos + 1.0) / 2.0, 1.0 - (sin + 1.0) / 2.0]);
    }

    for i in 1..=segments {
        mesh.indices.push(0);
        mesh.indices.push(i as u16);
        mesh.indices.push((i + 1) as u16);
    }

    mesh
}

#[must_use]
pub fn create_disc(radius: f32, segments: u32) -> Geometry {
    let mesh = disc_mesh(radius, segments);

    let mut geo = Geometry::new();
    geo.set_attribute(
        "position",
        Attribute::new_planar(&mesh.positions, VertexFormat::Float32x3),
    );
    geo.set_attribute(
        "normal",
        Attribute::new_planar(&mesh.normals, VertexFormat::Float32x3),
    );
    geo.set_attribute("uv", Attribute::new_planar(&mesh.uvs, VertexFormat::Float32x2));
    geo.set_indices(&mesh.indices);
    geo.compute_bounding_volume();
    geo
}

/// Creates the active scene and fills it with everything except the avatars.
/// The scene is handed back so the caller can add the avatar rigs.
pub fn compose<'e>(engine: &'e mut Engine, config: &StageConfig, aspect: f32) -> &'e mut Scene {
    let ground_material = ground_material(&mut engine.assets, &config.ground);
    let geometry = engine
        .assets
        .geometries
        .add(create_disc(config.ground.radius, config.ground.segments));
    let material = engine.assets.materials.add(ground_material);

    let scene = engine.scene_manager.create_active();

    add_lights(scene, &config.lighting);

    let ground = scene.add_mesh(Mesh::new(geometry, material));
    let center = config.ground.center;
    scene
        .node(&ground)
        .set_position(center.x, center.y, center.z)
        .set_rotation(Quat::from_rotation_x(-FRAC_PI_2))
        .set_cast_shadows(false)
        .set_receive_shadows(true);

    add_camera(scene, &config.camera, aspect);
    scene
}

/// Orbit controls around the configured target.
///
/// The config's `zoom_speed` is on a 0 to 10 scale; the controls take the
/// distance fraction removed per wheel notch.
#[must_use]
pub fn orbit_controls(camera: &CameraConfig) -> OrbitControls {
    let mut controls = OrbitControls::new(camera.position, camera.target);
    controls.enable_rotate = camera.enable_rotate;
    controls.enable_zoom = camera.enable_zoom;
    controls.enable_pan = camera.enable_pan;
    controls.rotate_speed = camera.rotate_speed;
    controls.zoom_speed = (camera.zoom_speed * 0.1).clamp(0.0, 0.9);
    controls
}

fn add_lights(scene: &mut Scene, lighting: &LightingConfig) {
    scene
        .environment
        .set_ambient_color(Vec3::splat(lighting.ambient_intensity));

    let mut sun = Light::new_directional(Vec3::ONE, lighting.sun_intensity);
    sun.cast_shadows = lighting.cast_shadows;
    if let Some(shadow) = sun.shadow.as_mut() {
        shadow.map_size = lighting.shadow_map_size;
    }
    let handle = scene.add_light(sun);
    let p = lighting.sun_position;
    scene
        .node(&handle)
        .set_position(p.x, p.y, p.z)
        .look_at(Vec3::ZERO);
}

fn add_camera(scene: &mut Scene, camera: &CameraConfig, aspect: f32) {
    let handle = scene.add_camera(Camera::new_perspective(camera.fov, aspect, camera.near));
    let p = camera.position;
    scene
        .node(&handle)
        .set_position(p.x, p.y, p.z)
        .look_at(camera.target);
    scene.active_camera = Some(handle);
}

fn ground_material(assets: &mut AssetServer, ground: &GroundConfig) -> PhysicalMaterial {
    let mut material = PhysicalMaterial::new(Vec4::ONE);
    material.set_roughness(ground.roughness);
    material.set_metalness(ground.metalness);

    if let Some(map) = load_map(assets, &ground.diffuse_map, ColorSpace::Srgb) {
        material.set_map(Some(map));
    }
    if let Some(map) = load_map(assets, &ground.normal_map, ColorSpace::Linear) {
        material.set_normal_map(Some(map));
    }
    if let Some(map) = load_map(assets, &ground.ao_map, ColorSpace::Linear) {
        material.set_ao_map(Some(map));
    }
    if let Some(map) = load_map(assets, &ground.roughness_map, ColorSpace::Linear) {
        material.set_roughness_map(Some(map));
    }
    material
}

/// A missing texture leaves the ground untextured rather than failing startup.
fn load_map(assets: &mut AssetServer, path: &Path, color_space: ColorSpace) -> Option<TextureHandle> {
    match assets.load_texture(path, color_space, true) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Failed to load ground texture {}: {e}", path.display());
            None
        }
    }
}
