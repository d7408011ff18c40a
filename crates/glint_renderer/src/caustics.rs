//! Refracted-shadow pre-pass.
//!
//! Rays are shot from every light through every refractive object. Where
//! they land on an opaque surface, the colour they picked up on the way is
//! written into a small light map for that (surface, light) pair. The main
//! pass adds those maps to the light visibility, which brightens the
//! shadow behind coloured glass.
//!
//! The pass runs before rendering and its result is read-only afterwards.

use std::collections::{HashMap, HashSet, VecDeque};

use glint_core::{RefractedShadowSettings, Texture};
use glint_math::{geometry, Color, Ray, Vec3};
use rayon::prelude::*;

use crate::Scene;

/// Refractive surfaces a light ray may cross before it is dropped.
const MAX_REFRACTIONS: u32 = 8;

/// Light maps keyed by (object index, light index).
///
/// Maps are addressed by the surface's texture coordinates, which wrap.
/// On an infinite plane a caustic therefore repeats every `uv_scale` units,
/// and the six faces of a box share one map.
#[derive(Debug, Clone, Default)]
pub struct LightMaps {
    maps: HashMap<(usize, usize), Texture>,
}

impl LightMaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map of refracted light from `light` on `object`, if any reached it.
    pub fn get(&self, object: usize, light: usize) -> Option<&Texture> {
        self.maps.get(&(object, light))
    }

    pub fn insert(&mut self, object: usize, light: usize, map: Texture) {
        self.maps.insert((object, light), map);
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

/// Refracted light arriving at one surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Deposit {
    object: usize,
    light: usize,
    uv: [f64; 2],
    color: Color,
}

/// Run the pre-pass, or return empty maps when the scene disables it.
pub fn compute_light_maps(scene: &Scene) -> LightMaps {
    match &scene.config.refracted_shadows {
        Some(settings) => compute_light_maps_with(scene, settings),
        None => LightMaps::new(),
    }
}

pub fn compute_light_maps_with(scene: &Scene, settings: &RefractedShadowSettings) -> LightMaps {
    let pairs: Vec<(usize, usize)> = (0..scene.lights.len())
        .flat_map(|light| {
            scene
                .objects
                .iter()
                .enumerate()
                .filter(|(_, object)| object.material.is_refractive())
                .map(move |(object, _)| (light, object))
        })
        .collect();

    if pairs.is_empty() {
        return LightMaps::new();
    }

    let deposits: Vec<Deposit> = pairs
        .par_iter()
        .flat_map_iter(|&(light, target)| flood_from_light(scene, settings, light, target))
        .collect();

    let size = settings.map_size.max(1);
    let weight = settings.intensity;
    let mut raw: HashMap<(usize, usize), Texture> = HashMap::new();
    for deposit in &deposits {
        let map = raw
            .entry((deposit.object, deposit.light))
            .or_insert_with(|| Texture::new(size, size));
        let (x, y) = map.texel_for(deposit.uv[0], deposit.uv[1]);
        let accumulated = map.pixel(x as i64, y as i64) + deposit.color * weight;
        map.put_pixel(x, y, accumulated);
    }

    let mut maps = LightMaps::new();
    for ((object, light), map) in raw {
        maps.insert(object, light, smooth(&map, settings.smoothing_radius));
    }

    log::info!(
        "Refracted shadows: {} pairs, {} deposits, {} light maps",
        pairs.len(),
        deposits.len(),
        maps.len()
    );
    maps
}

/// Breadth-first walk over a grid of directions around the light→object
/// axis. A direction expands to its four neighbours only while it still
/// hits `target` first.
fn flood_from_light(
    scene: &Scene,
    settings: &RefractedShadowSettings,
    light_index: usize,
    target: usize,
) -> Vec<Deposit> {
    let light = &scene.lights[light_index];
    let Some(axis) = (scene.objects[target].shape().centroid() - light.position).try_normalize()
    else {
        return Vec::new();
    };
    let (e1, e2) = geometry::orthonormal_basis(axis);
    let extent = settings.max_extent as i64;

    let mut deposits = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back((0i64, 0i64));
    visited.insert((0i64, 0i64));

    while let Some((i, j)) = queue.pop_front() {
        let direction = axis + (e1 * i as f64 + e2 * j as f64) * settings.precision;
        let ray = Ray::new(light.position, direction);

        match scene.nearest_hit(&ray) {
            Some((index, _)) if index == target => {}
            _ => continue,
        }
        if let Some(deposit) = follow_refractions(scene, ray, light_index) {
            deposits.push(deposit);
        }

        for next in [(i + 1, j), (i - 1, j), (i, j + 1), (i, j - 1)] {
            if next.0.abs() <= extent && next.1.abs() <= extent && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    deposits
}

/// Follow a light ray through refractive objects, multiplying their
/// colours, until it lands on an opaque one.
fn follow_refractions(scene: &Scene, mut ray: Ray, light: usize) -> Option<Deposit> {
    let bias = scene.config.bias;
    let mut color = Color::WHITE;
    let mut crossed = 0;

    loop {
        let (index, hit) = scene.nearest_hit(&ray)?;
        let object = &scene.objects[index];

        if !object.material.is_refractive() {
            return (crossed > 0).then(|| Deposit {
                object: index,
                light,
                uv: object.texture_coordinates_for(&hit),
                color,
            });
        }
        if crossed == MAX_REFRACTIONS {
            return None;
        }

        color = color * object.color_on(&hit);
        let direction =
            geometry::refract(ray.direction, hit.normal, object.material.refractive_index)
                .unwrap_or_else(|| geometry::reflect(ray.direction, hit.normal));
        ray = Ray::new(hit.position + direction * bias, direction);
        crossed += 1;
    }
}

/// Spread every lit cell over its neighbourhood.
///
/// A cell at distance `d` from a lit cell receives `value / (1 + d)`; the
/// per-channel maximum over all contributions wins.
fn smooth(map: &Texture, radius: u32) -> Texture {
    let mut out = map.clone();
    let r = radius as i64;
    let (w, h) = (map.width as i64, map.height as i64);

    for y in 0..h {
        for x in 0..w {
            let value = map.pixel(x, y);
            if value == Color::BLACK {
                continue;
            }
            for dy in -r..=r {
                for dx in -r..=r {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let distance = ((dx * dx + dy * dy) as f64).sqrt();
                    if distance > radius as f64 {
                        continue;
                    }
                    let spread = value / (1.0 + distance);
                    let current = out.pixel(nx, ny);
                    out.put_pixel(nx as u32, ny as u32, current.max(spread));
                }
            }
        }
    }
    out
}
