//! Shape generation for 2D primitives and library models

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::assets::{Model, ModelPart, PartShape};
use crate::scene::Primitive;

/// Where and how a node is placed on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub pos: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Transform {
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.pos + Vec2::from_angle(self.rotation).rotate(local * self.scale)
    }

    fn tint(&self, color: [f32; 4]) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * self.opacity]
    }
}

/// Blend a color toward the haze for distant scenery
pub fn fade(color: [f32; 4], amount: f32) -> [f32; 4] {
    let t = amount.clamp(0.0, 1.0);
    let mix = |a: f32, b: f32| a + (b - a) * t;
    [
        mix(color[0], colors::HAZE[0]),
        mix(color[1], colors::HAZE[1]),
        mix(color[2], colors::HAZE[2]),
        color[3],
    ]
}

fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.extend([a, b, c].map(|p| Vertex::at(p, color)));
}

/// Axis-aligned world rectangle (no transform)
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let (a, b, c, d) = (
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    );
    push_triangle(&mut vertices, a, b, c, color);
    push_triangle(&mut vertices, a, c, d, color);
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let t = Transform {
        pos: center,
        rotation: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    ellipse(&mut vertices, &t, Vec2::ZERO, Vec2::splat(radius), color, segments);
    vertices
}

fn ellipse(
    out: &mut Vec<Vertex>,
    t: &Transform,
    center: Vec2,
    radii: Vec2,
    color: [f32; 4],
    segments: u32,
) {
    let color = t.tint(color);
    let c = t.apply(center);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let p1 = center + Vec2::new(radii.x * theta1.cos(), radii.y * theta1.sin());
        let p2 = center + Vec2::new(radii.x * theta2.cos(), radii.y * theta2.sin());
        push_triangle(out, c, t.apply(p1), t.apply(p2), color);
    }
}

fn local_rect(out: &mut Vec<Vertex>, t: &Transform, center: Vec2, half: Vec2, color: [f32; 4]) {
    let color = t.tint(color);
    let a = t.apply(center + Vec2::new(-half.x, -half.y));
    let b = t.apply(center + Vec2::new(half.x, -half.y));
    let c = t.apply(center + Vec2::new(half.x, half.y));
    let d = t.apply(center + Vec2::new(-half.x, half.y));
    push_triangle(out, a, b, c, color);
    push_triangle(out, a, c, d, color);
}

/// Triangle with its base centred on `base_center` and apex at `base_center + apex`
fn spike(
    out: &mut Vec<Vertex>,
    t: &Transform,
    base_center: Vec2,
    apex: Vec2,
    half_base: f32,
    color: [f32; 4],
) {
    let side = apex.normalize_or(Vec2::Y).perp() * half_base;
    push_triangle(
        out,
        t.apply(base_center - side),
        t.apply(base_center + side),
        t.apply(base_center + apex),
        t.tint(color),
    );
}

fn part(out: &mut Vec<Vertex>, t: &Transform, part: &ModelPart) {
    let offset = Vec2::from(part.offset);
    let size = Vec2::from(part.size);
    match part.shape {
        PartShape::Rect => local_rect(out, t, offset, size, part.color),
        PartShape::Circle => ellipse(out, t, offset, size, part.color, 16),
        PartShape::Triangle => spike(out, t, offset, size, part.base, part.color),
    }
}

/// All parts of a library model
pub fn model(model: &Model, t: &Transform) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for p in &model.parts {
        part(&mut vertices, t, p);
    }
    vertices
}

/// Placeholder geometry for a node
pub fn primitive(
    shape: &Primitive,
    color: [f32; 4],
    t: &Transform,
    hole_offset: Option<f32>,
) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    match *shape {
        Primitive::Cone { radius, length } => {
            spike(
                &mut vertices,
                t,
                Vec2::new(-length / 2.0, 0.0),
                Vec2::new(length, 0.0),
                radius,
                color,
            );
        }
        Primitive::Barrier {
            width,
            height,
            gap_height,
            hole_radius,
        } => {
            let half_w = width / 2.0;
            let column = height / 2.0;
            let gap = gap_height / 2.0;
            local_rect(
                &mut vertices,
                t,
                Vec2::new(0.0, gap + column / 2.0),
                Vec2::new(half_w, column / 2.0),
                color,
            );
            local_rect(
                &mut vertices,
                t,
                Vec2::new(0.0, -gap - column / 2.0),
                Vec2::new(half_w, column / 2.0),
                color,
            );
            if let Some(dy) = hole_offset {
                local_rect(
                    &mut vertices,
                    t,
                    Vec2::new(0.0, dy),
                    Vec2::splat(hole_radius),
                    colors::HOLE,
                );
            }
        }
        Primitive::Disc { radius } | Primitive::Orb { radius } => {
            // Spin squashes the disc edge-on
            let squash = t.rotation.cos().abs().max(0.15);
            let flat = Transform { rotation: 0.0, ..*t };
            ellipse(
                &mut vertices,
                &flat,
                Vec2::ZERO,
                Vec2::new(radius * squash, radius),
                color,
                20,
            );
        }
        Primitive::Mound { peaked } => {
            let apex = if peaked { 1.0 } else { 0.4 };
            let flat = Transform { rotation: 0.0, ..*t };
            spike(&mut vertices, &flat, Vec2::ZERO, Vec2::new(0.0, apex), 0.5, color);
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_rotates_and_scales() {
        let t = Transform {
            pos: Vec2::new(1.0, 2.0),
            rotation: PI / 2.0,
            scale: 2.0,
            opacity: 0.5,
        };
        let p = t.apply(Vec2::new(1.0, 0.0));
        assert!((p - Vec2::new(1.0, 4.0)).length() < 1e-5);
        assert_eq!(t.tint([1.0, 1.0, 1.0, 1.0])[3], 0.5);
    }

    #[test]
    fn test_barrier_draws_hole_only_when_open() {
        let shape = Primitive::Barrier {
            width: 1.5,
            height: 30.0,
            gap_height: 2.0,
            hole_radius: 0.35,
        };
        let t = Transform {
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
        };
        assert_eq!(primitive(&shape, [1.0; 4], &t, None).len(), 12);
        assert_eq!(primitive(&shape, [1.0; 4], &t, Some(-2.0)).len(), 18);
    }
}
