//! WebGPU rendering module
//!
//! A side view of the scene: world x to the right, height up. Depth (z) only
//! orders nodes and fades distant scenery toward the haze.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

use std::collections::BTreeMap;

use glam::Vec2;

pub use pipeline::RenderState;
use shapes::Transform;
use vertex::{Vertex, colors};

use crate::consts::{GROUND_Y, PLAY_HEIGHT};
use crate::scene::{Mesh, NodeDesc, NodeId, NodeKind, NodeUpdate, SceneGateway};

/// Camera never dips below this centre height (keeps the sea in view)
const MIN_CAMERA_Y: f32 = PLAY_HEIGHT / 2.0;

/// Draw order: far scenery first, the shark last
fn layer(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Decoration(_) => 0,
        NodeKind::Obstacle => 1,
        NodeKind::Coin | NodeKind::Item(_) => 2,
        NodeKind::Player => 3,
    }
}

/// Build the vertices for one node
pub fn node_vertices(desc: &NodeDesc, update: &NodeUpdate) -> Vec<Vertex> {
    if !update.visible || update.opacity <= 0.0 {
        return Vec::new();
    }
    // Nodes further from the sea lane shrink toward the horizon
    let depth = 1.0 / (1.0 + update.pos.z.abs() * 0.08);
    let t = Transform {
        pos: Vec2::new(update.pos.x * depth, update.pos.y),
        rotation: update.rotation,
        scale: update.scale * depth,
        opacity: update.opacity,
    };
    let haze = 1.0 - depth;
    match &desc.mesh {
        Mesh::Primitive { shape, color } => {
            shapes::primitive(shape, shapes::fade(*color, haze), &t, update.hole_offset)
        }
        Mesh::Model(model) => {
            let mut vertices = shapes::model(model, &t);
            for v in &mut vertices {
                v.color = shapes::fade(v.color, haze);
            }
            vertices
        }
    }
}

/// Scene gateway backed by the WebGPU pipeline
pub struct WgpuScene {
    render_state: Option<RenderState>,
    nodes: BTreeMap<NodeId, (NodeDesc, NodeUpdate)>,
    player: Option<NodeId>,
    next_id: NodeId,
}

impl Default for WgpuScene {
    fn default() -> Self {
        Self::new()
    }
}

impl WgpuScene {
    /// Nodes are tracked right away; drawing starts once a surface is attached
    pub fn new() -> Self {
        Self {
            render_state: None,
            nodes: BTreeMap::new(),
            player: None,
            next_id: 0,
        }
    }

    pub fn attach(&mut self, render_state: RenderState) {
        self.render_state = Some(render_state);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(rs) = self.render_state.as_mut() {
            rs.resize(width, height);
        }
    }

    fn insert(&mut self, desc: &NodeDesc) -> NodeId {
        self.next_id += 1;
        self.nodes
            .insert(self.next_id, (desc.clone(), NodeUpdate::at(glam::Vec3::ZERO)));
        self.next_id
    }

    /// Camera centre: follow the shark, keep the sea in view
    fn camera(&self) -> Vec2 {
        let y = self
            .player
            .and_then(|id| self.nodes.get(&id))
            .map(|(_, u)| u.pos.y)
            .unwrap_or(MIN_CAMERA_Y);
        Vec2::new(0.0, y.max(MIN_CAMERA_Y))
    }

    /// Backdrop plus every node, back to front
    pub fn build_vertices(&self) -> Vec<Vertex> {
        let camera = self.camera();
        let mut vertices = shapes::rect(
            Vec2::new(camera.x - 50.0, camera.y - 50.0),
            Vec2::new(camera.x + 50.0, GROUND_Y),
            colors::SEA,
        );
        vertices.extend(shapes::rect(
            Vec2::new(camera.x - 50.0, GROUND_Y - 0.05),
            Vec2::new(camera.x + 50.0, GROUND_Y + 0.05),
            colors::FOAM,
        ));

        let mut order: Vec<&(NodeDesc, NodeUpdate)> = self.nodes.values().collect();
        order.sort_by(|a, b| {
            layer(a.0.kind)
                .cmp(&layer(b.0.kind))
                .then(b.1.pos.z.abs().total_cmp(&a.1.pos.z.abs()))
        });
        for (desc, update) in order {
            vertices.extend(node_vertices(desc, update));
        }
        vertices
    }
}

impl SceneGateway for WgpuScene {
    fn create_player_node(&mut self, desc: &NodeDesc) -> NodeId {
        let id = self.insert(desc);
        self.player = Some(id);
        id
    }

    fn add_node(&mut self, desc: &NodeDesc) -> NodeId {
        self.insert(desc)
    }

    fn remove_node(&mut self, id: NodeId) {
        self.nodes.remove(&id);
        if self.player == Some(id) {
            self.player = None;
        }
    }

    fn update_node(&mut self, id: NodeId, update: &NodeUpdate) {
        if let Some((_, current)) = self.nodes.get_mut(&id) {
            *current = *update;
        }
    }

    fn render(&mut self) {
        let vertices = self.build_vertices();
        let camera = self.camera();
        let Some(rs) = self.render_state.as_mut() else {
            return;
        };
        rs.camera = camera;
        match rs.render(&vertices) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => rs.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Primitive, colors as palette};
    use glam::Vec3;

    fn disc() -> NodeDesc {
        NodeDesc {
            kind: NodeKind::Coin,
            mesh: Mesh::Primitive {
                shape: Primitive::Disc { radius: 0.35 },
                color: palette::COIN,
            },
        }
    }

    #[test]
    fn test_hidden_nodes_draw_nothing() {
        let update = NodeUpdate {
            visible: false,
            ..NodeUpdate::at(Vec3::ZERO)
        };
        assert!(node_vertices(&disc(), &update).is_empty());
        assert!(!node_vertices(&disc(), &NodeUpdate::at(Vec3::ZERO)).is_empty());
    }

    #[test]
    fn test_scene_without_surface_tracks_nodes() {
        let mut scene = WgpuScene::new();
        let player = scene.create_player_node(&disc());
        let coin = scene.add_node(&disc());
        scene.update_node(player, &NodeUpdate::at(Vec3::new(0.0, 12.0, 0.0)));
        assert_eq!(scene.camera().y, 12.0);

        scene.remove_node(coin);
        scene.render();
        assert_eq!(scene.nodes.len(), 1);
        scene.remove_node(player);
        assert_eq!(scene.camera().y, MIN_CAMERA_Y);
    }
}
