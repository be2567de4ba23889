//! Scene gateway: how the simulation is shown, without knowing how it is drawn
//!
//! `SceneSync` mirrors the entity pools into gateway nodes once per frame. The
//! gateway only ever receives copies; it never touches `GameState`.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::assets::{AssetLibrary, Model};
use crate::settings::{GraphicsPreset, Settings};
use crate::sim::{
    BuffKind, Coin, Decoration, DecorationKind, EntityId, GameState, Item, ItemKind, Obstacle,
};

pub mod headless;

pub use headless::HeadlessScene;

/// Handle returned by the gateway
pub type NodeId = u32;

/// What a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Player,
    Obstacle,
    Coin,
    Item(ItemKind),
    Decoration(DecorationKind),
}

impl NodeKind {
    /// Library model used under the Full preset (barriers are always primitives)
    pub fn model_name(&self) -> Option<&'static str> {
        match self {
            NodeKind::Player => Some("shark"),
            NodeKind::Obstacle => None,
            NodeKind::Coin => Some("coin"),
            NodeKind::Item(ItemKind::Shield) => Some("item_shield"),
            NodeKind::Item(ItemKind::Fever) => Some("item_fever"),
            NodeKind::Decoration(DecorationKind::Rock) => Some("rock"),
            NodeKind::Decoration(DecorationKind::TropicalIsland) => Some("island_tropical"),
            NodeKind::Decoration(DecorationKind::BigIsland) => Some("island_big"),
            NodeKind::Decoration(DecorationKind::VolcanoIsland) => Some("island_volcano"),
        }
    }
}

/// Placeholder geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Nose cone pointing forward
    Cone { radius: f32, length: f32 },
    /// Two columns around a gap; the node sits at the gap centre
    Barrier {
        width: f32,
        height: f32,
        gap_height: f32,
        hole_radius: f32,
    },
    Disc { radius: f32 },
    Orb { radius: f32 },
    /// Rock or island silhouette (unit size, scaled by the node)
    Mound { peaked: bool },
}

/// How a node is drawn
#[derive(Debug, Clone, PartialEq)]
pub enum Mesh {
    Primitive { shape: Primitive, color: [f32; 4] },
    Model(Model),
}

/// Node creation request
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDesc {
    pub kind: NodeKind,
    pub mesh: Mesh,
}

/// Per-frame node state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeUpdate {
    pub pos: Vec3,
    /// Roll around the view axis (radians)
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub visible: bool,
    /// Bonus hole centre relative to the node, while still open
    pub hole_offset: Option<f32>,
}

impl NodeUpdate {
    pub fn at(pos: Vec3) -> Self {
        Self {
            pos,
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
            visible: true,
            hole_offset: None,
        }
    }
}

/// Rendering gateway
pub trait SceneGateway {
    /// The shark; created once per scene build
    fn create_player_node(&mut self, desc: &NodeDesc) -> NodeId;
    fn add_node(&mut self, desc: &NodeDesc) -> NodeId;
    fn remove_node(&mut self, id: NodeId);
    fn update_node(&mut self, id: NodeId, update: &NodeUpdate);
    /// Draw the current frame
    fn render(&mut self);
}

/// Colors for primitive placeholders
pub mod colors {
    pub const SHARK: [f32; 4] = [0.0, 0.67, 1.0, 1.0];
    pub const BARRIER: [f32; 4] = [0.35, 0.55, 0.35, 1.0];
    pub const MOVING_BARRIER: [f32; 4] = [0.75, 0.35, 0.3, 1.0];
    pub const COIN: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const SHIELD: [f32; 4] = [0.3, 0.7, 1.0, 1.0];
    pub const FEVER: [f32; 4] = [1.0, 0.5, 0.1, 1.0];
    pub const ROCK: [f32; 4] = [0.42, 0.4, 0.38, 1.0];
    pub const ISLAND: [f32; 4] = [0.93, 0.85, 0.6, 1.0];
}

fn placeholder(kind: NodeKind, obstacle: Option<&Obstacle>) -> Mesh {
    let (shape, color) = match kind {
        NodeKind::Player => (
            Primitive::Cone {
                radius: 0.3,
                length: 0.8,
            },
            colors::SHARK,
        ),
        NodeKind::Obstacle => {
            let (width, height, gap_height, hole_radius) = obstacle
                .map(|o| (o.width, o.height, o.gap_height, o.hole.map_or(0.0, |h| h.radius)))
                .unwrap_or_default();
            let color = if obstacle.is_some_and(Obstacle::is_moving) {
                colors::MOVING_BARRIER
            } else {
                colors::BARRIER
            };
            (
                Primitive::Barrier {
                    width,
                    height,
                    gap_height,
                    hole_radius,
                },
                color,
            )
        }
        NodeKind::Coin => (Primitive::Disc { radius: 0.35 }, colors::COIN),
        NodeKind::Item(ItemKind::Shield) => (Primitive::Orb { radius: 0.3 }, colors::SHIELD),
        NodeKind::Item(ItemKind::Fever) => (Primitive::Orb { radius: 0.3 }, colors::FEVER),
        NodeKind::Decoration(DecorationKind::Rock) => {
            (Primitive::Mound { peaked: true }, colors::ROCK)
        }
        NodeKind::Decoration(_) => (Primitive::Mound { peaked: false }, colors::ISLAND),
    };
    Mesh::Primitive { shape, color }
}

/// Mirrors entity pools into gateway nodes
pub struct SceneSync {
    library: AssetLibrary,
    preset: GraphicsPreset,
    player: Option<NodeId>,
    nodes: HashMap<EntityId, NodeId>,
    /// Model names already reported missing
    warned: HashSet<&'static str>,
}

impl SceneSync {
    pub fn new(library: AssetLibrary, preset: GraphicsPreset) -> Self {
        Self {
            library,
            preset,
            player: None,
            nodes: HashMap::new(),
            warned: HashSet::new(),
        }
    }

    pub fn preset(&self) -> GraphicsPreset {
        self.preset
    }

    /// Mirrored entities (the player excluded)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn mesh_for(&mut self, kind: NodeKind, obstacle: Option<&Obstacle>) -> Mesh {
        if self.preset.uses_models() {
            if let Some(name) = kind.model_name() {
                match self.library.model(name) {
                    Ok(model) => return Mesh::Model(model.clone()),
                    Err(e) => {
                        if self.warned.insert(name) {
                            log::warn!("{}; using placeholder", e);
                        }
                    }
                }
            }
        }
        placeholder(kind, obstacle)
    }

    /// Drop every node (preset switch or teardown)
    pub fn clear(&mut self, gateway: &mut impl SceneGateway) {
        if let Some(id) = self.player.take() {
            gateway.remove_node(id);
        }
        for (_, node) in self.nodes.drain() {
            gateway.remove_node(node);
        }
    }

    /// Switch presets by rebuilding every node on the next sync
    pub fn set_preset(&mut self, preset: GraphicsPreset, gateway: &mut impl SceneGateway) {
        if preset == self.preset {
            return;
        }
        log::info!("Graphics preset: {}", preset.as_str());
        self.clear(gateway);
        self.preset = preset;
    }

    fn upsert(
        &mut self,
        gateway: &mut impl SceneGateway,
        seen: &mut HashSet<EntityId>,
        id: EntityId,
        kind: NodeKind,
        obstacle: Option<&Obstacle>,
        update: NodeUpdate,
    ) {
        seen.insert(id);
        let node = match self.nodes.get(&id) {
            Some(&node) => node,
            None => {
                let desc = NodeDesc {
                    kind,
                    mesh: self.mesh_for(kind, obstacle),
                };
                let node = gateway.add_node(&desc);
                self.nodes.insert(id, node);
                node
            }
        };
        gateway.update_node(node, &update);
    }

    /// Bring the gateway in line with the state
    pub fn sync(
        &mut self,
        state: &GameState,
        settings: &Settings,
        gateway: &mut impl SceneGateway,
    ) {
        let motion = if settings.reduced_motion { 0.0 } else { 1.0 };
        let shielded = state.buffs.is_active(BuffKind::Shield);

        let player = match self.player {
            Some(node) => node,
            None => {
                let desc = NodeDesc {
                    kind: NodeKind::Player,
                    mesh: self.mesh_for(NodeKind::Player, None),
                };
                let node = gateway.create_player_node(&desc);
                self.player = Some(node);
                node
            }
        };
        let immune = state.buffs.is_active(BuffKind::Immunity);
        gateway.update_node(
            player,
            &NodeUpdate {
                rotation: state.player.tilt * motion,
                opacity: if immune { 0.6 } else { 1.0 },
                ..NodeUpdate::at(state.player.pos)
            },
        );

        let mut seen = HashSet::new();
        let player_x = state.player.pos.x;

        for (id, obs) in state.obstacles.iter() {
            self.upsert(
                gateway,
                &mut seen,
                id,
                NodeKind::Obstacle,
                Some(obs),
                obstacle_update(obs, player_x, shielded),
            );
        }
        for (id, coin) in state.coins.iter() {
            self.upsert(gateway, &mut seen, id, NodeKind::Coin, None, coin_update(coin, motion));
        }
        for (id, item) in state.items.iter() {
            self.upsert(
                gateway,
                &mut seen,
                id,
                NodeKind::Item(item.kind),
                None,
                item_update(item, motion),
            );
        }
        for (id, deco) in state.decorations.iter() {
            self.upsert(
                gateway,
                &mut seen,
                id,
                NodeKind::Decoration(deco.kind),
                None,
                decoration_update(deco),
            );
        }

        let stale: Vec<EntityId> = self
            .nodes
            .keys()
            .filter(|id| !seen.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(node) = self.nodes.remove(&id) {
                gateway.remove_node(node);
            }
        }
    }
}

fn obstacle_update(obs: &Obstacle, player_x: f32, shielded: bool) -> NodeUpdate {
    let center = obs.gap_center();
    let hole_offset = obs
        .hole
        .filter(|h| !h.collected)
        .and(obs.hole_center())
        .map(|c| c.y - center);
    NodeUpdate {
        opacity: obs.opacity(player_x, shielded),
        hole_offset,
        ..NodeUpdate::at(Vec3::new(obs.x, center, 0.0))
    }
}

fn coin_update(coin: &Coin, motion: f32) -> NodeUpdate {
    NodeUpdate {
        rotation: coin.spin * motion,
        visible: !coin.collected,
        ..NodeUpdate::at(coin.pos)
    }
}

fn item_update(item: &Item, motion: f32) -> NodeUpdate {
    NodeUpdate {
        rotation: item.spin * motion,
        scale: item.scale(),
        opacity: item.opacity(),
        ..NodeUpdate::at(item.pos)
    }
}

fn decoration_update(deco: &Decoration) -> NodeUpdate {
    NodeUpdate {
        rotation: 0.0,
        scale: deco.size,
        ..NodeUpdate::at(deco.pos)
    }
}
