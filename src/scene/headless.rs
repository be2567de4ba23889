//! Scene gateway that keeps nodes in memory and draws nothing

use std::collections::BTreeMap;

use glam::Vec3;

use super::{NodeDesc, NodeId, NodeKind, NodeUpdate, SceneGateway};

/// Records gateway calls; used by tests and the native binary
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: BTreeMap<NodeId, (NodeDesc, NodeUpdate)>,
    next_id: NodeId,
    pub players_created: usize,
    pub removed: usize,
    pub frames: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&(NodeDesc, NodeUpdate)> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeDesc, &NodeUpdate)> {
        self.nodes.values().map(|(desc, update)| (desc, update))
    }

    /// Last update of the shark node
    pub fn player(&self) -> Option<&NodeUpdate> {
        self.nodes()
            .find(|(desc, _)| desc.kind == NodeKind::Player)
            .map(|(_, update)| update)
    }

    fn insert(&mut self, desc: &NodeDesc) -> NodeId {
        self.next_id += 1;
        self.nodes
            .insert(self.next_id, (desc.clone(), NodeUpdate::at(Vec3::ZERO)));
        self.next_id
    }
}

impl SceneGateway for HeadlessScene {
    fn create_player_node(&mut self, desc: &NodeDesc) -> NodeId {
        self.players_created += 1;
        self.insert(desc)
    }

    fn add_node(&mut self, desc: &NodeDesc) -> NodeId {
        self.insert(desc)
    }

    fn remove_node(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_some() {
            self.removed += 1;
        } else {
            log::warn!("Removing unknown node {}", id);
        }
    }

    fn update_node(&mut self, id: NodeId, update: &NodeUpdate) {
        if let Some((_, current)) = self.nodes.get_mut(&id) {
            *current = *update;
        }
    }

    fn render(&mut self) {
        self.frames += 1;
    }
}
