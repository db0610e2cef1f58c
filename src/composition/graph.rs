//! Parent/child forest over named layers
//!
//! Layer names are resolved to integer ids once at construction. Parent
//! links that cannot be resolved promote the layer to a root, and links
//! that would close a cycle are cut by a coloring pass before depths are
//! computed, so every query afterwards is a plain lookup.

use crate::composition::layer::Layer;
use std::collections::HashMap;

/// Layer whose parent name did not resolve
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingParent {
    /// Layer that was promoted to a root
    pub layer: String,
    /// Parent name that matched no layer
    pub missing_parent: String,
}

/// Parent link removed because it closed a cycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokenLink {
    /// Layer that was promoted to a root
    pub child: String,
    /// Parent the link pointed at
    pub parent: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Resolved layer forest with precomputed depths
#[derive(Clone, Debug)]
pub struct LayerGraph<'a> {
    nodes: Vec<&'a Layer>,
    index: HashMap<&'a str, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    depths: Vec<usize>,
    dangling: Vec<DanglingParent>,
    broken: Vec<BrokenLink>,
    duplicates: Vec<String>,
}

/// Build the forest for a flat list of layers
pub fn build_forest(layers: &[Layer]) -> LayerGraph<'_> {
    LayerGraph::new(layers)
}

impl<'a> LayerGraph<'a> {
    /// Resolve parents, cut cycles and compute depths
    ///
    /// Later layers reusing an earlier name are ignored and reported
    /// through [`LayerGraph::duplicate_names`].
    pub fn new(layers: &'a [Layer]) -> Self {
        let mut nodes = Vec::with_capacity(layers.len());
        let mut index = HashMap::with_capacity(layers.len());
        let mut duplicates = Vec::new();

        for layer in layers {
            if index.contains_key(layer.name.as_str()) {
                tracing::warn!(layer = %layer.name, "duplicate layer name ignored");
                duplicates.push(layer.name.clone());
                continue;
            }
            index.insert(layer.name.as_str(), nodes.len());
            nodes.push(layer);
        }

        let mut dangling = Vec::new();
        let mut parents: Vec<Option<usize>> = nodes
            .iter()
            .map(|layer| {
                let name = layer.parent_name()?;
                let resolved = index.get(name).copied();
                if resolved.is_none() {
                    tracing::warn!(
                        layer = %layer.name,
                        parent = name,
                        "parent layer not found, treating as root"
                    );
                    dangling.push(DanglingParent {
                        layer: layer.name.clone(),
                        missing_parent: name.to_string(),
                    });
                }
                resolved
            })
            .collect();

        let broken = cut_cycles(&nodes, &mut parents);

        let mut children = vec![Vec::new(); nodes.len()];
        for (id, parent) in parents.iter().enumerate() {
            if let Some(children_of_parent) = parent.and_then(|p| children.get_mut(p)) {
                children_of_parent.push(id);
            }
        }

        let depths = compute_depths(&parents);

        Self {
            nodes,
            index,
            parents,
            children,
            depths,
            dangling,
            broken,
            duplicates,
        }
    }

    /// Number of distinct layers
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Test whether the forest has no layers
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root layer names in input order
    pub fn roots(&self) -> Vec<&'a str> {
        self.nodes
            .iter()
            .zip(&self.parents)
            .filter(|(_, parent)| parent.is_none())
            .map(|(layer, _)| layer.name.as_str())
            .collect()
    }

    /// Distance from a layer to its root, `None` for unknown names
    pub fn depth_of(&self, name: &str) -> Option<usize> {
        let id = self.index.get(name)?;
        self.depths.get(*id).copied()
    }

    /// Resolved parent name
    pub fn parent_of(&self, name: &str) -> Option<&'a str> {
        let id = self.index.get(name)?;
        let parent = (*self.parents.get(*id)?)?;
        self.nodes.get(parent).map(|layer| layer.name.as_str())
    }

    /// Child layer names in input order
    pub fn children_of(&self, name: &str) -> Vec<&'a str> {
        self.index
            .get(name)
            .and_then(|id| self.children.get(*id))
            .map(|ids| {
                ids.iter()
                    .filter_map(|child| self.nodes.get(*child))
                    .map(|layer| layer.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up a layer by name
    pub fn layer(&self, name: &str) -> Option<&'a Layer> {
        self.index
            .get(name)
            .and_then(|id| self.nodes.get(*id))
            .copied()
    }

    /// Layers with at least one trait, by ascending depth
    ///
    /// The sort is stable: layers at equal depth keep their input order.
    /// This order drives both z-index assignment and the column order of
    /// combination enumeration.
    pub fn ordered_sequence(&self) -> Vec<&'a Layer> {
        let mut active: Vec<(usize, &'a Layer)> = self
            .nodes
            .iter()
            .zip(&self.depths)
            .filter(|(layer, _)| layer.has_traits())
            .map(|(layer, depth)| (*depth, *layer))
            .collect();
        active.sort_by_key(|(depth, _)| *depth);
        active.into_iter().map(|(_, layer)| layer).collect()
    }

    /// Layers promoted to roots because their parent was missing
    pub fn dangling_parents(&self) -> &[DanglingParent] {
        &self.dangling
    }

    /// Parent links cut to break cycles
    pub fn broken_cycles(&self) -> &[BrokenLink] {
        &self.broken
    }

    /// Names that appeared more than once
    pub fn duplicate_names(&self) -> &[String] {
        &self.duplicates
    }
}

// Every node has at most one parent, so each walk is a simple path that
// either ends at a root, joins an already finished path, or runs into itself.
fn cut_cycles(nodes: &[&Layer], parents: &mut [Option<usize>]) -> Vec<BrokenLink> {
    let mut colors = vec![Color::White; nodes.len()];
    let mut broken = Vec::new();

    for start in 0..nodes.len() {
        if colors.get(start) != Some(&Color::White) {
            continue;
        }

        let mut path = Vec::new();
        let mut current = start;
        loop {
            if let Some(color) = colors.get_mut(current) {
                *color = Color::Gray;
            }
            path.push(current);

            let Some(parent) = parents.get(current).copied().flatten() else {
                break;
            };
            match colors.get(parent) {
                Some(Color::White) => current = parent,
                Some(Color::Gray) => {
                    if let (Some(child), Some(target)) = (nodes.get(current), nodes.get(parent)) {
                        tracing::warn!(
                            layer = %child.name,
                            parent = %target.name,
                            "layer parent cycle detected, cutting link"
                        );
                        broken.push(BrokenLink {
                            child: child.name.clone(),
                            parent: target.name.clone(),
                        });
                    }
                    if let Some(link) = parents.get_mut(current) {
                        *link = None;
                    }
                    break;
                }
                _ => break,
            }
        }

        for id in path {
            if let Some(color) = colors.get_mut(id) {
                *color = Color::Black;
            }
        }
    }

    broken
}

// Requires an acyclic parent table
fn compute_depths(parents: &[Option<usize>]) -> Vec<usize> {
    let mut depths: Vec<Option<usize>> = vec![None; parents.len()];

    for start in 0..parents.len() {
        let mut path = Vec::new();
        let mut current = start;
        let base = loop {
            if let Some(known) = depths.get(current).copied().flatten() {
                break known + 1;
            }
            path.push(current);
            match parents.get(current).copied().flatten() {
                Some(parent) => current = parent,
                None => break 0,
            }
        };

        // `path` runs child to ancestor; assign from the top down
        for (offset, id) in path.iter().rev().enumerate() {
            if let Some(depth) = depths.get_mut(*id) {
                *depth = Some(base + offset);
            }
        }
    }

    depths.into_iter().map(Option::unwrap_or_default).collect()
}
