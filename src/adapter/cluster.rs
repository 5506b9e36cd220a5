//! Grid clusterer used when decluttering is enabled.
//!
//! Markers are bucketed into fixed-size cells in world-pixel space at the
//! current zoom, so clusters dissolve naturally as the map zooms in.

use crate::adapter::marker::MarkerId;
use crate::core::constants::CLUSTER_GRID_SIZE;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::prelude::HashMap;

/// One cluster cell: its representative center and member markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterCell {
    pub center: LatLng,
    pub members: Vec<MarkerId>,
}

impl ClusterCell {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

/// Groups markers into grid cells instead of rendering each individually.
pub struct Clusterer {
    grid_size: f64,
    entries: Vec<(MarkerId, LatLng)>,
}

impl Clusterer {
    pub fn new() -> Self {
        Self::with_grid_size(CLUSTER_GRID_SIZE)
    }

    pub fn with_grid_size(grid_size: f64) -> Self {
        Self {
            grid_size,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, id: MarkerId, position: LatLng) {
        self.entries.push((id, position));
    }

    pub fn add_batch<I>(&mut self, markers: I)
    where
        I: IntoIterator<Item = (MarkerId, LatLng)>,
    {
        self.entries.extend(markers);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the clustered set wholesale, used after marker removals.
    pub fn rebuild<I>(&mut self, markers: I)
    where
        I: IntoIterator<Item = (MarkerId, LatLng)>,
    {
        self.entries.clear();
        self.entries.extend(markers);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buckets the clustered markers into grid cells at the given zoom.
    /// Cell order is deterministic: first-marker insertion order.
    pub fn clusters(&self, zoom: f64) -> Vec<ClusterCell> {
        let mut index: HashMap<(i64, i64), usize> = HashMap::default();
        let mut cells: Vec<(LatLngBounds, Vec<MarkerId>)> = Vec::new();

        for (id, position) in &self.entries {
            let pixel = position.to_world_pixel(zoom);
            let key = (
                (pixel.x / self.grid_size).floor() as i64,
                (pixel.y / self.grid_size).floor() as i64,
            );
            match index.get(&key) {
                Some(&slot) => {
                    let (bounds, members) = &mut cells[slot];
                    bounds.extend(position);
                    members.push(*id);
                }
                None => {
                    index.insert(key, cells.len());
                    cells.push((LatLngBounds::from_point(*position), vec![*id]));
                }
            }
        }

        cells
            .into_iter()
            .map(|(bounds, members)| ClusterCell {
                center: bounds.center(),
                members,
            })
            .collect()
    }
}

impl Default for Clusterer {
    fn default() -> Self {
        Self::new()
    }
}
