//! Storage for the materialized tiles of the board.
//!
//! Tiles are kept in slots and referred to by [`TileId`] handles. A handle holds the slot
//! index and the generation of the slot, so a handle to a removed tile never refers to a
//! tile later stored in the same slot. The neighbour graph lives next to the tiles and is
//! only changed through [`TileSet::connect`] and [`TileSet::remove`], which always update
//! both ends of an edge.

use super::tile::Tile;

/// Handle of a tile in a [`TileSet`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    /// The slot index
    index: u32,
    /// The generation of the slot when the tile was inserted
    generation: u32,
}

impl TileId {
    fn slot(&self) -> usize {
        self.index as usize
    }
}

/// A tile together with its links to the neighbouring tiles
#[derive(Clone, Debug)]
struct Entry {
    tile: Tile,
    neighbours: Vec<TileId>,
}

#[derive(Clone, Debug)]
struct Slot {
    /// Incremented every time the slot is reused
    generation: u32,
    entry: Option<Entry>,
}

/// The set of materialized tiles and the neighbour graph between them
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    slots: Vec<Slot>,
    /// Slots without a tile, reused before growing
    free: Vec<u32>,
    /// The number of tiles
    len: usize,
}

impl TileSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Checks if the handle refers to a tile in the set
    pub fn contains(&self, id: TileId) -> bool {
        self.entry(id).is_some()
    }

    /// Adds a tile without connecting it to anything
    ///
    /// # Parameters
    ///
    /// tile: The tile to add
    pub fn insert(&mut self, tile: Tile) -> TileId {
        let entry = Entry {
            tile,
            neighbours: Vec::new(),
        };
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry = Some(entry);
            return TileId { index, generation: slot.generation };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            entry: Some(entry),
        });
        TileId { index, generation: 1 }
    }

    /// Adds a tile and connects it to every tile in the set it is a neighbour of
    ///
    /// # Parameters
    ///
    /// tile: The tile to add
    pub fn insert_connected(&mut self, tile: Tile) -> TileId {
        let id = self.insert(tile);
        let others: Vec<TileId> = self.ids().filter(|&other| other != id).collect();
        for other in others {
            self.connect_if_neighbours(id, other);
        }
        id
    }

    /// Removes a tile after disconnecting it from all of its neighbours
    ///
    /// # Parameters
    ///
    /// id: The tile to remove
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        self.disconnect(id);
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        self.free.push(id.index);
        self.len -= 1;
        Some(entry.tile)
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.entry(id).map(|entry| &entry.tile)
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.entry_mut(id).map(|entry| &mut entry.tile)
    }

    /// Retrieves the neighbours of a tile, empty for unknown handles
    pub fn neighbours(&self, id: TileId) -> &[TileId] {
        self.entry(id).map(|entry| entry.neighbours.as_slice()).unwrap_or(&[])
    }

    /// Checks if the two tiles are linked
    pub fn are_connected(&self, a: TileId, b: TileId) -> bool {
        self.neighbours(a).contains(&b)
    }

    /// Links two tiles in both directions. Returns false if either tile is missing,
    /// they are the same tile or they are already linked.
    ///
    /// # Parameters
    ///
    /// a: The first tile
    ///
    /// b: The second tile
    pub fn connect(&mut self, a: TileId, b: TileId) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) || self.are_connected(a, b) {
            return false;
        }
        if let Some(entry) = self.entry_mut(a) {
            entry.neighbours.push(b);
        }
        if let Some(entry) = self.entry_mut(b) {
            entry.neighbours.push(a);
        }
        true
    }

    /// Links two tiles if their centers are close enough, see [`Tile::is_neighbour`]
    pub fn connect_if_neighbours(&mut self, a: TileId, b: TileId) -> bool {
        let close = match (self.get(a), self.get(b)) {
            (Some(tile_a), Some(tile_b)) => tile_a.is_neighbour(tile_b),
            _ => false,
        };
        close && self.connect(a, b)
    }

    /// Removes every link to and from the tile
    pub fn disconnect(&mut self, id: TileId) {
        let neighbours = match self.entry_mut(id) {
            Some(entry) => std::mem::take(&mut entry.neighbours),
            None => return,
        };
        for neighbour in neighbours {
            if let Some(entry) = self.entry_mut(neighbour) {
                entry.neighbours.retain(|&other| other != id);
            }
        }
    }

    /// Iterates the handles of all tiles in slot order
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|_| TileId { index: index as u32, generation: slot.generation })
        })
    }

    /// Iterates all tiles with their handles in slot order
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|entry| (TileId { index: index as u32, generation: slot.generation }, &entry.tile))
        })
    }

    /// Iterates all tiles mutably
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.entry.as_mut().map(|entry| &mut entry.tile))
    }

    /// Finds the first tile matching the predicate
    pub fn find<P: FnMut(&Tile) -> bool>(&self, mut predicate: P) -> Option<TileId> {
        self.iter().find(|(_, tile)| predicate(tile)).map(|(id, _)| id)
    }

    fn entry(&self, id: TileId) -> Option<&Entry> {
        let slot = self.slots.get(id.slot())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: TileId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn tile_at(x: f64, y: f64) -> Tile {
        Tile::new(&Point::new(x, y), 1.0)
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut set = TileSet::new();
        let a = set.insert(tile_at(0.0, 0.0));
        assert!(set.remove(a).is_some());

        let b = set.insert(tile_at(5.0, 0.0));
        assert_ne!(a, b);
        assert!(!set.contains(a));
        assert!(set.get(a).is_none());
        assert!(set.remove(a).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn connect_is_symmetric_and_unique() {
        let mut set = TileSet::new();
        let a = set.insert(tile_at(0.0, 0.0));
        let b = set.insert(tile_at(1.5, 0.0));

        assert!(set.connect(a, b));
        assert!(!set.connect(b, a));
        assert!(!set.connect(a, a));
        assert_eq!(set.neighbours(a), &[b]);
        assert_eq!(set.neighbours(b), &[a]);
    }

    #[test]
    fn insert_connected_uses_distance() {
        let mut set = TileSet::new();
        let a = set.insert_connected(tile_at(0.0, 0.0));
        let far = set.insert_connected(tile_at(10.0, 0.0));
        let b = set.insert_connected(tile_at(1.9, 0.0));

        assert!(set.are_connected(a, b));
        assert!(!set.are_connected(a, far));
        assert!(set.neighbours(far).is_empty());
    }

    #[test]
    fn remove_disconnects_neighbours() {
        let mut set = TileSet::new();
        let a = set.insert_connected(tile_at(0.0, 0.0));
        let b = set.insert_connected(tile_at(1.0, 0.0));
        let c = set.insert_connected(tile_at(2.0, 0.0));

        set.remove(b);
        assert_eq!(set.neighbours(a), &[c]);
        assert_eq!(set.neighbours(c), &[a]);
        assert!(set.ids().all(|id| !set.neighbours(id).contains(&b)));
    }
}
