use verdant_items::{AIR, InstanceId};

/// Sentinel for unused slots. Valid records only hold coordinates in
/// `[0, size)`, so a negative component can never collide with one.
const EMPTY_KEY: i16 = -1;

#[derive(Clone, Copy, Debug)]
struct Slot {
    x: i16,
    y: i16,
    z: i16,
    id: InstanceId,
}

const EMPTY_SLOT: Slot = Slot {
    x: EMPTY_KEY,
    y: EMPTY_KEY,
    z: EMPTY_KEY,
    id: AIR,
};

/// Open-addressing hash table from local voxel coordinate to instance id.
///
/// Capacity is always a power of two (`mask + 1` slots) and the load factor
/// invariant `count * 2 <= mask` holds after every insertion. Collisions are
/// resolved by linear probing with wrap-around. An occupied slot may
/// legitimately hold id 0: a voxel edited to air keeps its slot, and `get`
/// reports it as air either way.
#[derive(Clone, Debug)]
pub struct VoxelMap {
    slots: Vec<Slot>,
    mask: u32,
    count: u32,
    size: i32,
}

/// Avalanche mix of the three coordinates; determinism is the only hard
/// requirement here.
#[inline]
fn mix(bx: i32, by: i32, bz: i32) -> u32 {
    let mut h = (bx as u32).wrapping_mul(0x85eb_ca6b)
        ^ (by as u32).wrapping_mul(0xc2b2_ae35)
        ^ (bz as u32).wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

impl VoxelMap {
    /// Allocates `mask + 1` empty slots. `mask + 1` must be a power of two.
    pub fn with_capacity_mask(mask: u32, size: i32) -> Self {
        debug_assert!((mask as u64 + 1).is_power_of_two());
        debug_assert!(size > 0 && size <= i16::MAX as i32);
        Self {
            slots: vec![EMPTY_SLOT; mask as usize + 1],
            mask,
            count: 0,
            size,
        }
    }

    /// Capacity sized generously against `size^3` so growth stays rare.
    pub fn for_chunk(size: i32) -> Self {
        let cells = (size as u32).pow(3).max(2);
        Self::with_capacity_mask(cells.next_power_of_two() - 1, size)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity_mask(&self) -> u32 {
        self.mask
    }

    #[inline]
    fn in_range(&self, bx: i32, by: i32, bz: i32) -> bool {
        (0..self.size).contains(&bx) && (0..self.size).contains(&by) && (0..self.size).contains(&bz)
    }

    /// Stores `id` at the coordinate, returning whether anything changed.
    /// An air id never materializes a fresh entry, but does overwrite an
    /// existing record (the voxel keeps its slot). Out-of-range coordinates
    /// are a contract violation.
    pub fn set(&mut self, bx: i32, by: i32, bz: i32, id: InstanceId) -> bool {
        debug_assert!(
            self.in_range(bx, by, bz),
            "voxel ({bx},{by},{bz}) outside [0,{})",
            self.size
        );
        let mut i = (mix(bx, by, bz) & self.mask) as usize;
        loop {
            let slot = self.slots[i];
            if slot.x == EMPTY_KEY {
                if id == AIR {
                    return false;
                }
                self.slots[i] = Slot {
                    x: bx as i16,
                    y: by as i16,
                    z: bz as i16,
                    id,
                };
                self.count += 1;
                if self.count * 2 > self.mask {
                    self.grow();
                }
                return true;
            }
            if slot.x as i32 == bx && slot.y as i32 == by && slot.z as i32 == bz {
                if slot.id == id {
                    return false;
                }
                self.slots[i].id = id;
                return true;
            }
            i = (i + 1) & self.mask as usize;
        }
    }

    /// Id at the coordinate; out-of-range reads are air, as are misses.
    pub fn get(&self, bx: i32, by: i32, bz: i32) -> InstanceId {
        if !self.in_range(bx, by, bz) {
            return AIR;
        }
        let mut i = (mix(bx, by, bz) & self.mask) as usize;
        loop {
            let slot = self.slots[i];
            if slot.x == EMPTY_KEY {
                return AIR;
            }
            if slot.x as i32 == bx && slot.y as i32 == by && slot.z as i32 == bz {
                return slot.id;
            }
            i = (i + 1) & self.mask as usize;
        }
    }

    /// Doubles capacity and re-inserts every live record. Runs only inside
    /// `set`, on the single thread that owns the chunk at that time; air-id
    /// records are compacted away (re-inserting air is a no-op by the `set`
    /// contract and they were already unobservable through `get`).
    fn grow(&mut self) {
        let mut next = VoxelMap::with_capacity_mask((self.mask << 1) | 1, self.size);
        for slot in &self.slots {
            if slot.x != EMPTY_KEY {
                next.set(slot.x as i32, slot.y as i32, slot.z as i32, slot.id);
            }
        }
        *self = next;
    }

    /// Iterates occupied records as `(bx, by, bz, id)`, including air-id
    /// slots left behind by edits.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, i32, InstanceId)> + '_ {
        self.slots.iter().filter_map(|s| {
            (s.x != EMPTY_KEY).then_some((s.x as i32, s.y as i32, s.z as i32, s.id))
        })
    }
}
