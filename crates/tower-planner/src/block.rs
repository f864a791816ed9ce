use serde::{Deserialize, Serialize};
use tower_geom::{OrientedBox, Rotation, Vec3};

/// Index of a committed block in its [`BlockSet`]; equal to its stacking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Committed block record. `position.z` is the base of the block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: usize,
    pub size: Vec3,
    pub position: Vec3,
    pub rotation: Rotation,
    pub color: String,
    pub material: String,
}

impl Block {
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::new(0.0, 0.0, self.size.z / 2.0)
    }

    #[inline]
    pub fn oriented_box(&self) -> OrientedBox {
        OrientedBox::from_base(self.position, self.size, self.rotation)
    }
}

/// Append-only arena of committed blocks for one tower.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockSet {
    blocks: Vec<Block>,
}

impl BlockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a block; its index is the next free slot.
    pub fn push(
        &mut self,
        size: Vec3,
        position: Vec3,
        rotation: Rotation,
        color: impl Into<String>,
        material: impl Into<String>,
    ) -> BlockId {
        let index = self.blocks.len();
        self.blocks.push(Block {
            index,
            size,
            position,
            rotation,
            color: color.into(),
            material: material.into(),
        });
        BlockId(index as u32)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.blocks.len()).map(|i| BlockId(i as u32))
    }

    pub fn oriented_boxes(&self) -> impl Iterator<Item = OrientedBox> + '_ {
        self.blocks.iter().map(Block::oriented_box)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

impl<'a> IntoIterator for &'a BlockSet {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
