use bytemuck::{Pod, Zeroable};
use std::sync::atomic::{AtomicU64, Ordering};

/// Textures a single quad batch can reference.
pub const MAX_TEXTURE_SLOTS: usize = 16;
/// Primitives per vertex list before a batch is flushed.
pub const MAX_QUADS_PER_BATCH: usize = 4096;
pub const MAX_VERTICES: usize = MAX_QUADS_PER_BATCH * 4;
pub const MAX_INDICES: usize = MAX_QUADS_PER_BATCH * 6;

/// Process-unique texture identity; what the slot table deduplicates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

impl TextureId {
    /// Allocate a fresh id. Ids are never reused.
    pub fn next() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 4],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
    pub tex_index: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CircleVertex {
    pub world_position: [f32; 4],
    /// Corner of the unit quad, in `[-1, 1]`.
    pub local_position: [f32; 2],
    pub color: [f32; 4],
    pub thickness: f32,
    pub fade: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub position: [f32; 4],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

/// Index list for `quads` quads: 0-1-2, 2-3-0 per quad.
pub fn quad_indices(quads: usize) -> Vec<u32> {
    (0..quads as u32)
        .flat_map(|q| {
            let base = q * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect()
}

/// Up to [`MAX_TEXTURE_SLOTS`] textures bound for one batch, first-found reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSlots<H> {
    slots: Vec<(TextureId, H)>,
}

impl<H> Default for TextureSlots<H> {
    fn default() -> Self {
        Self {
            slots: Vec::with_capacity(MAX_TEXTURE_SLOTS),
        }
    }
}

impl<H> TextureSlots<H> {
    /// Slot index for `id`, assigning the next free slot if it is new.
    /// Hands `handle` back when the table is full and `id` is not present.
    pub fn insert(&mut self, id: TextureId, handle: H) -> Result<u32, H> {
        if let Some(index) = self.find(id) {
            return Ok(index);
        }
        if self.is_full() {
            return Err(handle);
        }
        self.slots.push((id, handle));
        Ok(self.slots.len() as u32 - 1)
    }

    pub fn find(&self, id: TextureId) -> Option<u32> {
        self.slots
            .iter()
            .position(|(slot, _)| *slot == id)
            .map(|i| i as u32)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == MAX_TEXTURE_SLOTS
    }

    pub fn ids(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.slots.iter().map(|(id, _)| *id)
    }

    /// Bound handles in slot order.
    pub fn handles(&self) -> impl Iterator<Item = &H> {
        self.slots.iter().map(|(_, h)| h)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Everything accumulated between two flushes.
///
/// `H` is the backend's texture binding type.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<H> {
    pub quads: Vec<QuadVertex>,
    pub circles: Vec<CircleVertex>,
    pub text: Vec<TextVertex>,
    pub textures: TextureSlots<H>,
    /// Atlas sampled by every glyph in `text`.
    pub text_atlas: Option<(TextureId, H)>,
}

impl<H> Default for Batch<H> {
    fn default() -> Self {
        Self {
            quads: Vec::with_capacity(MAX_VERTICES),
            circles: Vec::new(),
            text: Vec::new(),
            textures: TextureSlots::default(),
            text_atlas: None,
        }
    }
}

impl<H> Batch<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.quads.clear();
        self.circles.clear();
        self.text.clear();
        self.textures.clear();
        self.text_atlas = None;
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty() && self.circles.is_empty() && self.text.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len() / 4
    }

    pub fn circle_count(&self) -> usize {
        self.circles.len() / 4
    }

    pub fn glyph_count(&self) -> usize {
        self.text.len() / 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layouts_have_no_padding() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 44);
        assert_eq!(std::mem::size_of::<CircleVertex>(), 48);
        assert_eq!(std::mem::size_of::<TextVertex>(), 40);
    }

    #[test]
    fn indices_follow_quad_winding() {
        assert_eq!(quad_indices(2), [0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        assert_eq!(quad_indices(MAX_QUADS_PER_BATCH).len(), MAX_INDICES);
    }

    #[test]
    fn slots_deduplicate_and_cap() {
        let mut slots = TextureSlots::default();
        let a = TextureId(100);
        assert_eq!(slots.insert(a, ()), Ok(0));
        assert_eq!(slots.insert(a, ()), Ok(0));
        assert_eq!(slots.len(), 1);

        for i in 1..MAX_TEXTURE_SLOTS as u64 {
            assert_eq!(slots.insert(TextureId(100 + i), ()), Ok(i as u32));
        }
        assert!(slots.is_full());
        assert_eq!(slots.insert(TextureId(999), ()), Err(()));
        // Already-bound textures still resolve when full.
        assert_eq!(slots.insert(a, ()), Ok(0));
        assert_eq!(slots.find(TextureId(999)), None);
        assert_eq!(slots.len(), MAX_TEXTURE_SLOTS);
    }

    #[test]
    fn texture_ids_are_unique() {
        let a = TextureId::next();
        let b = TextureId::next();
        assert_ne!(a, b);
    }
}
