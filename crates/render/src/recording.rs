use crate::batch::{Batch, TextureId};
use crate::renderer::{RenderBackend, TextureHandle};
use glam::{Mat4, UVec2, Vec4};

/// A texture that exists only as an id, for [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTexture {
    id: TextureId,
    size: UVec2,
}

impl RecordedTexture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: TextureId::next(),
            size: UVec2::new(width, height),
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }
}

impl TextureHandle for RecordedTexture {
    type Binding = TextureId;

    fn id(&self) -> TextureId {
        self.id
    }

    fn binding(&self) -> TextureId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ViewProjection(Mat4),
    Viewport(u32, u32),
    Clear(Vec4),
    DrawBatch(Batch<TextureId>),
}

/// Backend that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub commands: Vec<Command>,
}

impl RecordingBackend {
    pub fn batches(&self) -> impl Iterator<Item = &Batch<TextureId>> {
        self.commands.iter().filter_map(|c| match c {
            Command::DrawBatch(b) => Some(b),
            _ => None,
        })
    }

    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

impl RenderBackend for RecordingBackend {
    type Binding = TextureId;

    fn set_view_projection(&mut self, view_projection: Mat4) {
        self.commands.push(Command::ViewProjection(view_projection));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.commands.push(Command::Viewport(width, height));
    }

    fn clear(&mut self, color: Vec4) {
        self.commands.push(Command::Clear(color));
    }

    fn draw_batch(&mut self, batch: &Batch<TextureId>) {
        self.commands.push(Command::DrawBatch(batch.clone()));
    }
}
