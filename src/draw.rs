//! Render-agnostic drawing. The simulation never draws anything itself; it describes what it
//! would draw to a [`DrawSink`], and a renderer turns that into pixels.

use crate::Vec3;

pub type Color = [f32; 3];

pub const PARTICLE_COLOR: Color = [1., 1., 1.];
pub const VELOCITY_COLOR: Color = [0., 1., 0.];
pub const FORCE_COLOR: Color = [1., 0., 0.];
pub const CONSTRAINT_COLOR: Color = [0., 0.6, 1.];

pub trait DrawSink {
    fn point(&mut self, position: Vec3, color: Color);

    fn line(&mut self, from: Vec3, to: Vec3, color: Color);
}

/// Which parts of the system to describe.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawOptions {
    pub velocity: bool,
    pub force: bool,
    pub constraint: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: Color,
}

impl Vertex {
    fn new(position: Vec3, color: Color) -> Self {
        let pos = position.cast::<f32>();
        Vertex {
            position: [pos.x, pos.y, pos.z],
            color,
        }
    }
}

/// Collects everything into flat vertex lists: one vertex per point, two per line.
#[derive(Clone, Debug, Default)]
pub struct LineList {
    pub points: Vec<Vertex>,
    pub lines: Vec<Vertex>,
}

impl LineList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len() / 2
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
    }
}

impl DrawSink for LineList {
    fn point(&mut self, position: Vec3, color: Color) {
        self.points.push(Vertex::new(position, color));
    }

    fn line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.lines.push(Vertex::new(from, color));
        self.lines.push(Vertex::new(to, color));
    }
}
