//! Instance records for cuboids and burst particles

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::sim::{Block, DebrisPiece, ParticleBurst, Snapshot};

/// One cuboid (tower block or debris piece)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BlockInstance {
    pub center: [f32; 3],
    pub _pad0: f32,
    /// Full extents
    pub size: [f32; 3],
    pub _pad1: f32,
    /// Euler angles (radians)
    pub rotation: [f32; 3],
    pub _pad2: f32,
    pub color: [f32; 4],
}

impl BlockInstance {
    pub fn new(center: Vec3, size: Vec3, rotation: Vec3, color: [f32; 4]) -> Self {
        Self {
            center: center.to_array(),
            _pad0: 0.0,
            size: size.to_array(),
            _pad1: 0.0,
            rotation: rotation.to_array(),
            _pad2: 0.0,
            color,
        }
    }
}

/// One burst particle
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub _pad: f32,
    pub color: [f32; 4],
}

/// Colour helpers
pub mod colors {
    /// Saturation and lightness every block colour shares
    pub const BLOCK_SATURATION: f32 = 0.72;
    pub const BLOCK_LIGHTNESS: f32 = 0.58;

    /// HSL (all in 0..1) to linear-ish RGB
    pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
        if s <= 0.0 {
            return [l, l, l];
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f32| {
            let t = t.rem_euclid(1.0);
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        };
        [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
    }

    /// Block colour for a hue
    pub fn block_color(hue: f32) -> [f32; 4] {
        let [r, g, b] = hsl_to_rgb(hue, BLOCK_SATURATION, BLOCK_LIGHTNESS);
        [r, g, b, 1.0]
    }

    /// 0xRRGGBB plus alpha
    pub fn hex_to_rgba(hex: u32, alpha: f32) -> [f32; 4] {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        [r, g, b, alpha]
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub blocks: Vec<BlockInstance>,
    pub particles: Vec<ParticleVertex>,
}

impl Frame {
    /// Raw bytes for a block instance buffer
    pub fn block_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.blocks)
    }

    /// Raw bytes for a particle vertex buffer
    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }
}

fn block_instance(block: &Block, height: f32, pulse_duration: f32) -> BlockInstance {
    BlockInstance::new(
        Vec3::new(block.center_x, block.y, block.center_z),
        Vec3::new(block.size_x, height * block.pulse_scale(pulse_duration), block.size_z),
        Vec3::ZERO,
        colors::block_color(block.hue),
    )
}

fn debris_instance(piece: &DebrisPiece) -> BlockInstance {
    BlockInstance::new(piece.pos, piece.size, piece.rotation, colors::block_color(piece.hue))
}

fn burst_vertices(burst: &ParticleBurst) -> impl Iterator<Item = ParticleVertex> + '_ {
    let color = colors::hex_to_rgba(burst.color, burst.opacity);
    burst.positions().map(move |p| ParticleVertex {
        position: p.to_array(),
        _pad: 0.0,
        color,
    })
}

/// Project a snapshot into instance records.
///
/// `block_height` and `pulse_duration` come from the simulation's tuning.
pub fn project(snapshot: &Snapshot<'_>, block_height: f32, pulse_duration: f32) -> Frame {
    let mut blocks = Vec::with_capacity(snapshot.blocks.len() + snapshot.debris.len());
    blocks.extend(
        snapshot
            .blocks
            .iter()
            .map(|b| block_instance(b, block_height, pulse_duration)),
    );
    blocks.extend(snapshot.debris.iter().map(debris_instance));

    let particles = snapshot
        .bursts
        .iter()
        .filter(|b| b.opacity > 0.0)
        .flat_map(burst_vertices)
        .collect();

    Frame { blocks, particles }
}
