//! The adapter protocol: the decoder's only extension surface. A target
//! environment (engine, editor, exporter) implements these nine callbacks
//! and receives a fully constructed scene graph; the decoder never inspects
//! the handles it is given back.

use crate::json::{JSONMaterial, JSONScene};

/// Flat vertex data for one mesh, decoded from its first primitive.
/// `use_*` flags mirror which attributes the primitive declared; the
/// matching vec is empty when the flag is off. Colors are never decoded.
#[derive(Debug, Default)]
pub struct MeshData {
	pub use_positions: bool,
	pub positions: Vec<f32>,
	pub use_indices: bool,
	pub indices: Vec<u32>,
	pub use_normals: bool,
	pub normals: Vec<f32>,
	pub use_colors: bool,
	pub colors: Vec<f32>,
	pub use_uvs: bool,
	pub uvs: Vec<f32>,
}

impl MeshData {
	/// positions grouped by their vec3 arity
	pub fn positions3(&self) -> &[[f32;3]] {
		bytemuck::cast_slice(&self.positions[..self.positions.len() / 3 * 3])
	}

	pub fn normals3(&self) -> &[[f32;3]] {
		bytemuck::cast_slice(&self.normals[..self.normals.len() / 3 * 3])
	}

	pub fn uvs2(&self) -> &[[f32;2]] {
		bytemuck::cast_slice(&self.uvs[..self.uvs.len() / 2 * 2])
	}
}

/// Callbacks materializing a decoded document in a target environment.
/// Handle types are opaque to the decoder; it stores them in index order
/// and hands them back by reference, so cheap id/key types work as well as
/// rich objects.
pub trait Adapter {
	type Scene;
	type Node;
	type Mesh;
	type Material;

	fn scene_create(&mut self, scene: &JSONScene) -> Self::Scene;
	fn material_create(&mut self, material: &JSONMaterial) -> Self::Material;
	fn mesh_create(&mut self, data: &MeshData) -> Self::Mesh;
	fn node_create(&mut self, name: Option<&str>, has_mesh: bool) -> Self::Node;
	fn node_translate(&mut self, node: &Self::Node, x: f32, y: f32, z: f32);
	fn node_rotate(&mut self, node: &Self::Node, x: f32, y: f32, z: f32, w: f32);
	fn node_parent(&mut self, parent: &Self::Node, child: &Self::Node);
	fn node_add_mesh(&mut self, node: &Self::Node, mesh: &Self::Mesh, material: Option<&Self::Material>);
	fn scene_add_node(&mut self, scene: &Self::Scene, node: &Self::Node);
}

/// Packs `[r, g, b]` channel bytes as `0xRRGGBBAA` with full opacity.
pub const fn rgb_to_packed(rgb: [u8;3]) -> u32 {
	(rgb[0] as u32) << 24 | (rgb[1] as u32) << 16 | (rgb[2] as u32) << 8 | 0xFF
}

/// Packs `[r, g, b, a]` channel bytes as `0xRRGGBBAA`.
pub const fn rgba_to_packed(rgba: [u8;4]) -> u32 {
	(rgba[0] as u32) << 24 | (rgba[1] as u32) << 16 | (rgba[2] as u32) << 8 | rgba[3] as u32
}
