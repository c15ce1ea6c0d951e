//! Serde wire types for the glTF 2.0 json document. Field names follow the
//! format's camelCase via aliases; anything the format makes optional is an
//! `Option` and absence means the feature is absent downstream.

use rustc_hash::FxHashMap;

#[derive(Debug, serde::Deserialize)]
pub struct JSONAsset {
	pub version: Option<String>,
	pub generator: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONScene {
	pub name: Option<String>,
	pub nodes: Option<Vec<usize>>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONNode {
	pub name: Option<String>,
	pub mesh: Option<usize>,
	pub children: Option<Vec<usize>>,
	pub translation: Option<[f32;3]>,
	pub rotation: Option<[f32;4]>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONPrimitive {
	pub attributes: FxHashMap<String, usize>,
	pub indices: Option<usize>,
	pub material: Option<usize>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONMesh {
	pub name: Option<String>,
	pub primitives: Vec<JSONPrimitive>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONPbrMetallicRoughness {
	#[serde(alias = "baseColorFactor")]
	pub base_color_factor: Option<[f32;4]>,
	#[serde(alias = "metallicFactor")]
	pub metallic_factor: Option<f32>,
	#[serde(alias = "roughnessFactor")]
	pub roughness_factor: Option<f32>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONMaterial {
	pub name: Option<String>,
	#[serde(alias = "doubleSided")]
	pub double_sided: Option<bool>,
	#[serde(alias = "emissiveFactor")]
	pub emissive_factor: Option<[f32;3]>,
	#[serde(alias = "pbrMetallicRoughness")]
	pub pbr_metallic_roughness: Option<JSONPbrMetallicRoughness>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONAccessor {
	#[serde(alias = "bufferView")]
	pub buffer_view: usize,
	#[serde(alias = "componentType")]
	pub component_type: u32,
	#[serde(alias = "type")]
	pub ty: String,
	pub count: usize,
	pub min: Option<Vec<f64>>,
	pub max: Option<Vec<f64>>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONBufferView {
	pub buffer: usize,
	#[serde(alias = "byteLength")]
	pub byte_length: usize,
	#[serde(alias = "byteOffset")]
	pub byte_offset: Option<usize>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONBuffer {
	#[serde(alias = "byteLength")]
	pub byte_length: usize,
	pub uri: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct JSONDocument {
	pub asset: Option<JSONAsset>,
	/// default scene index
	pub scene: Option<usize>,
	pub scenes: Option<Vec<JSONScene>>,
	pub nodes: Option<Vec<JSONNode>>,
	pub materials: Option<Vec<JSONMaterial>>,
	pub meshes: Option<Vec<JSONMesh>>,
	pub accessors: Option<Vec<JSONAccessor>>,
	#[serde(alias = "bufferViews")]
	pub buffer_views: Option<Vec<JSONBufferView>>,
	pub buffers: Option<Vec<JSONBuffer>>,
}
