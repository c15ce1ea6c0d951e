//! End-to-end: parse a document and drive a recording adapter through the
//! full build, asserting the callback protocol fires in a usable order.

use limpet::adapter::{Adapter, MeshData};
use limpet::error::FetchError;
use limpet::json::{JSONMaterial, JSONScene};
use limpet::{Gltf, ParseOptions};

#[derive(Default)]
struct Recorder {
	next_handle: usize,
	node_creates: Vec<(Option<String>, bool)>,
	mesh_flags: Vec<[bool; 5]>,
	mesh_positions: Vec<Vec<f32>>,
	mesh_indices: Vec<Vec<u32>>,
	translates: Vec<(usize, [f32; 3])>,
	rotates: Vec<(usize, [f32; 4])>,
	parents: Vec<(usize, usize)>,
	node_meshes: Vec<(usize, usize, Option<usize>)>,
	scene_nodes: Vec<(usize, usize)>,
	materials: usize,
	scenes: usize,
}

impl Recorder {
	fn handle(&mut self) -> usize {
		self.next_handle += 1;
		self.next_handle - 1
	}
}

impl Adapter for Recorder {
	type Scene = usize;
	type Node = usize;
	type Mesh = usize;
	type Material = usize;

	fn scene_create(&mut self, _: &JSONScene) -> usize {
		self.scenes += 1;
		self.handle()
	}

	fn material_create(&mut self, _: &JSONMaterial) -> usize {
		self.materials += 1;
		self.handle()
	}

	fn mesh_create(&mut self, data: &MeshData) -> usize {
		self.mesh_flags.push([
			data.use_positions,
			data.use_indices,
			data.use_normals,
			data.use_colors,
			data.use_uvs,
		]);
		self.mesh_positions.push(data.positions.clone());
		self.mesh_indices.push(data.indices.clone());
		self.handle()
	}

	fn node_create(&mut self, name: Option<&str>, has_mesh: bool) -> usize {
		self.node_creates.push((name.map(String::from), has_mesh));
		self.handle()
	}

	fn node_translate(&mut self, node: &usize, x: f32, y: f32, z: f32) {
		self.translates.push((*node, [x, y, z]));
	}

	fn node_rotate(&mut self, node: &usize, x: f32, y: f32, z: f32, w: f32) {
		self.rotates.push((*node, [x, y, z, w]));
	}

	fn node_parent(&mut self, parent: &usize, child: &usize) {
		self.parents.push((*parent, *child));
	}

	fn node_add_mesh(&mut self, node: &usize, mesh: &usize, material: Option<&usize>) {
		self.node_meshes.push((*node, *mesh, material.copied()));
	}

	fn scene_add_node(&mut self, scene: &usize, node: &usize) {
		self.scene_nodes.push((*scene, *node));
	}
}

fn le_f32(values: &[f32]) -> Vec<u8> {
	values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// one scene, one node, one mesh: a single triangle with positions,
/// normals and uvs, no indices, material 0
fn triangle_document() -> String {
	r#"{
		"asset": {"version": "2.0", "generator": "test"},
		"scene": 0,
		"scenes": [{"name": "root", "nodes": [0]}],
		"nodes": [{"name": "tri", "mesh": 0, "translation": [1.0, 2.0, 3.0]}],
		"materials": [{"name": "flat", "doubleSided": true,
			"emissiveFactor": [0.0, 0.0, 0.0],
			"pbrMetallicRoughness": {"baseColorFactor": [1.0, 0.0, 1.0, 1.0],
				"metallicFactor": 0.0, "roughnessFactor": 1.0}}],
		"meshes": [{"name": "triangle", "primitives": [{
			"attributes": {"POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2},
			"material": 0}]}],
		"accessors": [
			{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
			{"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"},
			{"bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC2"}
		],
		"bufferViews": [
			{"buffer": 0, "byteOffset": 0, "byteLength": 36},
			{"buffer": 0, "byteOffset": 36, "byteLength": 36},
			{"buffer": 0, "byteOffset": 72, "byteLength": 24}
		],
		"buffers": [{"byteLength": 96, "uri": "tri.bin"}]
	}"#.to_string()
}

fn triangle_buffer() -> Vec<u8> {
	let mut bytes = le_f32(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
	bytes.extend(le_f32(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]));
	bytes.extend(le_f32(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]));
	bytes
}

fn fetch_triangle(uri: &str) -> Result<Vec<u8>, FetchError> {
	match uri {
		"tri.bin" => Ok(triangle_buffer()),
		_ => Err(format!("unknown uri {uri}").into()),
	}
}

#[test]
fn single_triangle_end_to_end() {
	let gltf = Gltf::parse_text(&triangle_document(), &ParseOptions::default()).unwrap();
	let mut recorder = Recorder::default();
	let graph = gltf.build_scene_graph(&fetch_triangle, &mut recorder).unwrap();

	assert_eq!(graph.scenes.len(), 1);
	assert_eq!(graph.materials.len(), 1);
	assert_eq!(graph.meshes.len(), 1);
	assert_eq!(graph.nodes.len(), 1);

	// use_positions, use_indices, use_normals, use_colors, use_uvs
	assert_eq!(recorder.mesh_flags, vec![[true, false, true, false, true]]);
	assert_eq!(recorder.mesh_positions[0].len(), 9);
	assert!(recorder.mesh_indices[0].is_empty());

	assert_eq!(recorder.node_creates, vec![(Some("tri".into()), true)]);
	assert_eq!(recorder.translates, vec![(graph.nodes[0], [1.0, 2.0, 3.0])]);
	assert!(recorder.rotates.is_empty());
	assert_eq!(
		recorder.node_meshes,
		vec![(graph.nodes[0], graph.meshes[0], Some(graph.materials[0]))]
	);
	assert_eq!(recorder.scene_nodes, vec![(graph.scenes[0], graph.nodes[0])]);
}

#[test]
fn forward_child_references_wire_correctly() {
	// node 0's children include index 1, declared after it
	let text = r#"{
		"asset": {"version": "2.0"},
		"scenes": [{"nodes": [0]}],
		"nodes": [
			{"name": "parent", "children": [1]},
			{"name": "child", "rotation": [0.0, 0.0, 0.0, 1.0]}
		]
	}"#;
	let gltf = Gltf::parse_text(text, &ParseOptions::default()).unwrap();
	let mut recorder = Recorder::default();
	let graph = gltf.build_scene_graph(&fetch_triangle, &mut recorder).unwrap();

	assert_eq!(graph.nodes.len(), 2);
	assert_eq!(recorder.parents, vec![(graph.nodes[0], graph.nodes[1])]);
	assert_eq!(recorder.rotates, vec![(graph.nodes[1], [0.0, 0.0, 0.0, 1.0])]);
	// only the root attaches to the scene
	assert_eq!(recorder.scene_nodes, vec![(graph.scenes[0], graph.nodes[0])]);
}

#[test]
fn glb_with_json_chunk_only_parses_when_buffers_have_uris() {
	let json = triangle_document();
	let mut body = (json.len() as u32).to_le_bytes().to_vec();
	body.extend_from_slice(&limpet::glb::CHUNK_JSON.to_le_bytes());
	body.extend_from_slice(json.as_bytes());
	let mut data = limpet::glb::MAGIC.to_vec();
	data.extend_from_slice(&2u32.to_le_bytes());
	data.extend_from_slice(&((12 + body.len()) as u32).to_le_bytes());
	data.extend_from_slice(&body);

	let gltf = Gltf::parse(&data, &ParseOptions::default()).unwrap();
	assert!(gltf.bin.is_none());
	let mut recorder = Recorder::default();
	let graph = gltf.build_scene_graph(&fetch_triangle, &mut recorder).unwrap();
	assert_eq!(graph.meshes.len(), 1);
}

#[test]
fn glb_bin_chunk_backs_buffer_zero() {
	let json = triangle_document().replace(r#", "uri": "tri.bin""#, "");
	let bin = triangle_buffer();
	let mut body = (json.len() as u32).to_le_bytes().to_vec();
	body.extend_from_slice(&limpet::glb::CHUNK_JSON.to_le_bytes());
	body.extend_from_slice(json.as_bytes());
	body.extend_from_slice(&(bin.len() as u32).to_le_bytes());
	body.extend_from_slice(&limpet::glb::CHUNK_BIN.to_le_bytes());
	body.extend_from_slice(&bin);
	let mut data = limpet::glb::MAGIC.to_vec();
	data.extend_from_slice(&2u32.to_le_bytes());
	data.extend_from_slice(&((12 + body.len()) as u32).to_le_bytes());
	data.extend_from_slice(&body);

	let gltf = Gltf::parse(&data, &ParseOptions::default()).unwrap();
	let no_fetch = |uri: &str| -> Result<Vec<u8>, FetchError> {
		Err(format!("unexpected fetch of {uri}").into())
	};
	let mut recorder = Recorder::default();
	let graph = gltf.build_scene_graph(&no_fetch, &mut recorder).unwrap();
	assert_eq!(graph.meshes.len(), 1);
	assert_eq!(recorder.mesh_positions[0].len(), 9);
}

#[test]
fn huge_accessor_count_fails_instead_of_decoding_empty() {
	// byte total of count * arity * width wraps usize; the build must abort
	let text = r#"{
		"asset": {"version": "2.0"},
		"scenes": [{"nodes": [0]}],
		"nodes": [{"mesh": 0}],
		"meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
		"accessors": [{"bufferView": 0, "componentType": 5126,
			"count": 4611686018427387904, "type": "VEC4"}],
		"bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 8}],
		"buffers": [{"byteLength": 8, "uri": "tiny.bin"}]
	}"#;
	let fetch = |_: &str| -> Result<Vec<u8>, FetchError> { Ok(vec![0u8; 8]) };
	let gltf = Gltf::parse_text(text, &ParseOptions::default()).unwrap();
	let mut recorder = Recorder::default();
	let result = gltf.build_scene_graph(&fetch, &mut recorder);
	assert!(matches!(result, Err(limpet::GltfError::Format(_))));
}

#[test]
fn indexed_mesh_decodes_u16_indices() {
	let text = r#"{
		"asset": {"version": "2.0"},
		"scenes": [{"nodes": [0]}],
		"nodes": [{"mesh": 0}],
		"meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
		"accessors": [
			{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
			{"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
		],
		"bufferViews": [
			{"buffer": 0, "byteOffset": 0, "byteLength": 36},
			{"buffer": 0, "byteOffset": 36, "byteLength": 6}
		],
		"buffers": [{"byteLength": 42, "uri": "mesh.bin"}]
	}"#;
	let fetch = |uri: &str| -> Result<Vec<u8>, FetchError> {
		assert_eq!(uri, "mesh.bin");
		let mut bytes = le_f32(&[0.0; 9]);
		bytes.extend([2u16, 1, 0].iter().flat_map(|v| v.to_le_bytes()));
		Ok(bytes)
	};
	let gltf = Gltf::parse_text(text, &ParseOptions::default()).unwrap();
	let mut recorder = Recorder::default();
	gltf.build_scene_graph(&fetch, &mut recorder).unwrap();
	assert_eq!(recorder.mesh_flags, vec![[true, true, false, false, false]]);
	assert_eq!(recorder.mesh_indices[0], vec![2, 1, 0]);
}
