//! Three-pass scene graph construction.
//!
//! Pass order is the load-bearing design: allocate every handle, then wire
//! transforms/meshes/parents, then attach roots to scenes. Wiring only ever
//! looks up handles that already exist, so a node whose `children` array
//! references a higher index (forward reference) still links correctly.

use crate::access;
use crate::adapter::{Adapter, MeshData};
use crate::error::GltfError;
use crate::fetch::FetchBytes;
use crate::json::JSONDocument;
use crate::Gltf;

/// Index-keyed handle collections produced by a build. Indices correspond
/// one to one with the document's arrays.
pub struct SceneGraph<A: Adapter> {
	pub scenes: Vec<A::Scene>,
	pub nodes: Vec<A::Node>,
	pub meshes: Vec<A::Mesh>,
	pub materials: Vec<A::Material>,
}

/// Drives the adapter through the full document.
///
/// Only `primitives[0]` of each mesh is honored; data in further primitives
/// is dropped. Cyclic `children` graphs are not detected: construction is
/// strictly iterative and cannot loop, the cycle is reproduced verbatim via
/// `node_parent` in the adapter's world.
pub fn build<A: Adapter>(
	gltf: &Gltf,
	fetch: &impl FetchBytes,
	adapter: &mut A,
) -> Result<SceneGraph<A>, GltfError> {
	let doc = &gltf.json;

	let scene_defs = doc.scenes.as_deref().unwrap_or_default();
	let scenes: Vec<A::Scene> = scene_defs.iter().map(|def| adapter.scene_create(def)).collect();
	log::trace!("created {} scene handles", scenes.len());

	let material_defs = doc.materials.as_deref().unwrap_or_default();
	let materials: Vec<A::Material> =
		material_defs.iter().map(|def| adapter.material_create(def)).collect();
	log::trace!("created {} material handles", materials.len());

	let buffers = access::resolve_buffers(
		doc.buffers.as_deref().unwrap_or_default(),
		gltf.bin.as_deref(),
		fetch,
	)?;
	let views = access::bind_views(doc.buffer_views.as_deref().unwrap_or_default(), &buffers)?;
	let accessors = access::bind_accessors(doc.accessors.as_deref().unwrap_or_default(), &views)?;

	let mesh_defs = doc.meshes.as_deref().unwrap_or_default();
	let meshes: Vec<A::Mesh> = mesh_defs.iter().enumerate().map(|(i, def)| {
		let prim = def.primitives.first().ok_or_else(|| {
			GltfError::Format(format!("mesh {i} has no primitives"))
		})?;

		let decode = |semantic: &str| -> Result<Option<Vec<f64>>, GltfError> {
			prim.attributes.get(semantic).map(|&a| {
				accessors.get(a)
					.ok_or_else(|| GltfError::Format(format!(
						"mesh {i}: attribute {semantic} references missing accessor {a}"
					)))?
					.decode_all()
			}).transpose()
		};

		let positions = decode("POSITION")?;
		let normals = decode("NORMAL")?;
		let uvs = decode("TEXCOORD_0")?;
		let indices = prim.indices.map(|a| {
			accessors.get(a)
				.ok_or_else(|| GltfError::Format(format!(
					"mesh {i}: indices reference missing accessor {a}"
				)))?
				.decode_all()
		}).transpose()?;

		let data = MeshData {
			use_positions: positions.is_some(),
			positions: to_f32(positions),
			use_indices: indices.is_some(),
			indices: indices.unwrap_or_default().into_iter().map(|v| v as u32).collect(),
			use_normals: normals.is_some(),
			normals: to_f32(normals),
			use_colors: false,
			colors: Vec::new(),
			use_uvs: uvs.is_some(),
			uvs: to_f32(uvs),
		};
		Ok(adapter.mesh_create(&data))
	}).collect::<Result<_, GltfError>>()?;
	log::trace!("created {} mesh handles", meshes.len());

	// every node handle exists before any wiring references one
	let node_defs = doc.nodes.as_deref().unwrap_or_default();
	let nodes: Vec<A::Node> = node_defs.iter().map(
		|def| adapter.node_create(def.name.as_deref(), def.mesh.is_some())
	).collect();

	for (i, def) in node_defs.iter().enumerate() {
		let node = &nodes[i];
		if let Some([x, y, z]) = def.translation {
			adapter.node_translate(node, x, y, z);
		}
		if let Some([x, y, z, w]) = def.rotation {
			adapter.node_rotate(node, x, y, z, w);
		}
		if let Some(m) = def.mesh {
			let mesh = meshes.get(m).ok_or_else(|| {
				GltfError::Format(format!("node {i} references missing mesh {m}"))
			})?;
			let material = primitive_material(doc, i, m, &materials)?;
			adapter.node_add_mesh(node, mesh, material);
		}
		for &child in def.children.iter().flatten() {
			let child = nodes.get(child).ok_or_else(|| {
				GltfError::Format(format!("node {i} references missing child node {child}"))
			})?;
			adapter.node_parent(node, child);
		}
	}
	log::trace!("wired {} nodes", nodes.len());

	for (i, def) in scene_defs.iter().enumerate() {
		for &root in def.nodes.iter().flatten() {
			let node = nodes.get(root).ok_or_else(|| {
				GltfError::Format(format!("scene {i} references missing node {root}"))
			})?;
			adapter.scene_add_node(&scenes[i], node);
		}
	}

	Ok(SceneGraph { scenes, nodes, meshes, materials })
}

fn to_f32(values: Option<Vec<f64>>) -> Vec<f32> {
	values.unwrap_or_default().into_iter().map(|v| v as f32).collect()
}

/// material handle for the first primitive of mesh `m`, if it declares one
fn primitive_material<'a, M>(
	doc: &JSONDocument,
	node: usize,
	m: usize,
	materials: &'a [M],
) -> Result<Option<&'a M>, GltfError> {
	let mesh_defs = doc.meshes.as_deref().unwrap_or_default();
	let prim = mesh_defs[m].primitives.first();
	prim.and_then(|p| p.material).map(|mat| {
		materials.get(mat).ok_or_else(|| GltfError::Format(format!(
			"node {node}: mesh {m} references missing material {mat}"
		)))
	}).transpose()
}
