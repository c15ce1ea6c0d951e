//! Engine-agnostic glTF 2.0 decoder.
//!
//! Input bytes (json text or a binary GLB container) parse into a [`Gltf`],
//! and [`Gltf::build_scene_graph`] drives an [`Adapter`] implementation to
//! materialize the document in any target environment. Buffer bytes come in
//! through the caller-supplied [`FetchBytes`] capability, the crate's only
//! I/O dependency.

pub mod access;
pub mod adapter;
pub mod error;
pub mod fetch;
pub mod glb;
pub mod graph;
pub mod json;

pub use adapter::{rgb_to_packed, rgba_to_packed, Adapter, MeshData};
pub use error::{FetchError, GltfError};
pub use fetch::{FetchBytes, FsFetch};
pub use graph::SceneGraph;
pub use json::JSONDocument;

/// Gate applied to `asset.version`; receives the raw string and its leading
/// numeric prefix (NaN when there is none).
pub type VersionPredicate = fn(&str, f32) -> bool;

#[derive(Clone, Copy)]
pub struct ParseOptions {
	pub allow_version: VersionPredicate,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self { allow_version: |_, n| n >= 2.0 }
	}
}

/// A fully parsed document plus the GLB bin chunk when the input carried
/// one. Exclusively owned by the parse that produced it.
#[derive(Debug)]
pub struct Gltf {
	pub json: JSONDocument,
	pub bin: Option<Vec<u8>>,
}

impl Gltf {
	/// Sniffs the container: bytes starting with the "glTF" magic decode as
	/// a GLB container, anything else is treated as utf-8 json text.
	pub fn parse(data: &[u8], options: &ParseOptions) -> Result<Self, GltfError> {
		if glb::is_glb(data) {
			let glb = glb::Glb::parse(data)?;
			let text = std::str::from_utf8(&glb.json).map_err(|e| {
				GltfError::Format(format!("json chunk is not utf-8: {e}"))
			})?;
			let mut gltf = Self::parse_text(text, options)?;
			gltf.bin = glb.bin;
			Ok(gltf)
		} else {
			log::debug!("input has no glb magic, parsing as json text");
			let text = std::str::from_utf8(data).map_err(|e| {
				GltfError::Format(format!("input is not utf-8: {e}"))
			})?;
			Self::parse_text(text, options)
		}
	}

	pub fn parse_text(text: &str, options: &ParseOptions) -> Result<Self, GltfError> {
		Self::parse_json(serde_json::from_str(text)?, options)
	}

	pub fn parse_json(json: JSONDocument, options: &ParseOptions) -> Result<Self, GltfError> {
		let version = json.asset.as_ref()
			.and_then(|asset| asset.version.as_deref())
			.unwrap_or("");
		if version.is_empty() || !(options.allow_version)(version, version_number(version)) {
			return Err(GltfError::Version(version.to_string()));
		}
		Ok(Self { json, bin: None })
	}

	/// Builds the scene graph through `adapter`. See [`graph::build`] for
	/// the pass ordering and its caveats.
	pub fn build_scene_graph<A: Adapter>(
		&self,
		fetch: &impl FetchBytes,
		adapter: &mut A,
	) -> Result<SceneGraph<A>, GltfError> {
		graph::build(self, fetch, adapter)
	}
}

/// Leading numeric prefix of a version string ("2.0.1" -> 2.0), NaN when
/// the string has none.
fn version_number(version: &str) -> f32 {
	let bytes = version.as_bytes();
	let mut end = 0;
	let mut seen_dot = false;
	while end < bytes.len() {
		match bytes[end] {
			b'0'..=b'9' => end += 1,
			b'.' if !seen_dot => {
				seen_dot = true;
				end += 1;
			},
			_ => break,
		}
	}
	version[..end].trim_end_matches('.').parse().unwrap_or(f32::NAN)
}
