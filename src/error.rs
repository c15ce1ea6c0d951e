/// Errors produced by the fetch capability. Fetchers report whatever failure
/// type suits their transport; the parse wraps it with the buffer context.
pub type FetchError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum GltfError {
	/// bad magic, truncated or overrunning chunk, missing json chunk,
	/// unparseable json, or a structurally impossible index reference
	#[error("malformed gltf: {0}")]
	Format(String),
	#[error("gltf version {0:?} not accepted")]
	Version(String),
	#[error("bufferView {view}: range {offset}+{length} exceeds buffer {buffer} of {size} bytes")]
	Bounds {
		view: usize,
		buffer: usize,
		offset: usize,
		length: usize,
		size: usize,
	},
	#[error("accessor {accessor}: unrecognized componentType {component_type}")]
	UnsupportedType {
		accessor: usize,
		component_type: u32,
	},
	#[error("buffer {buffer}: failed to fetch {uri:?}")]
	Fetch {
		buffer: usize,
		uri: String,
		#[source]
		source: FetchError,
	},
}

impl From<serde_json::Error> for GltfError {
	fn from(e: serde_json::Error) -> Self {
		GltfError::Format(format!("invalid json: {e}"))
	}
}
