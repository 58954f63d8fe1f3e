use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;

use crate::{scene::SceneDescriptor, ConfiguratorError, Result};

/// Path of the product model shipped with the site.
pub const DEFAULT_ASSET_PATH: &str = "/assets/3d/duck.glb";
/// Node inside the default model whose geometry is displayed.
pub const DEFAULT_MESH_NODE: &str = "LOD3spShape";

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Immutable product geometry. Loaded once and shared between every
/// material variant through an [`Arc`].
pub struct StaticAsset {
    path: String,
    json: String,
    binary: Option<Vec<u8>>,
    mesh_nodes: Vec<String>,
}

/// The slice of the glTF document needed to locate named meshes.
#[derive(Debug, Default, Deserialize)]
struct GltfDocument {
    #[serde(default)]
    nodes: Vec<GltfNode>,
}

#[derive(Debug, Deserialize)]
struct GltfNode {
    name: Option<String>,
    mesh: Option<usize>,
}

impl StaticAsset {
    /// Validates a binary glTF container and keeps its chunks.
    pub fn from_glb(path: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.len() < GLB_HEADER_LEN {
            return Err(ConfiguratorError::invalid_asset(path, "file shorter than header"));
        }

        let magic = read_u32(bytes, 0);
        if magic != GLB_MAGIC {
            return Err(ConfiguratorError::invalid_asset(path, "missing glTF magic"));
        }

        let version = read_u32(bytes, 4);
        if version != GLB_VERSION {
            return Err(ConfiguratorError::invalid_asset(
                path,
                format!("unsupported container version {version}"),
            ));
        }

        let declared = read_u32(bytes, 8) as usize;
        if declared != bytes.len() {
            return Err(ConfiguratorError::invalid_asset(
                path,
                format!("declared length {declared} but file has {} bytes", bytes.len()),
            ));
        }

        let mut json = None;
        let mut binary = None;
        let mut offset = GLB_HEADER_LEN;
        while offset < bytes.len() {
            if offset + CHUNK_HEADER_LEN > bytes.len() {
                return Err(ConfiguratorError::invalid_asset(path, "truncated chunk header"));
            }
            let chunk_len = read_u32(bytes, offset) as usize;
            let chunk_type = read_u32(bytes, offset + 4);
            let start = offset + CHUNK_HEADER_LEN;
            let end = start
                .checked_add(chunk_len)
                .filter(|end| *end <= bytes.len())
                .ok_or_else(|| ConfiguratorError::invalid_asset(path, "chunk overruns file"))?;
            let data = &bytes[start..end];

            match (chunk_type, json.is_some()) {
                (CHUNK_JSON, false) => {
                    let text = std::str::from_utf8(data).map_err(|_| {
                        ConfiguratorError::invalid_asset(path, "JSON chunk is not UTF-8")
                    })?;
                    json = Some(text.trim_end_matches([' ', '\0']).to_string());
                }
                (_, false) => {
                    return Err(ConfiguratorError::invalid_asset(
                        path,
                        "first chunk must be JSON",
                    ));
                }
                (CHUNK_BIN, true) if binary.is_none() => binary = Some(data.to_vec()),
                // Extension chunks are skipped.
                _ => {}
            }

            offset = end;
        }

        let json =
            json.ok_or_else(|| ConfiguratorError::invalid_asset(path, "no JSON chunk"))?;

        let document: GltfDocument = serde_json::from_str(&json).map_err(|err| {
            ConfiguratorError::invalid_asset(path, format!("malformed glTF JSON: {err}"))
        })?;
        let mesh_nodes = document
            .nodes
            .into_iter()
            .filter(|node| node.mesh.is_some())
            .filter_map(|node| node.name)
            .collect();

        Ok(Self {
            path: path.to_string(),
            json,
            binary,
            mesh_nodes,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The glTF scene description.
    pub fn json(&self) -> &str {
        &self.json
    }

    /// The embedded buffer, when the container has one.
    pub fn binary(&self) -> Option<&[u8]> {
        self.binary.as_deref()
    }

    /// Names of nodes that carry a mesh.
    pub fn mesh_nodes(&self) -> &[String] {
        &self.mesh_nodes
    }

    pub fn has_mesh_node(&self, name: &str) -> bool {
        self.mesh_nodes.iter().any(|node| node == name)
    }

    /// Fails unless the model has a node called `name` with geometry.
    pub fn require_mesh_node(&self, name: &str) -> Result<()> {
        if self.has_mesh_node(name) {
            Ok(())
        } else {
            Err(ConfiguratorError::invalid_asset(
                &self.path,
                format!("no mesh node named `{name}`"),
            ))
        }
    }
}

impl fmt::Debug for StaticAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAsset")
            .field("path", &self.path)
            .field("json", &self.json.len())
            .field("binary", &self.binary.as_ref().map(Vec::len))
            .field("mesh_nodes", &self.mesh_nodes)
            .finish()
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

/// Source of product geometry.
pub trait AssetLoader {
    fn load(&self, path: &str) -> Result<StaticAsset>;
}

/// Loads `.glb` files from a directory that stands in for the site root.
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    root: PathBuf,
}

impl FileAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl AssetLoader for FileAssetLoader {
    fn load(&self, path: &str) -> Result<StaticAsset> {
        let resolved = self.resolve(path);
        tracing::debug!(?resolved, "reading model");
        let bytes = std::fs::read(&resolved)?;
        StaticAsset::from_glb(path, &bytes)
    }
}

/// Registry that loads every asset at most once and hands out shared handles.
#[derive(Debug)]
pub struct AssetStore<L> {
    loader: L,
    loaded: HashMap<String, Arc<StaticAsset>>,
}

impl<L: AssetLoader> AssetStore<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            loaded: HashMap::new(),
        }
    }

    /// Returns the shared asset for `path`, loading it on first request.
    /// Failures are not cached, so a later call retries the loader.
    pub fn load(&mut self, path: &str) -> Result<Arc<StaticAsset>> {
        if let Some(asset) = self.loaded.get(path) {
            return Ok(Arc::clone(asset));
        }

        let asset = Arc::new(self.loader.load(path)?);
        tracing::info!(path, "loaded product model");
        self.loaded.insert(path.to_string(), Arc::clone(&asset));
        Ok(asset)
    }

    /// Loads the scene's model and checks that it holds the displayed mesh.
    pub fn resolve_scene_asset(&mut self, scene: &SceneDescriptor) -> Result<Arc<StaticAsset>> {
        let asset = self.load(&scene.asset_path)?;
        asset.require_mesh_node(&scene.mesh_node)?;
        Ok(asset)
    }

    pub fn get(&self, path: &str) -> Option<Arc<StaticAsset>> {
        self.loaded.get(path).cloned()
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.loaded.contains_key(path)
    }
}

#[cfg(test)]
pub(crate) fn sample_glb(json: &str, binary: Option<&[u8]>) -> Vec<u8> {
    fn push_chunk(out: &mut Vec<u8>, kind: u32, data: &[u8], pad: u8) {
        let padded = (data.len() + 3) & !3;
        out.extend_from_slice(&(padded as u32).to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(data);
        out.resize(out.len() + padded - data.len(), pad);
    }

    let mut body = Vec::new();
    push_chunk(&mut body, CHUNK_JSON, json.as_bytes(), b' ');
    if let Some(binary) = binary {
        push_chunk(&mut body, CHUNK_BIN, binary, 0);
    }

    let mut out = Vec::with_capacity(GLB_HEADER_LEN + body.len());
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&((GLB_HEADER_LEN + body.len()) as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}
