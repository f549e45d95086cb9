//! Plugin registry: ref-counted family and descriptor caching, and the
//! built-in filter catalog (§4.1 "Plugin registry").
//!
//! A [`PluginRegistry`] owns one cached [`PluginFamily`] per `(tag, path)`
//! pair and one cached [`Descriptor`] per `(tag, path, label)` triple.
//! Graph construction asks the registry for a descriptor to size ports, then
//! later asks it to instantiate — the family itself is only ever loaded
//! once no matter how many nodes reference it.
//!
//! Only the `builtin` family is fully implemented here; `family-a` and
//! `family-b` are out of scope as external collaborators (the surrounding
//! framework owns their loader hooks), so this crate only proves the
//! [`PluginFamily`] contract is generic enough to host them via
//! [`stub::StubFamily`].

pub mod builtin;
pub mod stub;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use filterchain_core::descriptor::Descriptor;
use filterchain_core::error::{EngineError, Result};
use filterchain_core::plugin::{PluginFamily, PluginHandle};
use serde_json::value::RawValue;

/// Tag identifying which of the three plugin families a path belongs to.
pub const BUILTIN_TAG: &str = "builtin";

/// The family tags the engine knows about (§4.1, §7). A tag outside this set
/// is a syntactically unknown family and fails with `Unsupported`; a tag in
/// this set whose `(tag, path)` pair hasn't been registered yet is merely
/// unloaded and fails with `NotFound`.
const KNOWN_FAMILY_TAGS: &[&str] = &[BUILTIN_TAG, "family-a", "family-b"];

type FamilyCache = HashMap<(String, String), Arc<dyn PluginFamily + Send + Sync>>;
type DescriptorCache = HashMap<(String, String, String), Arc<Descriptor>>;

/// Central cache of loaded plugin families and resolved descriptors.
///
/// One registry is shared by every graph built within a process. The
/// `builtin` family is registered automatically; other families are
/// registered by the host via [`PluginRegistry::register_family`] once it
/// has loaded them through its own (out-of-scope) loader hooks.
pub struct PluginRegistry {
    families: Mutex<FamilyCache>,
    descriptors: Mutex<DescriptorCache>,
}

impl PluginRegistry {
    /// Create a registry with the `builtin` family already registered.
    pub fn new() -> Self {
        let registry = Self { families: Mutex::new(HashMap::new()), descriptors: Mutex::new(HashMap::new()) };
        registry.register_family(BUILTIN_TAG, BUILTIN_TAG, Arc::new(builtin::BuiltinFamily));
        registry
    }

    /// Cache a loaded family under `(tag, path)`. Re-registering the same
    /// key replaces the cached family and invalidates nothing already
    /// resolved from it — descriptors already handed out remain valid since
    /// they are plain data, not borrowed from the family.
    pub fn register_family(&self, tag: &str, path: &str, family: Arc<dyn PluginFamily + Send + Sync>) {
        self.families.lock().unwrap().insert((tag.to_string(), path.to_string()), family);
    }

    fn family(&self, tag: &str, path: &str) -> Result<Arc<dyn PluginFamily + Send + Sync>> {
        if !KNOWN_FAMILY_TAGS.contains(&tag) {
            return Err(EngineError::Unsupported(format!("unknown plugin family tag: {tag}")));
        }
        self.families
            .lock()
            .unwrap()
            .get(&(tag.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("plugin family not loaded: {tag}:{path}")))
    }

    /// Resolve `(tag, path, label)` to a cached descriptor, calling the
    /// family's `make_desc` only on first resolution (§4.1 "descriptor
    /// cache keyed by (plugin, label)").
    pub fn descriptor(&self, tag: &str, path: &str, label: &str) -> Result<Arc<Descriptor>> {
        let key = (tag.to_string(), path.to_string(), label.to_string());
        if let Some(desc) = self.descriptors.lock().unwrap().get(&key) {
            return Ok(Arc::clone(desc));
        }
        let family = self.family(tag, path)?;
        let desc = Arc::new(family.make_desc(label)?);
        if !desc.has_any_audio_port() {
            return Err(EngineError::Unsupported(format!("{label}: descriptor has no audio ports in either direction")));
        }
        self.descriptors.lock().unwrap().insert(key, Arc::clone(&desc));
        Ok(desc)
    }

    /// Instantiate one running instance of `(tag, path, label)`.
    pub fn instantiate(
        &self,
        tag: &str,
        path: &str,
        descriptor: &Descriptor,
        sample_rate: f32,
        instance_index: usize,
        config: Option<&RawValue>,
    ) -> Result<Box<dyn PluginHandle>> {
        let family = self.family(tag, path)?;
        family.instantiate(descriptor, sample_rate, instance_index, config)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
