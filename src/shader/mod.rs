use std::any::Any;

use ahash::AHashMap;
use tracing::debug;

mod stage;
mod uniform;

pub use self::stage::*;
pub use self::uniform::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererKind {
    OpenGl,
}

/// Backend half of a shader: the compiled program state owned by a `Shader`.
pub trait ShaderData {
    fn renderer_kind(&self) -> RendererKind;

    /// Releases backend resources. Default is a no-op.
    fn clean_up(&mut self) {}

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub trait Renderer {
    fn kind(&self) -> RendererKind;

    /// Builds backend data for `shader`, registering its attributes and
    /// uniforms through the cache setters.
    fn create_shader_data(&self, shader: &mut Shader) -> Box<dyn ShaderData>;
}

pub struct Shader {
    id: String,
    dirty: bool,

    attributes: AHashMap<String, u32>,
    uniforms: AHashMap<String, (UniformType, u32)>,

    data: Option<Box<dyn ShaderData>>,
}

impl Shader {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dirty: true,

            attributes: AHashMap::new(),
            uniforms: AHashMap::new(),

            data: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Marks the compiled state stale; the next `shader_data` call rebuilds it.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn attribute_index(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }

    pub fn uniform_location(&self, name: &str) -> Option<u32> {
        self.uniforms.get(name).map(|(_, location)| *location)
    }

    pub fn uniform_type(&self, name: &str) -> Option<UniformType> {
        self.uniforms.get(name).map(|(ty, _)| *ty)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, u32)> {
        self.attributes
            .iter()
            .map(|(name, index)| (name.as_str(), *index))
    }

    pub fn uniforms(&self) -> impl Iterator<Item = (&str, UniformType, u32)> {
        self.uniforms
            .iter()
            .map(|(name, (ty, location))| (name.as_str(), *ty, *location))
    }

    /// Registers an attribute slot. Meant to be called from
    /// `Renderer::create_shader_data` while backend data is being built.
    pub fn set_attribute_index(&mut self, name: impl Into<String>, index: u32) {
        self.attributes.insert(name.into(), index);
    }

    pub fn set_uniform_type_and_location(
        &mut self,
        name: impl Into<String>,
        ty: UniformType,
        location: u32,
    ) {
        self.uniforms.insert(name.into(), (ty, location));
    }

    /// Returns this shader's backend data, building it first if it is absent
    /// or stale. The caches are cleared before a rebuild so entries from the
    /// previous program cannot linger.
    pub fn shader_data(&mut self, renderer: &dyn Renderer) -> &mut dyn ShaderData {
        if self.dirty || self.data.is_none() {
            if let Some(mut old) = self.data.take() {
                old.clean_up();
            }

            self.attributes.clear();
            self.uniforms.clear();
            self.dirty = false;

            debug!(id = %self.id, "rebuilding shader data");

            let data = renderer.create_shader_data(self);
            return &mut **self.data.insert(data);
        }

        match self.data.as_deref_mut() {
            Some(data) => data,
            None => unreachable!(),
        }
    }

    pub(crate) fn take_data(&mut self) -> Option<Box<dyn ShaderData>> {
        self.dirty = true;
        self.data.take()
    }
}

/// Registry of all loaded shaders, keyed by id. Owns every `Shader` for the
/// lifetime of the rendering context it serves.
pub struct ShaderManager {
    shaders: AHashMap<String, Shader>,
}

impl ShaderManager {
    pub fn new() -> Self {
        Self {
            shaders: AHashMap::new(),
        }
    }

    pub fn get_or_create(&mut self, id: &str) -> &mut Shader {
        self.shaders
            .entry(id.to_owned())
            .or_insert_with(|| Shader::new(id))
    }

    pub fn get(&self, id: &str) -> Option<&Shader> {
        self.shaders.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Shader> {
        self.shaders.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shader> {
        self.shaders.values()
    }

    /// Releases every shader's backend data and destroys all registry entries.
    pub fn clean_up(&mut self) {
        for shader in self.shaders.values_mut() {
            if let Some(mut data) = shader.take_data() {
                data.clean_up();
            }
        }

        self.shaders.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct TestShaderData {
        generation: u32,
        cleaned: Rc<Cell<u32>>,
    }

    impl ShaderData for TestShaderData {
        fn renderer_kind(&self) -> RendererKind {
            RendererKind::OpenGl
        }

        fn clean_up(&mut self) {
            self.cleaned.set(self.cleaned.get() + 1);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct TestRenderer {
        created: Cell<u32>,
        cleaned: Rc<Cell<u32>>,
    }

    impl TestRenderer {
        fn new() -> Self {
            Self {
                created: Cell::new(0),
                cleaned: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Renderer for TestRenderer {
        fn kind(&self) -> RendererKind {
            RendererKind::OpenGl
        }

        fn create_shader_data(&self, shader: &mut Shader) -> Box<dyn ShaderData> {
            self.created.set(self.created.get() + 1);

            shader.set_attribute_index("position", 0);
            shader.set_attribute_index("normal", 1);
            shader.set_uniform_type_and_location("transform", UniformType::FMat4, 3);

            Box::new(TestShaderData {
                generation: self.created.get(),
                cleaned: self.cleaned.clone(),
            })
        }
    }

    #[test]
    fn fresh_shader_is_dirty_and_uncached() {
        let shader = Shader::new("/core/pbr");

        assert!(shader.is_dirty());
        assert_eq!(shader.id(), "/core/pbr");
        assert_eq!(shader.attribute_index("position"), None);
        assert_eq!(shader.uniform_location("transform"), None);
    }

    #[test]
    fn shader_data_is_built_once_while_clean() {
        let renderer = TestRenderer::new();
        let mut shader = Shader::new("/core/pbr");

        shader.shader_data(&renderer);
        shader.shader_data(&renderer);

        assert_eq!(renderer.created.get(), 1);
        assert!(!shader.is_dirty());
    }

    #[test]
    fn mark_dirty_forces_rebuild_and_cleans_old_data() {
        let renderer = TestRenderer::new();
        let mut shader = Shader::new("/core/pbr");

        shader.shader_data(&renderer);
        shader.mark_dirty();
        let data = shader.shader_data(&renderer);

        let data = data.as_any().downcast_ref::<TestShaderData>().unwrap();
        assert_eq!(data.generation, 2);
        assert_eq!(renderer.created.get(), 2);
        assert_eq!(renderer.cleaned.get(), 1);
    }

    #[test]
    fn rebuild_replaces_stale_cache_entries() {
        let renderer = TestRenderer::new();
        let mut shader = Shader::new("/core/pbr");

        shader.set_uniform_type_and_location("stale", UniformType::Float, 9);
        shader.shader_data(&renderer);

        assert_eq!(shader.uniform_location("stale"), None);
        assert_eq!(shader.uniform_location("transform"), Some(3));
        assert_eq!(shader.uniform_type("transform"), Some(UniformType::FMat4));
        assert_eq!(shader.attribute_index("position"), Some(0));
        assert_eq!(shader.attribute_index("normal"), Some(1));
    }

    #[test]
    fn cache_iterators_cover_registered_names() {
        let renderer = TestRenderer::new();
        let mut shader = Shader::new("/core/pbr");

        shader.shader_data(&renderer);

        let mut attributes: Vec<_> = shader.attributes().collect();
        attributes.sort();
        assert_eq!(attributes, vec![("normal", 1), ("position", 0)]);

        let uniforms: Vec<_> = shader.uniforms().collect();
        assert_eq!(uniforms, vec![("transform", UniformType::FMat4, 3)]);
    }

    #[test]
    fn manager_returns_the_same_entry_until_clean_up() {
        let mut manager = ShaderManager::new();

        manager.get_or_create("/core/pbr").clear_dirty();
        assert!(!manager.get_or_create("/core/pbr").is_dirty());
        assert_eq!(manager.len(), 1);

        manager.get_or_create("/core/sky");
        assert_eq!(manager.len(), 2);

        manager.clean_up();
        assert!(manager.is_empty());

        // A new entry after clean-up starts over.
        assert!(manager.get_or_create("/core/pbr").is_dirty());
    }

    #[test]
    fn manager_clean_up_releases_backend_data() {
        let renderer = TestRenderer::new();
        let mut manager = ShaderManager::new();

        manager.get_or_create("/core/pbr").shader_data(&renderer);
        manager.get_or_create("/core/sky").shader_data(&renderer);
        manager.clean_up();

        assert_eq!(renderer.cleaned.get(), 2);
    }
}
