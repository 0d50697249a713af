use std::any::Any;
use std::sync::Arc;

use ahash::AHashMap;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;
use tracing::{debug, error};

use crate::shader::{Renderer, RendererKind, Shader, ShaderData, ShaderStage, UniformType};
use crate::vfs::{self, Vfs};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("GLSL error in {path}:\n{log}")]
    Compile { path: String, log: String },

    #[error("link error for {id}:\n{log}")]
    Link { id: String, log: String },

    #[error("OpenGL object error: {0}")]
    Object(String),

    #[error(transparent)]
    Vfs(#[from] vfs::Error),
}

/// `Renderer` over a live OpenGL context. Shader sources are resolved through
/// the engine VFS by id plus stage extension.
pub struct GlRenderer {
    gl: Arc<glow::Context>,
    vfs: Arc<Vfs>,
}

impl GlRenderer {
    pub fn new(gl: Arc<glow::Context>, vfs: Arc<Vfs>) -> Self {
        Self { gl, vfs }
    }

    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }
}

impl Renderer for GlRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::OpenGl
    }

    fn create_shader_data(&self, shader: &mut Shader) -> Box<dyn ShaderData> {
        Box::new(OpenGlShaderData::new(self.gl.clone(), &self.vfs, shader))
    }
}

/// Compiled GL program state for one shader. Compilation and link failures
/// are logged and leave the program absent; the shader stays unusable until
/// it is marked dirty and its sources are fixed.
pub struct OpenGlShaderData {
    gl: Arc<glow::Context>,

    program: Option<glow::Program>,
    stages: AHashMap<ShaderStage, bool>,
}

impl OpenGlShaderData {
    pub fn new(gl: Arc<glow::Context>, vfs: &Vfs, shader: &mut Shader) -> Self {
        let mut data = Self {
            gl,
            program: None,
            stages: AHashMap::new(),
        };

        data.init_gl_data(vfs, shader);
        data
    }

    pub fn program(&self) -> Option<glow::Program> {
        self.program
    }

    /// Whether a source file for `stage` was found and compiled.
    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        self.stages.get(&stage).copied().unwrap_or(false)
    }

    /// Binds the program for subsequent draw calls. No-op without a program.
    pub fn start(&self) {
        if self.program.is_some() {
            unsafe { self.gl.use_program(self.program) };
        }
    }

    pub fn stop(&self) {
        unsafe { self.gl.use_program(None) };
    }

    pub fn set_f32(&self, location: u32, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(&gl_location(location)), value) };
    }

    pub fn set_i32(&self, location: u32, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(&gl_location(location)), value) };
    }

    pub fn set_u32(&self, location: u32, value: u32) {
        unsafe { self.gl.uniform_1_u32(Some(&gl_location(location)), value) };
    }

    pub fn set_vec2(&self, location: u32, value: Vec2) {
        unsafe {
            self.gl
                .uniform_2_f32(Some(&gl_location(location)), value.x, value.y)
        };
    }

    pub fn set_vec3(&self, location: u32, value: Vec3) {
        unsafe {
            self.gl
                .uniform_3_f32(Some(&gl_location(location)), value.x, value.y, value.z)
        };
    }

    pub fn set_vec4(&self, location: u32, value: Vec4) {
        unsafe {
            self.gl.uniform_4_f32(
                Some(&gl_location(location)),
                value.x,
                value.y,
                value.z,
                value.w,
            )
        };
    }

    pub fn set_mat2(&self, location: u32, value: &Mat2) {
        unsafe {
            self.gl.uniform_matrix_2_f32_slice(
                Some(&gl_location(location)),
                false,
                &value.to_cols_array(),
            )
        };
    }

    pub fn set_mat3(&self, location: u32, value: &Mat3) {
        unsafe {
            self.gl.uniform_matrix_3_f32_slice(
                Some(&gl_location(location)),
                false,
                &value.to_cols_array(),
            )
        };
    }

    pub fn set_mat4(&self, location: u32, value: &Mat4) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(
                Some(&gl_location(location)),
                false,
                &value.to_cols_array(),
            )
        };
    }

    fn init_gl_data(&mut self, vfs: &Vfs, shader: &mut Shader) {
        let mut compiled = Vec::new();

        for stage in ShaderStage::ALL {
            match load_stage(&self.gl, vfs, shader.id(), stage) {
                Ok(Some(gl_shader)) => {
                    self.stages.insert(stage, true);
                    compiled.push(gl_shader);
                }
                Ok(None) => {}
                Err(err) => {
                    self.stages.insert(stage, false);
                    error!(shader = shader.id(), stage = stage.name(), "{err}");
                }
            }
        }

        if compiled.is_empty() {
            error!(shader = shader.id(), "no shader stages compiled");
            return;
        }

        let program = match unsafe { link_program(&self.gl, shader.id(), &compiled) } {
            Ok(program) => program,
            Err(err) => {
                error!(shader = shader.id(), "{err}");

                unsafe {
                    for gl_shader in compiled {
                        self.gl.delete_shader(gl_shader);
                    }
                }

                return;
            }
        };

        // The stage objects are no longer needed once the program is linked.
        unsafe {
            for gl_shader in compiled {
                self.gl.detach_shader(program, gl_shader);
                self.gl.delete_shader(gl_shader);
            }
        }

        register_attributes(&self.gl, program, shader);
        register_uniforms(&self.gl, program, shader);

        debug!(shader = shader.id(), "linked shader program");

        self.program = Some(program);
    }
}

impl ShaderData for OpenGlShaderData {
    fn renderer_kind(&self) -> RendererKind {
        RendererKind::OpenGl
    }

    fn clean_up(&mut self) {
        if let Some(program) = self.program.take() {
            unsafe { self.gl.delete_program(program) };
        }

        self.stages.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn gl_location(location: u32) -> glow::UniformLocation {
    glow::NativeUniformLocation(location)
}

/// Loads and compiles one stage. A missing source file means the stage is
/// absent from this shader and is not an error.
fn load_stage(
    gl: &glow::Context,
    vfs: &Vfs,
    id: &str,
    stage: ShaderStage,
) -> Result<Option<glow::Shader>, Error> {
    let path = format!("{}{}", id, stage.extension());

    let source = match vfs.load_string(&path) {
        Ok(source) => source,
        Err(vfs::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(shader = id, stage = stage.name(), "no source for stage");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let gl_shader = unsafe { compile_stage(gl, &path, stage, &source)? };

    Ok(Some(gl_shader))
}

unsafe fn compile_stage(
    gl: &glow::Context,
    path: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, Error> {
    let gl_shader = gl.create_shader(stage.gl_type()).map_err(Error::Object)?;

    gl.shader_source(gl_shader, source);
    gl.compile_shader(gl_shader);

    if gl.get_shader_compile_status(gl_shader) {
        Ok(gl_shader)
    } else {
        let log = gl.get_shader_info_log(gl_shader);
        gl.delete_shader(gl_shader);

        Err(Error::Compile {
            path: path.to_owned(),
            log,
        })
    }
}

unsafe fn link_program(
    gl: &glow::Context,
    id: &str,
    shaders: &[glow::Shader],
) -> Result<glow::Program, Error> {
    let program = gl.create_program().map_err(Error::Object)?;

    for shader in shaders {
        gl.attach_shader(program, *shader);
    }

    gl.link_program(program);

    if gl.get_program_link_status(program) {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);

        Err(Error::Link {
            id: id.to_owned(),
            log,
        })
    }
}

fn register_attributes(gl: &glow::Context, program: glow::Program, shader: &mut Shader) {
    let count = unsafe { gl.get_active_attributes(program) };

    for index in 0..count {
        let attribute = match unsafe { gl.get_active_attribute(program, index) } {
            Some(attribute) => attribute,
            None => continue,
        };

        let location = match unsafe { gl.get_attrib_location(program, &attribute.name) } {
            Some(location) => location,
            None => continue,
        };

        shader.set_attribute_index(attribute.name, location);
    }
}

fn register_uniforms(gl: &glow::Context, program: glow::Program, shader: &mut Shader) {
    let count = unsafe { gl.get_active_uniforms(program) };

    for index in 0..count {
        let uniform = match unsafe { gl.get_active_uniform(program, index) } {
            Some(uniform) => uniform,
            None => continue,
        };

        let location = match unsafe { gl.get_uniform_location(program, &uniform.name) } {
            Some(location) => location,
            None => continue,
        };

        shader.set_uniform_type_and_location(
            uniform.name,
            UniformType::from_gl(uniform.utype),
            location.0,
        );
    }
}
