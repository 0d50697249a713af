#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ShaderStage {
    Compute,
    Vertex,
    TessControl,
    TessEval,
    Geometry,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 6] = [
        ShaderStage::Compute,
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEval,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
    ];

    pub fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Compute => glow::COMPUTE_SHADER,
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
            ShaderStage::TessEval => glow::TESS_EVALUATION_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Compute => "compute",
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessControl => "tess_control",
            ShaderStage::TessEval => "tess_eval",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        }
    }

    /// Extension appended to a shader id to locate this stage's source.
    pub fn extension(self) -> &'static str {
        match self {
            ShaderStage::Compute => ".comp",
            ShaderStage::Vertex => ".vert",
            ShaderStage::TessControl => ".tesc",
            ShaderStage::TessEval => ".tese",
            ShaderStage::Geometry => ".geom",
            ShaderStage::Fragment => ".frag",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_mappings_are_distinct() {
        for (i, a) in ShaderStage::ALL.iter().enumerate() {
            for b in ShaderStage::ALL.iter().skip(i + 1) {
                assert_ne!(a.gl_type(), b.gl_type());
                assert_ne!(a.name(), b.name());
                assert_ne!(a.extension(), b.extension());
            }
        }
    }

    #[test]
    fn extensions_follow_glsl_convention() {
        assert_eq!(ShaderStage::Vertex.extension(), ".vert");
        assert_eq!(ShaderStage::Fragment.extension(), ".frag");
        assert_eq!(ShaderStage::Compute.extension(), ".comp");
    }

    #[test]
    fn gl_types_match_the_gl_enums() {
        assert_eq!(ShaderStage::Vertex.gl_type(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_type(), glow::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Geometry.gl_type(), glow::GEOMETRY_SHADER);
    }
}
