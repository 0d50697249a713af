#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum UniformType {
    Float,
    FVec2,
    FVec3,
    FVec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    UInt,
    UVec2,
    UVec3,
    UVec4,
    Bool,
    FMat2,
    FMat3,
    FMat4,
    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Unknown,
}

impl UniformType {
    /// Classifies a GL uniform type enum. Anything outside the supported set
    /// maps to `Unknown` so introspection never fails on exotic types.
    pub fn from_gl(gl_type: u32) -> UniformType {
        match gl_type {
            glow::FLOAT => UniformType::Float,
            glow::FLOAT_VEC2 => UniformType::FVec2,
            glow::FLOAT_VEC3 => UniformType::FVec3,
            glow::FLOAT_VEC4 => UniformType::FVec4,
            glow::INT => UniformType::Int,
            glow::INT_VEC2 => UniformType::IVec2,
            glow::INT_VEC3 => UniformType::IVec3,
            glow::INT_VEC4 => UniformType::IVec4,
            glow::UNSIGNED_INT => UniformType::UInt,
            glow::UNSIGNED_INT_VEC2 => UniformType::UVec2,
            glow::UNSIGNED_INT_VEC3 => UniformType::UVec3,
            glow::UNSIGNED_INT_VEC4 => UniformType::UVec4,
            glow::BOOL => UniformType::Bool,
            glow::FLOAT_MAT2 => UniformType::FMat2,
            glow::FLOAT_MAT3 => UniformType::FMat3,
            glow::FLOAT_MAT4 => UniformType::FMat4,
            glow::SAMPLER_1D => UniformType::Sampler1D,
            glow::SAMPLER_2D => UniformType::Sampler2D,
            glow::SAMPLER_3D => UniformType::Sampler3D,
            glow::SAMPLER_CUBE => UniformType::SamplerCube,
            _ => UniformType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_gl_types_classify() {
        assert_eq!(UniformType::from_gl(glow::FLOAT), UniformType::Float);
        assert_eq!(UniformType::from_gl(glow::FLOAT_VEC3), UniformType::FVec3);
        assert_eq!(UniformType::from_gl(glow::FLOAT_MAT4), UniformType::FMat4);
        assert_eq!(UniformType::from_gl(glow::INT), UniformType::Int);
        assert_eq!(UniformType::from_gl(glow::SAMPLER_2D), UniformType::Sampler2D);
    }

    #[test]
    fn exotic_gl_types_fall_back_to_unknown() {
        assert_eq!(UniformType::from_gl(0), UniformType::Unknown);
        assert_eq!(
            UniformType::from_gl(glow::SAMPLER_2D_MULTISAMPLE_ARRAY),
            UniformType::Unknown
        );
    }
}
