/// A material description: which pipeline shader to use and its parameters.
///
/// The loader only records shaders; compiling programs is up to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shader {
    pub name: String,
    /// Name of the pipeline shader this material is built on (e.g. `"simple"`).
    pub pddi_shader: String,
    pub has_translucency: bool,
    pub vertex_needs: u32,
    pub vertex_mask: u32,
    pub params: Vec<ShaderParam>,
}

impl Shader {
    pub fn param(&self, name: &str) -> Option<&ShaderParamValue> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .map(|param| &param.value)
    }

    /// The texture bound to the `TEX` slot, if any.
    pub fn texture(&self) -> Option<&str> {
        match self.param("TEX") {
            Some(ShaderParamValue::Texture(name)) => Some(name),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShaderParam {
    pub name: String,
    pub value: ShaderParamValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShaderParamValue {
    Texture(String),
    Int(u32),
    Float(f32),
    /// RGBA
    Colour([u8; 4]),
}
