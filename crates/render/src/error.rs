use trigon_shader::ShaderError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("failed to create GL {object}: {message}")]
    Allocation {
        object: &'static str,
        message: String,
    },
}

impl RenderError {
    pub(crate) fn allocation(object: &'static str) -> impl FnOnce(String) -> Self {
        move |message| Self::Allocation { object, message }
    }
}
