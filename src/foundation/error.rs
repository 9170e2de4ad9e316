pub type ContrailResult<T> = Result<T, ContrailError>;

#[derive(thiserror::Error, Debug)]
pub enum ContrailError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ContrailError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ContrailError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ContrailError::surface("x")
                .to_string()
                .contains("surface error:")
        );
        assert!(
            ContrailError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ContrailError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
