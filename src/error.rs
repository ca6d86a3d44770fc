pub type StepreelResult<T> = Result<T, StepreelError>;

#[derive(thiserror::Error, Debug)]
pub enum StepreelError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StepreelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            StepreelError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            StepreelError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = StepreelError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
