//! Error types for the backdrop-blur crate.

/// Errors that can occur while stripping backgrounds and blurring images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A pipeline parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while decoding or encoding an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let invalid = Error::InvalidParameter {
            name: "sigma",
            reason: "must be positive, got -1".to_string(),
        };
        let msg = invalid.to_string();
        assert!(msg.contains("`sigma`"));
        assert!(msg.contains("-1"));
    }
}
