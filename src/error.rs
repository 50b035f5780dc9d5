use miette::Diagnostic;
use thiserror::Error;

/// Main error type for scenedoc operations
#[derive(Error, Diagnostic, Debug)]
pub enum DocsError {
    #[error("IO error with {}: {message}", path.display())]
    #[diagnostic(code(scenedoc::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("corrupted header in {}: {message}", path.display())]
    #[diagnostic(code(scenedoc::header))]
    Header {
        path: std::path::PathBuf,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("corrupted file {}: {message}", path.display())]
    #[diagnostic(code(scenedoc::structure))]
    Structure {
        path: std::path::PathBuf,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("script annotation error in {}: {message}", path.display())]
    #[diagnostic(code(scenedoc::script))]
    Script {
        path: std::path::PathBuf,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("docs generation failed: {message}")]
    #[diagnostic(code(scenedoc::emit))]
    Emit {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, DocsError>;
