use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure reported by a drawing backend or frame sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The backend rejected a drawing call
    #[error("drawing failed: {0}")]
    Draw(String),

    /// The current frame could not be exported
    #[error("frame export failed: {0}")]
    Export(String),
}

impl SurfaceError {
    pub(crate) fn draw(value: JsValue) -> Self {
        SurfaceError::Draw(describe(&value))
    }

    pub(crate) fn export(value: JsValue) -> Self {
        SurfaceError::Export(describe(&value))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// A required DOM element is absent or has the wrong type
    #[error("missing element: {0}")]
    MissingElement(String),

    /// An update payload could not be decoded
    #[error("invalid board update: {0}")]
    Payload(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(describe(&value))
    }
}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Error::Payload(err.to_string())
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
