/// Errors raised while decoding wire data into structured values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The response carried no records to decode.
    #[error("empty response")]
    EmptyResponse,

    /// A required field was absent from the record.
    #[error("missing field {0:?}")]
    MissingField(String),

    /// A field was present but its value did not parse as the expected type.
    #[error("invalid value {value:?} for field {key:?}")]
    InvalidValue { key: String, value: String },

    /// A notification line had no event name after the prefix.
    #[error("malformed notification line")]
    MalformedNotification,
}
