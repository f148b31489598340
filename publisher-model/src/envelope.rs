/// `{ success, message, data }` wrapper the catalog service puts around list
/// and search responses (and, depending on the deployment, around single
/// entities and error bodies too).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub message: String,
    pub data: Option<T>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub timestamp: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            timestamp: None,
        }
    }
}

/// A single-entity response that may or may not be enveloped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MaybeEnveloped<T> {
    Enveloped(ApiEnvelope<T>),
    Bare(T),
}

impl<T> MaybeEnveloped<T> {
    /// Normalises both shapes into an envelope; a bare entity counts as a
    /// successful response.
    pub fn into_envelope(self) -> ApiEnvelope<T> {
        match self {
            MaybeEnveloped::Enveloped(envelope) => envelope,
            MaybeEnveloped::Bare(data) => ApiEnvelope {
                success: true,
                message: String::new(),
                data: Some(data),
                timestamp: None,
            },
        }
    }
}
