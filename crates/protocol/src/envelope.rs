use serde::{Deserialize, Serialize};

use crate::constants::{FAILURE_CODE, SUCCESS_CODE};

/// Response envelope returned by every endpoint.
///
/// The `data` field uses `serde_json::value::RawValue` to defer
/// deserialization until the caller knows which stage it is parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub response_code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<serde_json::value::RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// Creates a successful envelope with an optional payload.
    pub fn success<T: Serialize>(data: Option<&T>) -> Result<Self, serde_json::Error> {
        let raw = match data {
            Some(d) => {
                let json = serde_json::to_string(d)?;
                Some(serde_json::value::RawValue::from_string(json)?)
            }
            None => None,
        };
        Ok(Self {
            response_code: SUCCESS_CODE,
            data: raw,
            message: None,
        })
    }

    /// Creates a failed envelope with the given code.
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            response_code: code,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The envelope a client hands back when an attempt failed locally.
    pub fn sentinel() -> Self {
        Self {
            response_code: FAILURE_CODE,
            data: None,
            message: None,
        }
    }

    /// Returns `true` if `response_code` is the success marker.
    pub fn is_success(&self) -> bool {
        self.response_code == SUCCESS_CODE
    }

    /// Deserializes the payload into the given type.
    pub fn parse_data<T: for<'de> Deserialize<'de>>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.data {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }
}
