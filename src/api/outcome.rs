use serde::de::DeserializeOwned;
use serde_json::Value;

/// Uniform result of every network operation.
///
/// Exactly one of `data` or `error` is set, except for transport-level
/// failure where `status` is 0, `error` is set, and `data` is absent. A
/// successful response always sets `data` when a body was present and never
/// sets `error`.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub status: u16,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn success(status: u16, data: Option<T>) -> Self {
        Self {
            status,
            data,
            error: None,
        }
    }

    pub fn failure(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Failure with no HTTP response behind it: no status to report.
    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self::failure(0, error)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

/// Response payload as interpreted from the declared content type:
/// structured JSON, or the raw body text for everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    /// The conventional `message` field of a structured error body
    pub(crate) fn server_message(&self) -> Option<String> {
        match self {
            Body::Json(value) => value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            Body::Text(_) => None,
        }
    }
}

impl Outcome<Body> {
    /// Decode a structured payload into `T`. A payload that does not match
    /// the expected shape becomes a status-0 outcome; outcomes without data
    /// pass through unchanged.
    pub fn into_json<T: DeserializeOwned>(self) -> Outcome<T> {
        let Self {
            status,
            data,
            error,
        } = self;
        match data {
            Some(Body::Json(value)) => match serde_json::from_value(value) {
                Ok(parsed) => Outcome {
                    status,
                    data: Some(parsed),
                    error,
                },
                Err(e) => Outcome::transport_failure(format!("malformed response body: {e}")),
            },
            Some(Body::Text(_)) => {
                Outcome::transport_failure("expected a structured response body")
            }
            None => Outcome {
                status,
                data: None,
                error,
            },
        }
    }

    /// Take the payload as raw text. A JSON string value is accepted; any
    /// other structured payload becomes a status-0 outcome.
    pub fn into_text(self) -> Outcome<String> {
        let Self {
            status,
            data,
            error,
        } = self;
        match data {
            Some(Body::Text(text)) => Outcome {
                status,
                data: Some(text),
                error,
            },
            Some(Body::Json(Value::String(text))) => Outcome {
                status,
                data: Some(text),
                error,
            },
            Some(Body::Json(_)) => Outcome::transport_failure("expected a text response body"),
            None => Outcome {
                status,
                data: None,
                error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: u32,
    }

    #[test]
    fn test_into_json_decodes_payload() {
        let outcome = Outcome::success(200, Some(Body::Json(json!({"id": 7}))));
        let typed = outcome.into_json::<Record>();
        assert_eq!(typed.status, 200);
        assert_eq!(typed.data, Some(Record { id: 7 }));
        assert_eq!(typed.error, None);
    }

    #[test]
    fn test_into_json_rejects_mismatched_shape() {
        let outcome = Outcome::success(200, Some(Body::Json(json!({"id": "seven"}))));
        let typed = outcome.into_json::<Record>();
        assert_eq!(typed.status, 0);
        assert_eq!(typed.data, None);
        assert!(typed.error.unwrap().contains("malformed response body"));
    }

    #[test]
    fn test_into_json_passes_failures_through() {
        let outcome: Outcome<Body> = Outcome::failure(404, "Not found");
        let typed = outcome.into_json::<Record>();
        assert_eq!(typed.status, 404);
        assert_eq!(typed.error.as_deref(), Some("Not found"));
        assert_eq!(typed.data, None);
    }

    #[test]
    fn test_into_text_accepts_raw_and_json_strings() {
        let raw = Outcome::success(200, Some(Body::Text("abc".to_string())));
        assert_eq!(raw.into_text().data.as_deref(), Some("abc"));

        let quoted = Outcome::success(200, Some(Body::Json(json!("abc"))));
        assert_eq!(quoted.into_text().data.as_deref(), Some("abc"));

        let object = Outcome::success(200, Some(Body::Json(json!({"a": 1}))));
        assert_eq!(object.into_text().status, 0);
    }

    #[test]
    fn test_server_message_extraction() {
        let body = Body::Json(json!({"message": "Invalid credentials"}));
        assert_eq!(body.server_message().as_deref(), Some("Invalid credentials"));

        assert_eq!(Body::Json(json!({"code": 3})).server_message(), None);
        assert_eq!(Body::Text("oops".to_string()).server_message(), None);
    }

    #[test]
    fn test_transport_failure_has_status_zero() {
        let outcome: Outcome<Body> = Outcome::transport_failure("network error");
        assert_eq!(outcome.status, 0);
        assert!(!outcome.is_success());
    }
}
