use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a KV v2 style secrets store (Vault and compatibles).
///
/// Blocking on purpose, the entrypoint makes a single request at container
/// start and nothing else runs concurrently with it.
pub struct KvClient {
    http: reqwest::blocking::Client,
    addr: String,
    token: String,
    mount: String,
}

impl KvClient {
    pub fn new(
        addr: impl Into<String>,
        token: impl Into<String>,
        mount: impl Into<String>,
    ) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            addr: addr.into().trim_end_matches('/').to_string(),
            token: token.into(),
            mount: mount.into(),
        })
    }

    /// Fetch a single secret by name.
    pub fn get(&self, name: &str) -> Result<KvSecret, Error> {
        let url = format!("{}/v1/{}/data/{}", self.addr, self.mount, name);

        let response = self
            .http
            .get(&url)
            .header("X-Vault-Token", &self.token)
            .send()?;

        if !response.status().is_success() {
            return Err(Error::Status {
                name: name.to_string(),
                status: response.status(),
            });
        }

        parse_kv_response(name, &response.text()?)
    }
}

// KV v2 wraps the key-value pairs in two layers of "data", the outer one
// carries version metadata we don't use
#[derive(Deserialize)]
struct KvResponse {
    data: KvData,
}

#[derive(Deserialize)]
struct KvData {
    data: serde_json::Map<String, serde_json::Value>,
}

/// A fetched secret, a named bag of JSON key-value pairs.
#[derive(Debug)]
pub struct KvSecret {
    name: String,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl KvSecret {
    /// Extract a single field as a [`SecretString`] so the value is zeroized
    /// on drop and can't end up in a Debug print.
    ///
    /// Strings are taken verbatim, numbers and bools are stringified, any
    /// other JSON value is treated as absent.
    pub fn field(&self, field: &str) -> Result<SecretString, Error> {
        let value = match self.fields.get(field) {
            Some(serde_json::Value::String(val)) => val.clone(),
            Some(serde_json::Value::Number(val)) => val.to_string(),
            Some(serde_json::Value::Bool(val)) => val.to_string(),
            _ => {
                return Err(Error::MissingField {
                    name: self.name.clone(),
                    field: field.to_string(),
                })
            }
        };

        Ok(SecretString::from(value))
    }
}

fn parse_kv_response(name: &str, body: &str) -> Result<KvSecret, Error> {
    let response = serde_json::from_str::<KvResponse>(body).map_err(|source| Error::Payload {
        name: name.to_string(),
        source,
    })?;

    Ok(KvSecret {
        name: name.to_string(),
        fields: response.data.data,
    })
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    // trimmed-down capture of an actual KV v2 read response
    const KV_BODY: &str = r#"{
        "request_id": "7c0cb397-4a52-9d0c-3ef4-8f8bfb7e812c",
        "data": {
            "data": {
                "database_password": "hunter2",
                "port": 5432,
                "tls": true,
                "tags": ["a", "b"]
            },
            "metadata": {
                "created_time": "2024-04-09T09:48:00.000000Z",
                "version": 3
            }
        }
    }"#;

    #[test]
    fn parse_kv_response_test() {
        let secret = parse_kv_response("chat/prod", KV_BODY).unwrap();

        assert_eq!(
            secret.field("database_password").unwrap().expose_secret(),
            "hunter2"
        );
    }

    #[test]
    fn field_stringifies_scalars_test() {
        let secret = parse_kv_response("chat/prod", KV_BODY).unwrap();

        assert_eq!(secret.field("port").unwrap().expose_secret(), "5432");
        assert_eq!(secret.field("tls").unwrap().expose_secret(), "true");
    }

    #[test]
    fn field_missing_or_unusable_test() {
        let secret = parse_kv_response("chat/prod", KV_BODY).unwrap();

        assert!(matches!(
            secret.field("nonexistent"),
            Err(Error::MissingField { .. })
        ));
        // arrays aren't a value we can export
        assert!(matches!(
            secret.field("tags"),
            Err(Error::MissingField { .. })
        ));
    }

    #[test]
    fn parse_kv_response_invalid_test() {
        let err = parse_kv_response("chat/prod", "{\"errors\":[]}").unwrap_err();

        // the error mentions the secret name, not the body
        assert!(err.to_string().contains("chat/prod"));
    }

    #[test]
    fn client_trims_trailing_slash_test() {
        let client = KvClient::new("http://vault:8200/", "token", "secret").unwrap();

        assert_eq!(client.addr, "http://vault:8200");
    }
}
