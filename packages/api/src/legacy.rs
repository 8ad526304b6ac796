//! # Legacy per-server lookups
//!
//! Each physical server runs an older PHP endpoint answering `opr=` actions
//! (`?opr=getUsers`, `?opr=getDevices`, `?opr=getComplaintTypes`). Which URL
//! belongs to which server comes from the `[[servers]]` table of
//! `console.toml`, wrapped in a [`ServerDirectory`]. Asking for a server that
//! is not in the table is an explicit [`ApiError::UnknownServer`].
//!
//! ## Response shapes
//!
//! The endpoints were written at different times and disagree on shape.
//! [`unwrap_records`] accepts all of the ones seen in the wild:
//!
//! | Shape | Example |
//! |-------|---------|
//! | bare array | `[{"id": 1, "name": "A"}]` |
//! | wrapped array | `{"data": [...]}`, `{"result": [...]}`, `{"rows": [...]}`, `{"records": [...]}` |
//! | JSON inside a string | `"[{\"id\": 1}]"` |
//! | failure object | `{"status": false, "message": "Invalid opr"}` |
//! | single object | `{"id": 1, "name": "A"}` |
//! | `null` | no rows |
//!
//! Every cell is stringified for display; `null` becomes `N/A`.

use helpdesk_store::{ConsoleConfig, ServerEndpoint};
use reqwest::{Method, Request};
use serde_json::{Map, Value};

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacyAction {
    Users,
    Devices,
    ComplaintTypes,
}

impl LegacyAction {
    pub const ALL: [LegacyAction; 3] = [Self::Users, Self::Devices, Self::ComplaintTypes];

    pub fn opr(self) -> &'static str {
        match self {
            Self::Users => "getUsers",
            Self::Devices => "getDevices",
            Self::ComplaintTypes => "getComplaintTypes",
        }
    }

    pub fn from_opr(opr: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.opr() == opr)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Devices => "Devices",
            Self::ComplaintTypes => "Complaint types",
        }
    }
}

/// Configured legacy endpoints keyed by server id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServerDirectory {
    servers: Vec<ServerEndpoint>,
}

impl ServerDirectory {
    pub fn new(servers: Vec<ServerEndpoint>) -> Self {
        Self { servers }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.servers.clone())
    }

    pub fn servers(&self) -> &[ServerEndpoint] {
        &self.servers
    }

    pub fn resolve(&self, server_id: &str) -> Result<&ServerEndpoint, ApiError> {
        self.servers
            .iter()
            .find(|s| s.id == server_id)
            .ok_or_else(|| ApiError::UnknownServer(server_id.to_string()))
    }
}

/// One row of a legacy lookup, in the order the endpoint sent the fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegacyRecord {
    pub fields: Vec<(String, String)>,
}

impl LegacyRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct LegacyClient {
    http: reqwest::Client,
    directory: ServerDirectory,
}

impl PartialEq for LegacyClient {
    fn eq(&self, other: &Self) -> bool {
        self.directory == other.directory
    }
}

impl LegacyClient {
    pub fn new(directory: ServerDirectory) -> Self {
        Self {
            http: reqwest::Client::new(),
            directory,
        }
    }

    pub fn directory(&self) -> &ServerDirectory {
        &self.directory
    }

    pub fn request(
        &self,
        server_id: &str,
        action: LegacyAction,
        search: Option<&str>,
    ) -> Result<Request, ApiError> {
        let endpoint = self.directory.resolve(server_id)?;
        let mut pairs = vec![("opr", action.opr().to_string())];
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        Ok(self
            .http
            .request(Method::GET, endpoint.base_url.as_str())
            .query(&pairs)
            .build()?)
    }

    pub async fn lookup(
        &self,
        server_id: &str,
        action: LegacyAction,
        search: Option<&str>,
    ) -> Result<Vec<LegacyRecord>, ApiError> {
        let request = self.request(server_id, action, search)?;
        tracing::debug!("Legacy lookup {} on {}", action.opr(), server_id);
        let response = self.http.execute(request).await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
                message: crate::client::error_message(status, &text),
            });
        }
        let value = serde_json::from_str(&text)
            .unwrap_or_else(|_| Value::String(text.clone()));
        unwrap_records(value)
    }
}

const WRAPPER_KEYS: [&str; 4] = ["data", "result", "rows", "records"];

/// Normalise any known legacy response shape into rows.
pub fn unwrap_records(value: Value) -> Result<Vec<LegacyRecord>, ApiError> {
    unwrap_at_depth(value, 0)
}

fn unwrap_at_depth(value: Value, depth: u8) -> Result<Vec<LegacyRecord>, ApiError> {
    if depth > 3 {
        return Err(ApiError::Legacy("response nested too deeply".to_string()));
    }
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.into_iter().map(record_from_item).collect()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(Vec::new());
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(inner) if !inner.is_string() => unwrap_at_depth(inner, depth + 1),
                _ => Err(ApiError::Legacy(format!("unexpected response: {}", truncate(trimmed)))),
            }
        }
        Value::Object(mut map) => {
            if is_failure(&map) {
                return Err(ApiError::Legacy(failure_message(&map)));
            }
            for key in WRAPPER_KEYS {
                if let Some(inner) = map.remove(key) {
                    return unwrap_at_depth(inner, depth + 1);
                }
            }
            for flag in FLAG_KEYS {
                if map.get(flag).is_some_and(Value::is_boolean) {
                    map.remove(flag);
                }
            }
            if map.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![record_from_map(map)])
            }
        }
        other => Err(ApiError::Legacy(format!("unexpected response: {other}"))),
    }
}

const FLAG_KEYS: [&str; 2] = ["status", "success"];
const MESSAGE_KEYS: [&str; 3] = ["message", "msg", "error"];

/// A numeric `status` is only a failure flag on a bare envelope; on a record
/// it is a data column such as a device state.
fn is_failure(map: &Map<String, Value>) -> bool {
    let flag = map.get("status").or_else(|| map.get("success"));
    match flag {
        Some(Value::Bool(ok)) => !ok,
        Some(Value::String(s)) => matches!(s.to_lowercase().as_str(), "error" | "fail" | "failed" | "false"),
        Some(Value::Number(n)) => n.as_i64() == Some(0) && is_bare_envelope(map),
        _ => false,
    }
}

fn is_bare_envelope(map: &Map<String, Value>) -> bool {
    map.keys()
        .all(|k| FLAG_KEYS.contains(&k.as_str()) || MESSAGE_KEYS.contains(&k.as_str()))
}

fn failure_message(map: &Map<String, Value>) -> String {
    MESSAGE_KEYS
        .into_iter()
        .find_map(|k| map.get(k).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| "the server reported a failure".to_string())
}

fn record_from_item(item: Value) -> LegacyRecord {
    match item {
        Value::Object(map) => record_from_map(map),
        scalar => LegacyRecord {
            fields: vec![("value".to_string(), cell(&scalar))],
        },
    }
}

fn record_from_map(map: Map<String, Value>) -> LegacyRecord {
    LegacyRecord {
        fields: map.iter().map(|(k, v)| (k.clone(), cell(v))).collect(),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::String(s) if s.trim().is_empty() => "N/A".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        other => other.to_string(),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= 60 {
        text.to_string()
    } else {
        format!("{}…", text.chars().take(60).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directory() -> ServerDirectory {
        ServerDirectory::new(vec![ServerEndpoint {
            id: "alpha".into(),
            name: "Alpha".into(),
            base_url: "http://alpha.local/api.php".into(),
        }])
    }

    #[test]
    fn test_request_uses_configured_base_url() {
        let client = LegacyClient::new(directory());
        let request = client
            .request("alpha", LegacyAction::Devices, Some(" 1234 "))
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://alpha.local/api.php?opr=getDevices&search=1234"
        );
    }

    #[test]
    fn test_unknown_server_is_an_error() {
        let client = LegacyClient::new(directory());
        let err = client.request("omega", LegacyAction::Users, None).unwrap_err();
        assert!(matches!(err, ApiError::UnknownServer(id) if id == "omega"));
    }

    #[test]
    fn test_bare_and_wrapped_arrays() {
        let bare = unwrap_records(json!([{"id": 1, "name": "A"}])).unwrap();
        let wrapped = unwrap_records(json!({"status": true, "data": [{"id": 1, "name": "A"}]})).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].get("id"), Some("1"));
        assert_eq!(bare[0].get("name"), Some("A"));

        let rows = unwrap_records(json!({"rows": [{"x": null}]})).unwrap();
        assert_eq!(rows[0].get("x"), Some("N/A"));
    }

    #[test]
    fn test_json_inside_string() {
        let rows = unwrap_records(json!("{\"result\": [\"Leak\", \"Noise\"]}")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("value"), Some("Noise"));
    }

    #[test]
    fn test_failure_object_surfaces_message() {
        let err = unwrap_records(json!({"status": "error", "msg": "Invalid opr"})).unwrap_err();
        assert_eq!(err.to_string(), "Invalid opr");

        let err = unwrap_records(json!({"success": false})).unwrap_err();
        assert_eq!(err.to_string(), "the server reported a failure");
    }

    #[test]
    fn test_numeric_status_on_record_is_data() {
        let rows = unwrap_records(json!({"deviceId": "D-7", "status": 0})).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("status"), Some("0"));
        assert_eq!(rows[0].get("deviceId"), Some("D-7"));

        let err = unwrap_records(json!({"status": 0, "message": "No such device"})).unwrap_err();
        assert_eq!(err.to_string(), "No such device");
    }

    #[test]
    fn test_single_object_and_null() {
        let rows = unwrap_records(json!({"id": 3, "active": true})).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields, vec![("id".into(), "3".into()), ("active".into(), "Yes".into())]);

        assert!(unwrap_records(Value::Null).unwrap().is_empty());
        assert!(unwrap_records(json!({"data": null})).unwrap().is_empty());
    }

    #[test]
    fn test_plain_text_is_rejected() {
        assert!(unwrap_records(json!("Unsupported server")).is_err());
        assert!(unwrap_records(json!(42)).is_err());
    }

    #[test]
    fn test_action_round_trip() {
        for action in LegacyAction::ALL {
            assert_eq!(LegacyAction::from_opr(action.opr()), Some(action));
        }
    }
}
