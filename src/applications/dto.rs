use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repo::ApplicationDetails;

/// `jobId` and `userId` arrive either as numbers or as numeric strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub job_id: Option<Value>,
    pub user_id: Option<Value>,
}

/// Reads a positive row id out of a loosely typed JSON value.
pub fn wire_id(value: &Value) -> Option<i32> {
    let id = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}

#[derive(Debug, Serialize)]
pub struct CreatedApplicationResponse {
    pub message: &'static str,
    pub application: ApplicationDetails,
}
