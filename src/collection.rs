use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Query string value restricting listings to the identifier field
pub const ID_ONLY_FILTER: &str = r#"{"_id":1}"#;

/// Resource collections exposed by the service, in drain order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Tasks,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Users, Collection::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Only the fields the drain needs; the service also sends `message`.
#[derive(Debug, Deserialize)]
struct ListingResponse {
    data: Vec<ListedRecord>,
}

#[derive(Debug, Deserialize)]
struct ListedRecord {
    #[serde(rename = "_id")]
    id: Value,
}

/// Extract identifiers, in order, from a listing response body.
///
/// String identifiers are returned verbatim; any other JSON value is rendered
/// as its JSON text.
pub fn parse_identifiers(body: &str) -> Result<Vec<String>, serde_json::Error> {
    let listing: ListingResponse = serde_json::from_str(body)?;

    Ok(listing
        .data
        .into_iter()
        .map(|record| match record.id {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}
