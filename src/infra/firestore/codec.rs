//! Firestore REST typed-value encoding for book documents.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::model::book::BookDocument;
use crate::domain::model::isbn::Isbn;
use crate::domain::repository::StoredCreatedAt;

/// Subset of Firestore's `Value` union that book documents use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    StringValue(String),
    /// int64 travels as a decimal string.
    IntegerValue(String),
    /// RFC 3339, UTC, microsecond precision.
    TimestampValue(String),
}

impl Value {
    fn string(s: &str) -> Self {
        Self::StringValue(s.to_string())
    }

    fn integer(n: u32) -> Self {
        Self::IntegerValue(n.to_string())
    }

    fn timestamp(t: DateTime<Utc>) -> Self {
        Self::TimestampValue(t.to_rfc3339_opts(SecondsFormat::Micros, true))
    }
}

pub type Fields = BTreeMap<&'static str, Value>;

/// Encodes every payload field of `doc`.
pub fn encode_document(doc: &BookDocument) -> Fields {
    BTreeMap::from([
        ("title", Value::string(&doc.title)),
        ("author", Value::string(&doc.author)),
        ("isbn", Value::string(doc.isbn.as_str())),
        ("description", Value::string(&doc.description)),
        ("coverUrl", Value::string(&doc.cover_url)),
        ("category", Value::string(&doc.category)),
        ("totalCopies", Value::integer(doc.inventory.total_copies())),
        (
            "availableCopies",
            Value::integer(doc.inventory.available_copies()),
        ),
        ("publishedDate", Value::string(&doc.published_date)),
        ("createdAt", Value::timestamp(doc.created_at)),
        ("updatedAt", Value::timestamp(doc.updated_at)),
    ])
}

/// Reads `createdAt` from a stored document's raw fields.
///
/// A `timestampValue` decodes to [`StoredCreatedAt::At`]. A missing field or a
/// falsy value (null, `false`, zero, empty string) is
/// [`StoredCreatedAt::Absent`]. Anything else is [`StoredCreatedAt::Opaque`],
/// so an update leaves it exactly as stored.
pub fn decode_created_at(fields: &HashMap<String, serde_json::Value>) -> StoredCreatedAt {
    let Some(value) = fields.get(BookDocument::CREATED_AT_PATH) else {
        return StoredCreatedAt::Absent;
    };
    if is_falsy(value) {
        return StoredCreatedAt::Absent;
    }
    value
        .get("timestampValue")
        .and_then(serde_json::Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map_or(StoredCreatedAt::Opaque, |t| {
            StoredCreatedAt::At(t.with_timezone(&Utc))
        })
}

fn is_falsy(value: &serde_json::Value) -> bool {
    use serde_json::Value as Json;

    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return true;
    };
    match (kind.as_str(), inner) {
        ("nullValue", _) => true,
        ("booleanValue", Json::Bool(b)) => !b,
        ("integerValue", Json::String(n)) => n.parse::<i64>() == Ok(0),
        ("doubleValue", n) => n.as_f64().is_some_and(|f| f == 0.0),
        ("stringValue", Json::String(s)) => s.is_empty(),
        _ => false,
    }
}

/// `runQuery` body: first document in `collection` whose `isbn` equals `isbn`.
pub fn isbn_query(collection: &str, isbn: &Isbn) -> serde_json::Value {
    serde_json::json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "isbn" },
                    "op": "EQUAL",
                    "value": { "stringValue": isbn.as_str() }
                }
            },
            "limit": 1
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use insta::assert_snapshot;

    use super::*;
    use crate::domain::catalog::CATALOG;

    fn fields(json: serde_json::Value) -> HashMap<String, serde_json::Value> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn encodes_typed_fields() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        let doc = BookDocument::from_record(&CATALOG[25], 25, now).unwrap();
        let json = serde_json::to_string_pretty(&encode_document(&doc)).unwrap();
        assert_snapshot!(json, @r#"
        {
          "author": {
            "stringValue": "J.R.R. Tolkien"
          },
          "availableCopies": {
            "integerValue": "1"
          },
          "category": {
            "stringValue": "Fantasy"
          },
          "coverUrl": {
            "stringValue": "https://covers.openlibrary.org/b/isbn/9780547928227-L.jpg"
          },
          "createdAt": {
            "timestampValue": "2026-10-16T08:30:00.000000Z"
          },
          "description": {
            "stringValue": "Bilbo Baggins sets out on an unexpected journey."
          },
          "isbn": {
            "stringValue": "9780547928227"
          },
          "publishedDate": {
            "stringValue": "2012"
          },
          "title": {
            "stringValue": "The Hobbit"
          },
          "totalCopies": {
            "integerValue": "2"
          },
          "updatedAt": {
            "timestampValue": "2026-10-16T08:30:00.000000Z"
          }
        }
        "#);
    }

    #[test]
    fn encoded_keys_match_field_paths() {
        let doc = BookDocument::from_record(&CATALOG[0], 0, Utc::now()).unwrap();
        let encoded = encode_document(&doc);
        let mut expected = BookDocument::FIELD_PATHS.to_vec();
        expected.sort_unstable();
        assert_eq!(encoded.keys().copied().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn decodes_timestamp_created_at() {
        let raw = fields(serde_json::json!({
            "createdAt": { "timestampValue": "2024-05-01T10:00:00.123456Z" }
        }));
        let expected = Utc
            .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();
        assert_eq!(decode_created_at(&raw), StoredCreatedAt::At(expected));
    }

    #[test]
    fn missing_or_falsy_created_at_is_absent() {
        assert_eq!(decode_created_at(&HashMap::new()), StoredCreatedAt::Absent);
        for falsy in [
            serde_json::json!({ "nullValue": null }),
            serde_json::json!({ "booleanValue": false }),
            serde_json::json!({ "integerValue": "0" }),
            serde_json::json!({ "stringValue": "" }),
        ] {
            let raw = fields(serde_json::json!({ "createdAt": falsy }));
            assert_eq!(decode_created_at(&raw), StoredCreatedAt::Absent, "{falsy}");
        }
    }

    #[test]
    fn other_created_at_values_are_opaque() {
        for kept in [
            serde_json::json!({ "stringValue": "yesterday" }),
            serde_json::json!({ "stringValue": "2024-05-01T10:00:00Z" }),
            serde_json::json!({ "integerValue": "1700000000" }),
            serde_json::json!({ "mapValue": { "fields": {} } }),
            serde_json::json!({ "timestampValue": "not a time" }),
        ] {
            let raw = fields(serde_json::json!({ "createdAt": kept }));
            assert_eq!(decode_created_at(&raw), StoredCreatedAt::Opaque, "{kept}");
        }
    }

    #[test]
    fn isbn_query_filters_and_limits() {
        let isbn = Isbn::parse("9780132350884").unwrap();
        let query = isbn_query("books", &isbn);
        let sq = &query["structuredQuery"];
        assert_eq!(sq["from"][0]["collectionId"], "books");
        assert_eq!(sq["where"]["fieldFilter"]["field"]["fieldPath"], "isbn");
        assert_eq!(sq["where"]["fieldFilter"]["op"], "EQUAL");
        assert_eq!(
            sq["where"]["fieldFilter"]["value"]["stringValue"],
            "9780132350884"
        );
        assert_eq!(sq["limit"], 1);
    }
}
