//! Embedded JSON Schema documents, one per validated boundary.

pub const PROCESS_RECORD: &str = include_str!("../schemas/process-record.schema.json");
pub const COORDINATOR_LOCATION: &str = include_str!("../schemas/coordinator-location.schema.json");
pub const RAW_MESSAGE_META: &str = include_str!("../schemas/raw-message-meta.schema.json");
pub const MESSAGE_META: &str = include_str!("../schemas/message-meta.schema.json");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_schemas_describe_objects() {
        for json in [PROCESS_RECORD, COORDINATOR_LOCATION, RAW_MESSAGE_META, MESSAGE_META] {
            let value: serde_json::Value = serde_json::from_str(json).expect("valid JSON");
            assert_eq!(value["type"], "object", "{}", value["title"]);
        }
    }
}
