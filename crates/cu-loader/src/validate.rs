//! Shape contracts for every boundary of the pipeline.
//!
//! A contract is an embedded JSON Schema plus a handful of refinements the
//! schema cannot express (truthiness, URL syntax). Schemas are open, so
//! validation is a subset check: unknown fields pass through untouched.

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::errors::ValidationError;
use crate::schemas;
use crate::types::{CoordinatorLocation, MessageMetaResult, ProcessRecord, RawMetaResult};

pub struct Contract {
    name: &'static str,
    schema: JSONSchema,
}

impl Contract {
    fn compile(name: &'static str, json: &'static str) -> Self {
        let document: Value =
            serde_json::from_str(json).expect("embedded contract schema must be valid JSON");
        let schema = JSONSchema::compile(&document)
            .unwrap_or_else(|err| panic!("embedded {name} schema must compile: {err}"));
        Self { name, schema }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check `instance` against the schema, reporting every violation.
    pub fn check(&self, instance: &Value) -> Result<(), ValidationError> {
        if let Err(errors) = self.schema.validate(instance) {
            let issues = errors
                .map(|err| format!("{}: {}", format_pointer(&err.instance_path.to_string()), err))
                .collect();
            return Err(ValidationError {
                contract: self.name,
                issues,
            });
        }
        Ok(())
    }

    fn parse<T: DeserializeOwned>(&self, instance: Value) -> Result<T, ValidationError> {
        self.check(&instance)?;
        serde_json::from_value(instance).map_err(|err| ValidationError::new(self.name, err.to_string()))
    }
}

pub static PROCESS_RECORD: Lazy<Contract> =
    Lazy::new(|| Contract::compile("ProcessRecord", schemas::PROCESS_RECORD));
pub static COORDINATOR_LOCATION: Lazy<Contract> =
    Lazy::new(|| Contract::compile("CoordinatorLocation", schemas::COORDINATOR_LOCATION));
pub static RAW_MESSAGE_META: Lazy<Contract> =
    Lazy::new(|| Contract::compile("RawMessageMeta", schemas::RAW_MESSAGE_META));
pub static MESSAGE_META: Lazy<Contract> =
    Lazy::new(|| Contract::compile("MessageMeta", schemas::MESSAGE_META));

fn format_pointer(text: &str) -> String {
    if text.is_empty() { "/".into() } else { text.into() }
}

pub fn parse_process_record(instance: Value) -> Result<ProcessRecord, ValidationError> {
    PROCESS_RECORD.parse(instance)
}

pub fn parse_coordinator_location(instance: Value) -> Result<CoordinatorLocation, ValidationError> {
    let location: CoordinatorLocation = COORDINATOR_LOCATION.parse(instance)?;
    if let Err(err) = Url::parse(&location.url) {
        return Err(ValidationError::new(
            COORDINATOR_LOCATION.name(),
            format!("/url: '{}' is not an absolute URL: {err}", location.url),
        ));
    }
    Ok(location)
}

pub fn parse_raw_message_meta(instance: Value) -> Result<RawMetaResult, ValidationError> {
    RAW_MESSAGE_META.check(&instance)?;
    match instance {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::new(
            RAW_MESSAGE_META.name(),
            format!("/: expected an object, got {other}"),
        )),
    }
}

/// Validate a raw result against the final contract, keeping extra fields.
///
/// `timestamp` must be present and non-zero; `sequenceNumber` must be present
/// and may be zero.
pub fn parse_message_meta(raw: RawMetaResult) -> Result<MessageMetaResult, ValidationError> {
    let instance = Value::Object(raw);
    MESSAGE_META.check(&instance)?;
    if instance.get("timestamp").and_then(Value::as_f64) == Some(0.0) {
        return Err(ValidationError::new(
            MESSAGE_META.name(),
            "/timestamp: must be attached (got 0)",
        ));
    }
    MESSAGE_META.parse(instance)
}
