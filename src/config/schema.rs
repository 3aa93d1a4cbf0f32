use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "listen": { "type": "string" }
                }
            },
            "runs": {
                "type": "object",
                "properties": {
                    "max_concurrent": { "type": "integer", "minimum": 1 },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "scratch_root": { "type": "string" }
                }
            },
            "catalog": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" }
                }
            },
            "secrets": {
                "type": "object",
                "properties": {
                    "artifact": { "type": "string" }
                }
            },
            "reporting": {
                "type": "object",
                "properties": {
                    "sink": { "type": "string" }
                }
            }
        },
        "additionalProperties": false
    })
});
