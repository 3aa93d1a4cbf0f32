use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CATALOG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["cases"],
        "properties": {
            "cases": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["id", "class", "description", "trigger", "oracle"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "class": {
                            "type": "string",
                            "enum": [
                                "command_injection", "code_evaluation", "token_issuance",
                                "file_write", "query_construction", "buffer_copy",
                                "secret_disclosure", "weak_random"
                            ]
                        },
                        "description": { "type": "string" },
                        "trigger": {
                            "type": "object",
                            "required": ["kind"],
                            "properties": { "kind": { "type": "string" } }
                        },
                        "oracle": {
                            "type": "object",
                            "required": ["kind"],
                            "properties": { "kind": { "type": "string" } }
                        },
                        "isolation": {
                            "type": "string",
                            "enum": ["none", "filesystem", "process"]
                        }
                    }
                }
            }
        }
    })
});
