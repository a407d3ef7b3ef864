//! Case conversion for API: request keys camelCase -> snake_case (for DB), response keys snake_case -> camelCase (for client).

use serde_json::{Map, Value};

/// Convert a single identifier from snake_case to camelCase.
/// e.g. "user_id" -> "userId", "created_at" -> "createdAt"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a single identifier from camelCase to snake_case.
/// e.g. "userId" -> "user_id", "createdAt" -> "created_at"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert all keys of a JSON object from snake_case to camelCase (in place).
/// Used for API responses so the client receives camelCase keys.
pub fn object_keys_to_camel_case(obj: &mut Map<String, Value>) {
    let keys: Vec<String> = obj.keys().cloned().collect();
    for k in keys {
        let camel = to_camel_case(&k);
        if camel != k {
            if let Some(v) = obj.remove(&k) {
                obj.insert(camel, v);
            }
        }
    }
}

/// Convert all keys of a JSON object from camelCase to snake_case (in place).
/// Used for request bodies so we use snake_case for DB column names.
pub fn object_keys_to_snake_case(obj: &mut Map<String, Value>) {
    let keys: Vec<String> = obj.keys().cloned().collect();
    for k in keys {
        let snake = to_snake_case(&k);
        if snake != k {
            if let Some(v) = obj.remove(&k) {
                obj.insert(snake, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_identifiers() {
        assert_eq!(to_camel_case("mobile_number"), "mobileNumber");
        assert_eq!(to_camel_case("is_active"), "isActive");
        assert_eq!(to_camel_case("created_at"), "createdAt");
        assert_eq!(to_camel_case("gstin"), "gstin");
        assert_eq!(to_camel_case("id"), "id");
    }

    #[test]
    fn snake_case_identifiers() {
        assert_eq!(to_snake_case("mobileNumber"), "mobile_number");
        assert_eq!(to_snake_case("invoiceNumber"), "invoice_number");
        assert_eq!(to_snake_case("gstin"), "gstin");
        assert_eq!(to_snake_case("id"), "id");
    }

    #[test]
    fn object_keys_round_trip() {
        let Value::Object(mut obj) = json!({"itemsName": "Widget", "invoiceId": 3}) else {
            unreachable!()
        };
        object_keys_to_snake_case(&mut obj);
        assert!(obj.contains_key("items_name"));
        assert!(obj.contains_key("invoice_id"));
        object_keys_to_camel_case(&mut obj);
        assert!(obj.contains_key("itemsName"));
        assert!(obj.contains_key("invoiceId"));
    }
}
