//! Request validation from the registry rule sets. Collects every violation
//! instead of stopping at the first, so the caller can return the full list.

use crate::error::AppError;
use crate::registry::{EntityDef, FieldRule, RuleKind};
use regex::Regex;
use serde_json::{Map, Value};

const EMAIL: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Validate a camelCase request body against an entity's rule set. Returns the
/// ordered violation list on failure; storage must not be touched in that case.
pub fn validate(entity: &EntityDef, body: &Map<String, Value>) -> Result<(), AppError> {
    let mut violations = Vec::new();
    for rule in entity.rules {
        check_rule(rule, body.get(rule.field), &mut violations);
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}

fn check_rule(rule: &FieldRule, value: Option<&Value>, violations: &mut Vec<String>) {
    let value = match value {
        None | Some(Value::Null) => {
            if rule.required {
                violations.push(format!("{} is required", rule.field));
            }
            return;
        }
        Some(v) => v,
    };
    if let Some(msg) = check_kind(rule.field, value, &rule.kind) {
        violations.push(msg);
    }
}

fn check_kind(field: &str, value: &Value, kind: &RuleKind) -> Option<String> {
    match kind {
        RuleKind::Text { min, max } => {
            let s = match value.as_str() {
                Some(s) => s,
                None => return Some(format!("{} must be a string", field)),
            };
            let len = s.chars().count();
            if len < *min {
                return Some(format!("{} must be at least {} characters", field, min));
            }
            if len > *max {
                return Some(format!("{} must be at most {} characters", field, max));
            }
            None
        }
        RuleKind::Pattern { pattern, hint } => {
            let s = match value.as_str() {
                Some(s) => s,
                None => return Some(format!("{} must be a string", field)),
            };
            match Regex::new(pattern) {
                Ok(re) if re.is_match(s) => None,
                Ok(_) => Some(format!("{} {}", field, hint)),
                Err(_) => Some(format!("invalid pattern for {}", field)),
            }
        }
        RuleKind::Integer { positive } => {
            let n = match value.as_i64() {
                Some(n) => n,
                None => {
                    return Some(if *positive {
                        format!("{} must be a positive integer", field)
                    } else {
                        format!("{} must be an integer", field)
                    })
                }
            };
            if *positive && n <= 0 {
                return Some(format!("{} must be a positive integer", field));
            }
            None
        }
        RuleKind::Number { positive } => {
            let n = match value.as_f64() {
                Some(n) => n,
                None => return Some(format!("{} must be a number", field)),
            };
            if *positive && n <= 0.0 {
                return Some(format!("{} must be a positive number", field));
            }
            None
        }
        RuleKind::Email => {
            let ok = value
                .as_str()
                .map(|s| Regex::new(EMAIL).map(|re| re.is_match(s)).unwrap_or(false))
                .unwrap_or(false);
            if ok {
                None
            } else {
                Some(format!("{} must be a valid email address", field))
            }
        }
        RuleKind::Date => {
            let ok = value.as_str().map(date_shaped).unwrap_or(false);
            if ok {
                None
            } else {
                Some(format!("{} must be a valid date (YYYY-MM-DD)", field))
            }
        }
        RuleKind::Boolean => {
            if value.is_boolean() {
                None
            } else {
                Some(format!("{} must be a boolean", field))
            }
        }
    }
}

fn date_shaped(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || chrono::DateTime::parse_from_rfc3339(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::by_path;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("test body must be an object"),
        }
    }

    #[test]
    fn valid_user_passes() {
        let user = by_path("user").unwrap();
        let b = body(json!({
            "username": "testuser",
            "password": "password123",
            "email": "testuser@example.com",
            "mobileNumber": "1234567890",
        }));
        assert!(validate(user, &b).is_ok());
    }

    #[test]
    fn invalid_user_collects_all_violations() {
        let user = by_path("user").unwrap();
        let b = body(json!({
            "username": "ab",
            "password": "123",
            "email": "invalidemail",
            "mobileNumber": "12345",
        }));
        let err = validate(user, &b).unwrap_err();
        let AppError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 4);
        assert!(violations[0].contains("username"));
        assert!(violations[1].contains("password"));
        assert!(violations[2].contains("email"));
        assert!(violations[3].contains("mobileNumber"));
    }

    #[test]
    fn missing_fields_are_reported_per_field() {
        let user = by_path("user").unwrap();
        let err = validate(user, &body(json!({}))).unwrap_err();
        let AppError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            violations,
            vec![
                "username is required",
                "password is required",
                "email is required",
                "mobileNumber is required",
            ]
        );
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        let client = by_path("client").unwrap();
        let b = body(json!({
            "name": "Acme Traders",
            "email": "billing@acme.example",
            "address": "12 Market Road",
            "mobileNumber": "9876543210",
            "gstin": null,
        }));
        assert!(validate(client, &b).is_ok());
    }

    #[test]
    fn gstin_is_format_checked_when_present() {
        let client = by_path("client").unwrap();
        let mut b = body(json!({
            "name": "Acme Traders",
            "email": "billing@acme.example",
            "address": "12 Market Road",
            "mobileNumber": "9876543210",
            "gstin": "22AAAAA0000A1Z5",
        }));
        assert!(validate(client, &b).is_ok());
        b.insert("gstin".into(), json!("not-a-gstin"));
        let err = validate(client, &b).unwrap_err();
        assert!(err.to_string().contains("gstin"));
    }

    #[test]
    fn ifsc_pattern() {
        let bank = by_path("bankDetails").unwrap();
        let mut b = body(json!({
            "accountNumber": "1234567890",
            "ifsc": "HDFC0001234",
            "bankName": "HDFC Bank",
            "userId": 1,
        }));
        assert!(validate(bank, &b).is_ok());
        b.insert("ifsc".into(), json!("hdfc0001234"));
        assert!(validate(bank, &b).is_err());
        b.insert("ifsc".into(), json!("HDFC1001234"));
        assert!(validate(bank, &b).is_err());
    }

    #[test]
    fn due_date_shapes() {
        let invoice = by_path("Invoice").unwrap();
        let mut b = body(json!({
            "invoiceNumber": "INV-2024-001",
            "dueDate": "2024-01-31",
            "clientId": 7,
        }));
        assert!(validate(invoice, &b).is_ok());
        b.insert("dueDate".into(), json!("2024-01-31T00:00:00Z"));
        assert!(validate(invoice, &b).is_ok());
        b.insert("dueDate".into(), json!("31/01/2024"));
        assert!(validate(invoice, &b).is_err());
    }

    #[test]
    fn quantity_and_rate_must_be_positive() {
        let items = by_path("itemsDetails").unwrap();
        let mut b = body(json!({
            "itemsName": "Widget",
            "quantity": 2,
            "rate": 99.5,
            "invoiceId": 1,
        }));
        assert!(validate(items, &b).is_ok());
        b.insert("quantity".into(), json!(0));
        assert!(validate(items, &b).is_err());
        b.insert("quantity".into(), json!(2));
        b.insert("rate".into(), json!(-1.0));
        assert!(validate(items, &b).is_err());
        b.insert("rate".into(), json!(2.5));
        assert!(validate(items, &b).is_ok());
    }

    #[test]
    fn quantity_must_be_an_integer() {
        let items = by_path("itemsDetails").unwrap();
        let b = body(json!({
            "itemsName": "Widget",
            "quantity": 1.5,
            "rate": 10,
            "invoiceId": 1,
        }));
        let err = validate(items, &b).unwrap_err();
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn every_registry_pattern_compiles() {
        use crate::registry::{RuleKind, ENTITIES};
        for entity in ENTITIES {
            for rule in entity.rules {
                if let RuleKind::Pattern { pattern, .. } = &rule.kind {
                    assert!(Regex::new(pattern).is_ok(), "{}: {}", rule.field, pattern);
                }
            }
        }
        assert!(Regex::new(EMAIL).is_ok());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let relations = by_path("userClientRelations").unwrap();
        let b = body(json!({
            "userId": 1,
            "clientId": 2,
            "note": "not a declared field",
        }));
        assert!(validate(relations, &b).is_ok());
    }
}
