//! Per-rule checks: `when` type, `notify` shape, unknown keys.

use serde_yaml::Value;

use super::ValidationResult;

const RULE_KEYS: &[&str] = &["when", "notify"];

pub(super) fn validate_rule(path: &str, rule: &Value, result: &mut ValidationResult) {
    let mapping = match rule {
        Value::Mapping(m) => m,
        _ => {
            result.error(path, "Rule must be a mapping with `notify` and optional `when`");
            return;
        }
    };

    for key in mapping.keys() {
        match key.as_str() {
            Some(k) if RULE_KEYS.contains(&k) => {}
            Some(k) => result.warn(format!("{path}.{k}"), "Unknown rule field is ignored"),
            None => result.warn(path, "Non-string rule field is ignored"),
        }
    }

    match mapping.get("when") {
        None => {}
        Some(Value::String(condition)) => {
            if condition.trim().is_empty() {
                result.warn(format!("{path}.when"), "Empty condition never matches");
            }
        }
        Some(_) => result.error(format!("{path}.when"), "Condition `when` must be a string"),
    }

    let notify_path = format!("{path}.notify");
    match mapping.get("notify") {
        None | Some(Value::Null) => result.error(notify_path, "Rule requires `notify`"),
        Some(Value::String(topic)) => check_topic_name(&notify_path, topic, result),
        Some(Value::Sequence(topics)) => {
            if topics.is_empty() {
                result.error(notify_path, "`notify` list must name at least one topic");
                return;
            }
            for (i, topic) in topics.iter().enumerate() {
                let topic_path = format!("{notify_path}[{i}]");
                match topic {
                    Value::String(t) => check_topic_name(&topic_path, t, result),
                    _ => result.error(topic_path, "Topic must be a string"),
                }
            }
        }
        Some(_) => result.error(
            notify_path,
            "`notify` must be a topic name or a list of topic names",
        ),
    }
}

fn check_topic_name(path: &str, topic: &str, result: &mut ValidationResult) {
    if topic.trim().is_empty() {
        result.warn(path, "Empty topic name");
    }
}
