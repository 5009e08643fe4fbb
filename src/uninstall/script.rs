use serde_json::{Map, Value};

use crate::models::{ExecutionPolicy, PayloadError, ScriptPayload, ScriptRunOptions, StepKind};

/// Keys a script payload may carry; anything else is dropped.
pub const PERMITTED_KEYS: [&str; 3] = ["args", "input", "executable"];

/// Result of normalizing a script payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedScript {
    pub executable: Option<String>,
    pub options: ScriptRunOptions,
    /// Unknown keys that were removed, for the caller to warn about.
    pub dropped_keys: Vec<String>,
}

/// Map a raw script payload onto its canonical form.
///
/// A bare string is shorthand for `{executable: <string>}`. The returned
/// options always run elevated with output captured.
pub fn normalize(raw: &Value, step: StepKind) -> Result<NormalizedScript, PayloadError> {
    let payload: ScriptPayload = serde_json::from_value(raw.clone())
        .map_err(|_| PayloadError::new(step, "expects an executable path or a record"))?;

    let mut entries = match payload {
        ScriptPayload::Executable(executable) => {
            let mut entries = Map::new();
            entries.insert("executable".to_string(), Value::String(executable));
            entries
        }
        ScriptPayload::Detailed(entries) => entries,
    };

    let dropped_keys: Vec<String> = entries
        .keys()
        .filter(|key| !PERMITTED_KEYS.contains(&key.as_str()))
        .cloned()
        .collect();
    for key in &dropped_keys {
        entries.remove(key);
    }

    let executable = match entries.remove("executable") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(_) => return Err(PayloadError::new(step, ":executable must be a string")),
    };

    let args = match entries.remove("args") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<String>>(value)
            .map_err(|_| PayloadError::new(step, ":args must be a list of strings"))?,
    };

    let input = match entries.remove("input") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(_) => return Err(PayloadError::new(step, ":input must be a string")),
    };

    Ok(NormalizedScript {
        executable,
        options: ScriptRunOptions {
            args,
            input,
            policy: ExecutionPolicy::ELEVATED_CAPTURED,
        },
        dropped_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_string_is_the_executable() {
        let n = normalize(&json!("uninstall.sh"), StepKind::Script).unwrap();
        assert_eq!(n.executable.as_deref(), Some("uninstall.sh"));
        assert!(n.options.args.is_empty());
        assert!(n.options.input.is_none());
        assert!(n.dropped_keys.is_empty());
    }

    #[test]
    fn record_keeps_args_and_input() {
        let raw = json!({"executable": "tools/remove", "args": ["--all", "-y"], "input": "yes\n"});
        let n = normalize(&raw, StepKind::Script).unwrap();
        assert_eq!(n.executable.as_deref(), Some("tools/remove"));
        assert_eq!(n.options.args, vec!["--all".to_string(), "-y".to_string()]);
        assert_eq!(n.options.input.as_deref(), Some("yes\n"));
    }

    #[test]
    fn always_elevated_and_captured() {
        let n = normalize(&json!({"executable": "x"}), StepKind::Script).unwrap();
        assert_eq!(n.options.policy, ExecutionPolicy::ELEVATED_CAPTURED);
    }

    #[test]
    fn unknown_keys_are_reported_and_dropped() {
        let raw = json!({"executable": "x", "sudo": false, "must_succeed": true});
        let n = normalize(&raw, StepKind::Script).unwrap();
        assert_eq!(n.dropped_keys, vec!["must_succeed".to_string(), "sudo".to_string()]);
        // The typed options have nowhere to carry them.
        let options = serde_json::to_value(&n.options).unwrap();
        assert!(options.get("sudo").is_none());
        assert_eq!(n.options.policy, ExecutionPolicy::ELEVATED_CAPTURED);
    }

    #[test]
    fn missing_executable_is_absent() {
        let n = normalize(&json!({"args": ["-f"]}), StepKind::Script).unwrap();
        assert_eq!(n.executable, None);
        assert_eq!(n.options.args, vec!["-f".to_string()]);
    }

    #[test]
    fn blank_executable_is_absent() {
        assert_eq!(normalize(&json!("  "), StepKind::Script).unwrap().executable, None);
    }

    #[test]
    fn malformed_fields_are_rejected() {
        assert!(normalize(&json!({"executable": "x", "args": "-f"}), StepKind::Script).is_err());
        assert!(normalize(&json!({"executable": "x", "input": 3}), StepKind::Script).is_err());
        assert!(normalize(&json!({"executable": ["x"]}), StepKind::Script).is_err());
        assert!(normalize(&json!(7), StepKind::Script).is_err());
    }
}
