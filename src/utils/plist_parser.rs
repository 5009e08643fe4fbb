use std::io::Cursor;

use plist::Value;

use crate::utils::{AppError, AppResult};

/// Parse plist text (XML or binary) captured from a command's stdout.
pub fn parse_dictionary(raw: &str) -> AppResult<plist::Dictionary> {
    let val = Value::from_reader(Cursor::new(raw.as_bytes()))?;
    val.into_dictionary()
        .ok_or_else(|| AppError::Custom("plist is not a dictionary".into()))
}

pub fn get_string(dict: &plist::Dictionary, key: &str) -> Option<String> {
    dict.get(key)?.as_string().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_string_values() {
        let raw = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>pkg-id</key>
    <string>com.example.driver</string>
    <key>install-time</key>
    <integer>1700000000</integer>
</dict>
</plist>"#;
        let dict = parse_dictionary(raw).unwrap();
        assert_eq!(get_string(&dict, "pkg-id").as_deref(), Some("com.example.driver"));
        assert_eq!(get_string(&dict, "install-time"), None);
        assert_eq!(get_string(&dict, "volume"), None);
    }

    #[test]
    fn rejects_non_dictionary_roots() {
        let raw = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><array><string>a</string></array></plist>"#;
        assert!(parse_dictionary(raw).is_err());
    }
}
