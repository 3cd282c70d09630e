/// Implement Display for a type by rendering it as pretty-printed JSON.
#[macro_export]
macro_rules! display_json {
    ($cls:ident) => {
        impl std::fmt::Display for $cls {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                let formatter = ::serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut ser = ::serde_json::Serializer::with_formatter(Vec::new(), formatter);
                if let Err(e) = ::serde::Serialize::serialize(self, &mut ser) {
                    ::log::error!("Failed to serialize: {}", e);
                    return Err(::std::fmt::Error {});
                }
                match ::std::string::String::from_utf8(ser.into_inner()) {
                    Ok(s) => f.write_str(&s),
                    Err(e) => {
                        ::log::error!("JSON serialization contained non-UTF-8 characters: {}", e);
                        Err(::std::fmt::Error {})
                    }
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use {indoc::indoc, pretty_assertions::assert_eq, serde::Serialize};

    #[derive(Serialize)]
    struct Example {
        name: &'static str,
        count: u32,
    }
    display_json!(Example);

    #[test_log::test]
    fn test_pretty_display() {
        let example = Example {
            name: "widget",
            count: 3,
        };
        assert_eq!(
            example.to_string(),
            indoc! { r#"
            {
                "name": "widget",
                "count": 3
            }"# }
        );
    }
}
