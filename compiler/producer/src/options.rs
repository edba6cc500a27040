//! Option extraction from descriptor option messages.
//!
//! Well-known scalar option fields are surfaced by name when explicitly set;
//! every uninterpreted option follows, in declaration order. The `map_entry`
//! marker is consumed structurally by the walk and never surfaced.

use model::OptionValue;
use prost_types::{
    EnumOptions, EnumValueOptions, FieldOptions, FileOptions, MessageOptions, MethodOptions,
    ServiceOptions, UninterpretedOption,
};
use serde_json::Value;

pub(crate) fn file_options(options: Option<&FileOptions>) -> Vec<OptionValue> {
    let Some(options) = options else {
        return Vec::new();
    };
    let mut values = Vec::new();
    push_str(&mut values, "java_package", options.java_package.as_deref());
    push_str(&mut values, "java_outer_classname", options.java_outer_classname.as_deref());
    push_bool(&mut values, "java_multiple_files", options.java_multiple_files);
    push_str(&mut values, "go_package", options.go_package.as_deref());
    push_bool(&mut values, "deprecated", options.deprecated);
    values.extend(uninterpreted(&options.uninterpreted_option));
    values
}

pub(crate) fn message_options(options: Option<&MessageOptions>) -> Vec<OptionValue> {
    let Some(options) = options else {
        return Vec::new();
    };
    let mut values = Vec::new();
    push_bool(&mut values, "deprecated", options.deprecated);
    values.extend(uninterpreted(&options.uninterpreted_option));
    values
}

pub(crate) fn field_options(options: Option<&FieldOptions>) -> Vec<OptionValue> {
    let Some(options) = options else {
        return Vec::new();
    };
    let mut values = Vec::new();
    push_bool(&mut values, "packed", options.packed);
    push_bool(&mut values, "deprecated", options.deprecated);
    values.extend(uninterpreted(&options.uninterpreted_option));
    values
}

pub(crate) fn enum_options(options: Option<&EnumOptions>) -> Vec<OptionValue> {
    let Some(options) = options else {
        return Vec::new();
    };
    let mut values = Vec::new();
    push_bool(&mut values, "allow_alias", options.allow_alias);
    push_bool(&mut values, "deprecated", options.deprecated);
    values.extend(uninterpreted(&options.uninterpreted_option));
    values
}

pub(crate) fn enum_value_options(options: Option<&EnumValueOptions>) -> Vec<OptionValue> {
    let Some(options) = options else {
        return Vec::new();
    };
    let mut values = Vec::new();
    push_bool(&mut values, "deprecated", options.deprecated);
    values.extend(uninterpreted(&options.uninterpreted_option));
    values
}

pub(crate) fn service_options(options: Option<&ServiceOptions>) -> Vec<OptionValue> {
    let Some(options) = options else {
        return Vec::new();
    };
    let mut values = Vec::new();
    push_bool(&mut values, "deprecated", options.deprecated);
    values.extend(uninterpreted(&options.uninterpreted_option));
    values
}

pub(crate) fn method_options(options: Option<&MethodOptions>) -> Vec<OptionValue> {
    let Some(options) = options else {
        return Vec::new();
    };
    let mut values = Vec::new();
    push_bool(&mut values, "deprecated", options.deprecated);
    values.extend(uninterpreted(&options.uninterpreted_option));
    values
}

fn push_bool(values: &mut Vec<OptionValue>, name: &str, value: Option<bool>) {
    if let Some(value) = value {
        values.push(OptionValue::new(name, value));
    }
}

fn push_str(values: &mut Vec<OptionValue>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        values.push(OptionValue::new(name, value));
    }
}

/// Convert uninterpreted options, preserving declaration order.
fn uninterpreted(options: &[UninterpretedOption]) -> Vec<OptionValue> {
    options.iter().map(|option| OptionValue::new(option_name(option), option_value(option))).collect()
}

/// Render the dotted option name; extension parts keep their parentheses.
fn option_name(option: &UninterpretedOption) -> String {
    option
        .name
        .iter()
        .map(|part| {
            if part.is_extension {
                format!("({})", part.name_part)
            } else {
                part.name_part.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn option_value(option: &UninterpretedOption) -> Value {
    if let Some(identifier) = &option.identifier_value {
        return Value::from(identifier.as_str());
    }
    if let Some(value) = option.positive_int_value {
        return Value::from(value);
    }
    if let Some(value) = option.negative_int_value {
        return Value::from(value);
    }
    if let Some(value) = option.double_value {
        return Value::from(value);
    }
    if let Some(bytes) = &option.string_value {
        return Value::from(String::from_utf8_lossy(bytes).into_owned());
    }
    if let Some(aggregate) = &option.aggregate_value {
        return Value::from(aggregate.as_str());
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use prost_types::uninterpreted_option::NamePart;

    use super::*;

    #[test]
    fn surfaces_explicitly_set_fields_only() {
        let options =
            FileOptions { java_package: Some("com.acme.travel".into()), ..Default::default() };
        let values = file_options(Some(&options));
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].name, "java_package");
        assert_eq!(values[0].as_str(), Some("com.acme.travel"));

        assert!(file_options(None).is_empty());
    }

    #[test]
    fn renders_extension_option_names() {
        let option = UninterpretedOption {
            name: vec![
                NamePart { name_part: "acme.size".into(), is_extension: true },
                NamePart { name_part: "max".into(), is_extension: false },
            ],
            positive_int_value: Some(64),
            ..Default::default()
        };
        let options =
            FieldOptions { uninterpreted_option: vec![option], ..Default::default() };
        let values = field_options(Some(&options));
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].name, "(acme.size).max");
        assert_eq!(values[0].value, Value::from(64u64));
    }
}
