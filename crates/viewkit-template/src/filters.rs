//! Built-in filters and functions, and adapters for host helpers

use minijinja::value::{Rest, Value};
use minijinja::{Error, ErrorKind};
use regex::Regex;
use viewkit_core::{Helper, HelperError};

// ==================== Helper adapters ====================

fn to_json(value: &Value) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|e| {
        Error::new(
            ErrorKind::BadSerialization,
            format!("cannot pass value to helper: {}", e),
        )
    })
}

fn helper_error(err: HelperError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string())
}

fn call_helper(helper: &Helper, args: &[Value]) -> Result<Value, Error> {
    let args = args.iter().map(to_json).collect::<Result<Vec<_>, _>>()?;
    let result = helper.call(&args).map_err(helper_error)?;
    Ok(Value::from_serialize(&result))
}

/// Wrap a host helper as a template function
pub fn helper_function(
    helper: Helper,
) -> impl Fn(Rest<Value>) -> Result<Value, Error> + Send + Sync + 'static {
    move |args: Rest<Value>| call_helper(&helper, &args)
}

/// Wrap a host helper as a template filter; the filtered value comes first
pub fn helper_filter(
    helper: Helper,
) -> impl Fn(Value, Rest<Value>) -> Result<Value, Error> + Send + Sync + 'static {
    move |value: Value, args: Rest<Value>| {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(value);
        all.extend(args.iter().cloned());
        call_helper(&helper, &all)
    }
}

// ==================== Built-ins ====================

/// Collapse whitespace in HTML output
///
/// Whitespace between tags is removed, other runs become a single space.
/// The result is marked safe so it is not escaped again.
pub fn htmlcompress(value: &str) -> Result<Value, Error> {
    let between_tags = Regex::new(r">\s+<")
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("invalid regex: {}", e)))?;
    let runs = Regex::new(r"\s{2,}")
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("invalid regex: {}", e)))?;

    let compressed = between_tags.replace_all(value, "><");
    let compressed = runs.replace_all(&compressed, " ");
    Ok(Value::from_safe_string(compressed.trim().to_string()))
}

/// Pretty-print a value as JSON for debugging
pub fn dump(value: Value) -> Result<String, Error> {
    serde_json::to_string_pretty(&value).map_err(|e| {
        Error::new(
            ErrorKind::BadSerialization,
            format!("cannot dump value: {}", e),
        )
    })
}
