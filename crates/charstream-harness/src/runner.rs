//! Fixture execution engine.
//!
//! Each case drives a string-backed stream from `charstream-core`:
//! format operations insert into an output string stream and compare
//! the rendered bytes; parse operations extract from an input string
//! stream and compare value plus raised condition bits.

use charstream_core::sstream::{input_string, output_string};
use charstream_core::{FmtFlags, Iostate, ReadStream, StreamBase, WriteStream};

use crate::fixtures::{FixtureCase, FixtureSet};
use crate::HarnessError;

/// Outcome of one executed case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

/// Run every case in a set, optionally filtered by substring.
pub fn run_set(set: &FixtureSet, filter: Option<&str>) -> Result<Vec<CaseResult>, HarnessError> {
    set.cases
        .iter()
        .filter(|case| filter.is_none_or(|f| case.name.contains(f)))
        .map(run_case)
        .collect()
}

fn run_case(case: &FixtureCase) -> Result<CaseResult, HarnessError> {
    let actual = match case.operation.as_str() {
        "format_int" => format_int(case)?,
        "format_float" => format_float(case)?,
        "format_bool" => format_bool(case)?,
        "parse_int" => parse_int(case)?,
        "parse_float" => parse_float(case)?,
        "parse_bool" => parse_bool(case)?,
        other => {
            return Err(HarnessError::UnknownOperation {
                name: case.name.clone(),
                operation: other.to_string(),
            });
        }
    };
    Ok(CaseResult {
        name: case.name.clone(),
        passed: actual == case.expected,
        expected: case.expected.clone(),
        actual,
    })
}

// ---------------------------------------------------------------------------
// Input decoding
// ---------------------------------------------------------------------------

fn str_field<'a>(case: &'a FixtureCase, key: &str) -> Result<&'a str, HarnessError> {
    case.inputs
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HarnessError::BadInputs {
            name: case.name.clone(),
            detail: format!("missing string field `{key}`"),
        })
}

fn flags_of(case: &FixtureCase) -> Result<FmtFlags, HarnessError> {
    let mut flags = FmtFlags::DEC | FmtFlags::SKIPWS;
    let Some(names) = case.inputs.get("flags").and_then(|v| v.as_array()) else {
        return Ok(flags);
    };
    for name in names {
        let name = name.as_str().unwrap_or("");
        match name {
            "boolalpha" => flags |= FmtFlags::BOOLALPHA,
            "dec" => flags = (flags & !FmtFlags::BASEFIELD) | FmtFlags::DEC,
            "hex" => flags = (flags & !FmtFlags::BASEFIELD) | FmtFlags::HEX,
            "oct" => flags = (flags & !FmtFlags::BASEFIELD) | FmtFlags::OCT,
            "autobase" => flags &= !FmtFlags::BASEFIELD,
            "fixed" => flags |= FmtFlags::FIXED,
            "scientific" => flags |= FmtFlags::SCIENTIFIC,
            "left" => flags = (flags & !FmtFlags::ADJUSTFIELD) | FmtFlags::LEFT,
            "right" => flags = (flags & !FmtFlags::ADJUSTFIELD) | FmtFlags::RIGHT,
            "internal" => flags = (flags & !FmtFlags::ADJUSTFIELD) | FmtFlags::INTERNAL,
            "showbase" => flags |= FmtFlags::SHOWBASE,
            "showpoint" => flags |= FmtFlags::SHOWPOINT,
            "showpos" => flags |= FmtFlags::SHOWPOS,
            "uppercase" => flags |= FmtFlags::UPPERCASE,
            other => {
                return Err(HarnessError::BadInputs {
                    name: case.name.clone(),
                    detail: format!("unknown flag `{other}`"),
                });
            }
        }
    }
    Ok(flags)
}

fn apply_format_state<S: StreamBase>(stream: &mut S, case: &FixtureCase) -> Result<(), HarnessError> {
    let flags = flags_of(case)?;
    stream.ios_mut().set_flags(flags);
    if let Some(w) = case.inputs.get("width").and_then(|v| v.as_u64()) {
        stream.ios_mut().set_width(w as usize);
    }
    if let Some(p) = case.inputs.get("precision").and_then(|v| v.as_u64()) {
        stream.ios_mut().set_precision(p as usize);
    }
    if let Some(f) = case.inputs.get("fill").and_then(|v| v.as_str())
        && let Some(c) = f.bytes().next()
    {
        stream.ios_mut().set_fill(c);
    }
    Ok(())
}

fn state_suffix(state: Iostate) -> String {
    let mut bits = Vec::new();
    if state.contains(Iostate::EOF) {
        bits.push("eof");
    }
    if state.contains(Iostate::FAIL) {
        bits.push("fail");
    }
    if state.contains(Iostate::BAD) {
        bits.push("bad");
    }
    if bits.is_empty() {
        String::from("good")
    } else {
        bits.join("|")
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn format_int(case: &FixtureCase) -> Result<String, HarnessError> {
    let value: i64 = str_field(case, "value")?.parse().map_err(|_| {
        HarnessError::BadInputs {
            name: case.name.clone(),
            detail: "value is not an i64".into(),
        }
    })?;
    let (mut os, sb) = output_string();
    apply_format_state(&mut os, case)?;
    os.insert(&value);
    Ok(String::from_utf8_lossy(sb.borrow().contents()).into_owned())
}

fn format_float(case: &FixtureCase) -> Result<String, HarnessError> {
    let value: f64 = str_field(case, "value")?.parse().map_err(|_| {
        HarnessError::BadInputs {
            name: case.name.clone(),
            detail: "value is not an f64".into(),
        }
    })?;
    let (mut os, sb) = output_string();
    apply_format_state(&mut os, case)?;
    os.insert(&value);
    Ok(String::from_utf8_lossy(sb.borrow().contents()).into_owned())
}

fn format_bool(case: &FixtureCase) -> Result<String, HarnessError> {
    let value = str_field(case, "value")? == "true";
    let (mut os, sb) = output_string();
    apply_format_state(&mut os, case)?;
    os.insert(&value);
    Ok(String::from_utf8_lossy(sb.borrow().contents()).into_owned())
}

fn parse_int(case: &FixtureCase) -> Result<String, HarnessError> {
    let text = str_field(case, "text")?;
    let (mut is, _) = input_string(text);
    apply_format_state(&mut is, case)?;
    let mut v = 0i64;
    is.extract(&mut v);
    Ok(format!("{v} [{}]", state_suffix(is.ios().rdstate())))
}

fn parse_float(case: &FixtureCase) -> Result<String, HarnessError> {
    let text = str_field(case, "text")?;
    let (mut is, _) = input_string(text);
    apply_format_state(&mut is, case)?;
    let mut v = 0.0f64;
    is.extract(&mut v);
    Ok(format!("{v} [{}]", state_suffix(is.ios().rdstate())))
}

fn parse_bool(case: &FixtureCase) -> Result<String, HarnessError> {
    let text = str_field(case, "text")?;
    let (mut is, _) = input_string(text);
    apply_format_state(&mut is, case)?;
    let mut v = false;
    is.extract(&mut v);
    Ok(format!("{v} [{}]", state_suffix(is.ios().rdstate())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::builtin_set;

    #[test]
    fn test_builtin_set_passes() {
        let set = builtin_set();
        let results = run_set(&set, None).unwrap();
        for r in &results {
            assert!(r.passed, "{}: expected {:?}, got {:?}", r.name, r.expected, r.actual);
        }
    }

    #[test]
    fn test_filter_selects_subset() {
        let set = builtin_set();
        let all = run_set(&set, None).unwrap();
        let some = run_set(&set, Some("hex")).unwrap();
        assert!(some.len() < all.len());
        assert!(!some.is_empty());
    }

    #[test]
    fn test_unknown_operation_is_an_error() {
        let set = FixtureSet {
            version: "1".into(),
            area: "x".into(),
            cases: vec![FixtureCase {
                name: "bad".into(),
                operation: "no_such_op".into(),
                inputs: serde_json::json!({}),
                expected: String::new(),
            }],
        };
        assert!(run_set(&set, None).is_err());
    }
}
