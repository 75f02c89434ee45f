//! Line-oriented strategy file codec
//!
//! One operator per line:
//!
//! ```text
//! <name> <nDims> <dim_0> .. <dim_{n-1}> <deviceId_0> .. <deviceId_{k-1}>
//! ```
//!
//! where `k` is the product of the listed dims. Blank lines and lines
//! beginning with `#` are skipped. Loads are atomic: any malformed or invalid
//! line fails the whole call with the 1-based line number, and no partial
//! store escapes. Saves are canonical, so repeated saves of an unchanged
//! store are byte-identical.

use crate::StrategyStore;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use stratum_types::{DeviceId, ParallelConfig, Result, StratumError, MAX_OPNAME};
use tracing::{debug, info};

/// Read a strategy file, validating every placement against a device pool of
/// `device_pool` ids.
///
/// I/O failures (missing file, permissions) surface as
/// [`StratumError::Io`] and are recoverable by the caller, e.g. by falling
/// back to default placements.
pub fn load(path: impl AsRef<Path>, device_pool: usize) -> Result<StrategyStore> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let store = parse(&text, device_pool)?;
    info!(
        path = %path.display(),
        operators = store.len(),
        "loaded strategy file"
    );
    Ok(store)
}

/// Parse strategy file contents. Split out from [`load`] so callers with
/// in-memory strategies (and tests) skip the filesystem.
pub fn parse(text: &str, device_pool: usize) -> Result<StrategyStore> {
    let mut store = StrategyStore::new();
    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, config) = parse_line(line, line_no)?;
        config
            .validate(device_pool)
            .map_err(|err| contextualize(err, line_no, &name))?;
        debug!(operator = %name, degree = config.degree(), "parsed strategy line");
        if store.insert(name.clone(), config).is_some() {
            return Err(StratumError::parse(
                line_no,
                format!("duplicate operator '{}'", name),
            ));
        }
    }
    Ok(store)
}

/// Write the canonical serialization of `store` to `path`.
pub fn save(store: &StrategyStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, serialize(store))?;
    info!(
        path = %path.display(),
        operators = store.len(),
        "saved strategy file"
    );
    Ok(())
}

/// Canonical serialization: operators sorted by the partition order, ties
/// broken by name; fields space-separated, one line per operator.
pub fn serialize(store: &StrategyStore) -> String {
    let mut entries: Vec<(&str, &ParallelConfig)> = store.iter().collect();
    entries.sort_by(|(a_name, a), (b_name, b)| {
        a.partition_cmp(b).then_with(|| a_name.cmp(b_name))
    });

    let mut out = String::new();
    for (name, config) in entries {
        out.push_str(name);
        let _ = write!(out, " {}", config.dims.len());
        for dim in &config.dims {
            let _ = write!(out, " {}", dim);
        }
        for id in &config.devices {
            let _ = write!(out, " {}", id);
        }
        out.push('\n');
    }
    out
}

fn parse_line(line: &str, line_no: usize) -> Result<(String, ParallelConfig)> {
    let mut fields = line.split_whitespace();
    let name = match fields.next() {
        Some(name) => name.to_string(),
        None => return Err(StratumError::parse(line_no, "empty line")),
    };
    if name.len() > MAX_OPNAME {
        return Err(StratumError::parse(
            line_no,
            format!("operator name exceeds {} characters", MAX_OPNAME),
        ));
    }

    let dim_count: usize = parse_field(fields.next(), line_no, "dimension count")?;
    let mut dims = Vec::with_capacity(dim_count);
    for axis in 0..dim_count {
        let what = format!("dimension {}", axis);
        dims.push(parse_field(fields.next(), line_no, &what)?);
    }

    let degree = dims
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| StratumError::parse(line_no, "dimension product overflows"))?;
    let mut devices = Vec::new();
    for slot in 0..degree {
        let what = format!("device id {}", slot);
        devices.push(DeviceId::new(parse_field(fields.next(), line_no, &what)?));
    }

    if let Some(extra) = fields.next() {
        return Err(StratumError::parse(
            line_no,
            format!("unexpected trailing field '{}'", extra),
        ));
    }

    Ok((name, ParallelConfig::new(dims, devices)))
}

fn parse_field<T: FromStr>(field: Option<&str>, line_no: usize, what: &str) -> Result<T> {
    let raw = field.ok_or_else(|| StratumError::parse(line_no, format!("missing {}", what)))?;
    raw.parse::<T>()
        .map_err(|_| StratumError::parse(line_no, format!("invalid {}: '{}'", what, raw)))
}

/// A placement that parsed but failed validation is reported as a parse
/// error naming the line and operator, so the caller can fix the file.
fn contextualize(err: StratumError, line_no: usize, name: &str) -> StratumError {
    match err {
        StratumError::Validation { message } => {
            StratumError::parse(line_no, format!("operator '{}': {}", name, message))
        }
        other => other,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_operator() {
        let store = parse("conv1 2 2 4 0 1 2 3 4 5 6 7\n", 8).unwrap();
        let config = store.lookup("conv1").unwrap();
        assert_eq!(config.dims, vec![2, 4]);
        assert_eq!(
            config.devices,
            (0..8).map(DeviceId::new).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# machine: 2 nodes x 4 workers\n\nconv1 1 4 0 1 2 3\n\n# end\n";
        let store = parse(text, 4).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_parse_tolerates_irregular_whitespace() {
        let store = parse("  conv1   1  2   0\t1 ", 4).unwrap();
        assert_eq!(store.lookup("conv1").unwrap().degree(), 2);
    }

    #[test]
    fn test_missing_field_names_line_and_field() {
        let err = parse("conv1 2 2 4 0 1 2\n", 8).unwrap_err();
        match err {
            StratumError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("device id 3"), "message: {}", message);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let err = parse("conv1 two 2 4\n", 8).unwrap_err();
        assert!(err.to_string().contains("invalid dimension count"));
    }

    #[test]
    fn test_validation_failure_reports_line_and_operator() {
        // product 6 but line supplies 6 ids with a duplicate
        let text = "ok 1 1 0\nbad 2 2 3 0 1 2 3 4 4\n";
        let err = parse(text, 8).unwrap_err();
        match err {
            StratumError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("operator 'bad'"));
                assert!(message.contains("more than once"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_device_list_fails_as_missing_field() {
        // dims [2,3] require 6 ids; only 5 are present
        let err = parse("conv2 2 2 3 0 1 2 3 4\n", 8).unwrap_err();
        match err {
            StratumError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("device id 5"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_operator_is_rejected() {
        let err = parse("conv1 1 1 0\nconv1 1 1 1\n", 4).unwrap_err();
        assert!(err.to_string().contains("duplicate operator 'conv1'"));
    }

    #[test]
    fn test_trailing_field_is_rejected() {
        let err = parse("conv1 1 1 0 99\n", 4).unwrap_err();
        assert!(err.to_string().contains("trailing field '99'"));
    }

    #[test]
    fn test_overlong_operator_name_is_rejected() {
        let name = "x".repeat(MAX_OPNAME + 1);
        let err = parse(&format!("{} 1 1 0\n", name), 4).unwrap_err();
        assert!(err.to_string().contains("exceeds 64 characters"));
    }

    #[test]
    fn test_serialize_orders_by_partition_then_name() {
        let mut store = StrategyStore::new();
        store.insert("b_two_d", ParallelConfig::new(vec![1, 2], ids(&[0, 1])));
        store.insert("a_one_d", ParallelConfig::new(vec![4], ids(&[0, 1, 2, 3])));
        store.insert("z_one_d", ParallelConfig::new(vec![2], ids(&[0, 1])));
        store.insert("a_same_shape", ParallelConfig::new(vec![2], ids(&[2, 3])));

        let text = serialize(&store);
        let lines: Vec<&str> = text.lines().collect();
        // 1-D before 2-D; [2] before [4]; equivalent shapes tie-broken by name
        assert_eq!(
            lines,
            vec![
                "a_same_shape 1 2 2 3",
                "z_one_d 1 2 0 1",
                "a_one_d 1 4 0 1 2 3",
                "b_two_d 2 1 2 0 1",
            ]
        );
    }

    fn ids(raw: &[usize]) -> Vec<DeviceId> {
        raw.iter().copied().map(DeviceId::new).collect()
    }
}
