//! Target type mapping

use vaultsmith_core::{LogicalType, SourceColumn, TypeMappingConfig};

/// Render the target dtype for a source column
///
/// Character types always carry a length (the configured default when the
/// catalog has none). Everything else passes through verbatim, with the
/// declared length appended unless the type is already parameterised or is a
/// date, timestamp or boolean.
pub fn target_dtype(column: &SourceColumn, types: &TypeMappingConfig) -> String {
    let raw = column.data_type.trim();
    if raw.is_empty() {
        return LogicalType::Unknown.to_string();
    }

    if is_parameterised(raw) {
        return raw.to_string();
    }

    match column.logical_type {
        LogicalType::String => format!(
            "{}({})",
            raw,
            column.length.unwrap_or(types.default_varchar_length)
        ),
        LogicalType::Date | LogicalType::Timestamp | LogicalType::Bool => raw.to_string(),
        _ => match column.length {
            Some(length) => format!("{}({})", raw, length),
            None => raw.to_string(),
        },
    }
}

fn is_parameterised(data_type: &str) -> bool {
    data_type.contains('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(data_type: &str) -> SourceColumn {
        SourceColumn::new("STTM_CUSTOMER", "COL", data_type)
    }

    #[test]
    fn character_types_get_a_length() {
        let types = TypeMappingConfig::default();
        assert_eq!(target_dtype(&column("VARCHAR2").with_length(9), &types), "VARCHAR2(9)");
        assert_eq!(target_dtype(&column("VARCHAR2"), &types), "VARCHAR2(255)");
        assert_eq!(target_dtype(&column("CHAR(1)").with_length(1), &types), "CHAR(1)");

        let narrow = TypeMappingConfig {
            default_varchar_length: 100,
            ..TypeMappingConfig::default()
        };
        assert_eq!(target_dtype(&column("NVARCHAR2"), &narrow), "NVARCHAR2(100)");
    }

    #[test]
    fn other_types_pass_through() {
        let types = TypeMappingConfig::default();
        assert_eq!(target_dtype(&column("NUMBER").with_length(22), &types), "NUMBER(22)");
        assert_eq!(target_dtype(&column("NUMBER(10,2)").with_length(22), &types), "NUMBER(10,2)");
        assert_eq!(target_dtype(&column("DATE").with_length(7), &types), "DATE");
        assert_eq!(target_dtype(&column("SDO_GEOMETRY"), &types), "SDO_GEOMETRY");
        assert_eq!(target_dtype(&column(""), &types), "UNKNOWN");
    }
}
