//! Final column shaping
//!
//! Renames, backfills, type coercion, zero padding and column ordering of
//! the output table, in that order.

use crate::config::{ColumnType, ConfigError, DocumentConfig};
use imrec_io::{Table, Value};
use std::collections::BTreeMap;

/// Coerce a value to a column type; unparseable values become null
pub fn coerce_value(value: &Value, column_type: ColumnType) -> Value {
    if value.is_blank() {
        return Value::Null;
    }
    match column_type {
        ColumnType::Text => Value::Text(value.to_text()),
        ColumnType::Int => value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
            .into(),
        ColumnType::Float => value.as_f64().into(),
        ColumnType::Bool => value.as_bool().into(),
    }
}

/// Left-pad a value's text with zeros; blank values stay null
pub fn zero_pad_value(value: &Value, width: usize) -> Value {
    let text = value.to_text();
    if text.is_empty() {
        Value::Null
    } else {
        Value::Text(format!("{:0>width$}", text, width = width))
    }
}

/// Shapes the pipeline output according to configuration
#[derive(Debug, Clone, Default)]
pub struct OutputAssembler {
    rename_map: BTreeMap<String, String>,
    column_types: BTreeMap<String, ColumnType>,
    zero_pad: BTreeMap<String, usize>,
    column_order: Vec<String>,
}

impl OutputAssembler {
    pub fn from_config(config: &DocumentConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            rename_map: config.rename_map.clone(),
            column_types: config.column_types()?,
            zero_pad: config.zero_pad.clone(),
            column_order: config.column_order.clone(),
        })
    }

    pub fn assemble(&self, mut table: Table) -> crate::Result<Table> {
        let renamed = table.rename_columns(&self.rename_map);
        if !renamed.is_empty() {
            tracing::debug!("Renamed output columns: {:?}", renamed);
        }

        let declared = self.column_types.keys().chain(self.column_order.iter());
        for column in declared {
            if !table.has_column(column) {
                tracing::warn!("Output column {} is missing; filling with nulls", column);
                table.ensure_column(column);
            }
        }

        for (column, column_type) in &self.column_types {
            table.map_column(column, |value| coerce_value(value, *column_type));
        }

        for (column, width) in &self.zero_pad {
            table.map_column(column, |value| zero_pad_value(value, *width));
        }

        if self.column_order.is_empty() {
            table.sort_columns();
        } else {
            table.select(&self.column_order)?;
        }
        Ok(table)
    }
}
