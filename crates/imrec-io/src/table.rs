//! Row/column table model
//!
//! A [`Table`] is an ordered list of uniquely named columns and a list of
//! rows holding one [`Value`] per column. [`RawRecord`] is a read-only view
//! of one row addressed by column name.

use crate::reader::{IoError, IoResult};
use imrec_identifiers::clean_text;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A dynamically typed cell value
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

static NULL: Value = Value::Null;

impl Value {
    /// Build a text value
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Build a text value, or null when the text is empty after cleaning
    pub fn non_empty(value: impl Into<String>) -> Self {
        let value = value.into();
        if clean_text(&value).is_empty() {
            Value::Null
        } else {
            Value::Text(value)
        }
    }

    /// Null or NaN
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Cleaned text form; null and NaN are the empty string
    pub fn to_text(&self) -> String {
        if self.is_null() {
            return String::new();
        }
        clean_text(&self.to_string())
    }

    /// Null or empty after cleaning
    pub fn is_blank(&self) -> bool {
        self.to_text().is_empty()
    }

    /// Integer view
    ///
    /// Text must parse as an integer after trimming; floats must be
    /// integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Text(_) => self.to_text().parse().ok(),
            _ => None,
        }
    }

    /// Float view
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            Value::Text(_) => self.to_text().parse().ok(),
            _ => None,
        }
    }

    /// Boolean view
    ///
    /// Accepts `true/false`, `yes/no`, `t/f`, `y/n` in any case and
    /// numbers (non-zero is true).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Float(f) if !f.is_nan() => Some(*f != 0.0),
            Value::Text(_) => {
                let text = self.to_text().to_lowercase();
                match text.as_str() {
                    "true" | "t" | "yes" | "y" => Some(true),
                    "false" | "f" | "no" | "n" => Some(false),
                    _ => text.parse::<f64>().ok().filter(|f| !f.is_nan()).map(|f| f != 0.0),
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_nan() => Ok(()),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Read-only view of one table row
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    index: &'a HashMap<String, usize>,
    values: &'a [Value],
}

impl<'a> RawRecord<'a> {
    /// Value of a column; absent columns read as null
    pub fn get(&self, column: &str) -> &'a Value {
        self.index
            .get(column)
            .and_then(|&i| self.values.get(i))
            .unwrap_or(&NULL)
    }

    /// Cleaned text of a column
    pub fn text(&self, column: &str) -> String {
        self.get(column).to_text()
    }

    /// Whether the row's table has the column
    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Row values in column order
    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

/// An ordered collection of named columns and rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns
    ///
    /// Duplicate column names keep their first position.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut table = Table::default();
        for column in columns {
            let column = column.into();
            if !table.index.contains_key(&column) {
                table.index.insert(column.clone(), table.columns.len());
                table.columns.push(column);
            }
        }
        table
    }

    /// Create a table from columns and rows, checking row widths
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> IoResult<Self> {
        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<Value>) -> IoResult<()> {
        if row.len() != self.columns.len() {
            return Err(IoError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names from `required` that are not columns of this table
    pub fn missing_columns<S: AsRef<str>>(&self, required: &[S]) -> Vec<String> {
        required
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.has_column(name))
            .map(str::to_string)
            .collect()
    }

    /// Raw row values
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// View of one row
    pub fn record(&self, row: usize) -> Option<RawRecord<'_>> {
        self.rows.get(row).map(|values| RawRecord {
            index: &self.index,
            values,
        })
    }

    /// Iterate over all rows
    pub fn records(&self) -> impl ExactSizeIterator<Item = RawRecord<'_>> + '_ {
        self.rows.iter().map(move |values| RawRecord {
            index: &self.index,
            values,
        })
    }

    /// All rows as views, for indexed or parallel access
    pub fn record_views(&self) -> Vec<RawRecord<'_>> {
        self.records().collect()
    }

    /// Cell value; absent columns and rows read as null
    pub fn get(&self, row: usize, column: &str) -> &Value {
        self.record(row).map(|r| r.get(column)).unwrap_or(&NULL)
    }

    /// Values of one column
    pub fn column_values(&self, name: &str) -> IoResult<Vec<&Value>> {
        let i = self
            .column_index(name)
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))?;
        Ok(self.rows.iter().map(|row| &row[i]).collect())
    }

    /// Set a column, replacing it in place or appending it
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> IoResult<()> {
        if values.len() != self.rows.len() {
            return Err(IoError::ColumnLength {
                column: name.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.column_index(name) {
            Some(i) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[i] = value;
                }
            }
            None => {
                self.index.insert(name.to_string(), self.columns.len());
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Update every cell of an existing column in place
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&Value) -> Value,
    {
        let Some(i) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[i] = f(&row[i]);
        }
        true
    }

    /// Append a column of nulls if it does not exist
    pub fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.index.insert(name.to_string(), self.columns.len());
            self.columns.push(name.to_string());
            for row in &mut self.rows {
                row.push(Value::Null);
            }
        }
    }

    /// Remove columns; unknown names are ignored
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !names.iter().any(|n| n.as_ref() == c))
            .collect();
        if keep.iter().all(|k| *k) {
            return;
        }
        self.retain_positions(&keep);
    }

    /// Rename columns
    ///
    /// A renamed column replaces any existing column with the target name.
    /// Returns the renames that were applied.
    pub fn rename_columns(&mut self, renames: &BTreeMap<String, String>) -> Vec<(String, String)> {
        let mut applied = Vec::new();
        for (from, to) in renames {
            if from == to || !self.has_column(from) {
                continue;
            }
            if self.has_column(to) {
                self.drop_columns(&[to.as_str()]);
            }
            if let Some(i) = self.column_index(from) {
                self.columns[i] = to.clone();
                self.rebuild_index();
                applied.push((from.clone(), to.clone()));
            }
        }
        applied
    }

    /// Reorder columns by name
    pub fn sort_columns(&mut self) {
        let mut order: Vec<usize> = (0..self.columns.len()).collect();
        order.sort_by(|&a, &b| self.columns[a].cmp(&self.columns[b]));
        self.reorder(&order);
    }

    /// Keep only the given columns, in the given order
    pub fn select<S: AsRef<str>>(&mut self, names: &[S]) -> IoResult<()> {
        let mut order = Vec::with_capacity(names.len());
        for name in names {
            let i = self
                .column_index(name.as_ref())
                .ok_or_else(|| IoError::ColumnNotFound(name.as_ref().to_string()))?;
            if !order.contains(&i) {
                order.push(i);
            }
        }
        self.reorder(&order);
        Ok(())
    }

    fn reorder(&mut self, order: &[usize]) {
        self.columns = order.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = order.iter().map(|&i| std::mem::take(&mut row[i])).collect();
        }
        self.rebuild_index();
    }

    fn retain_positions(&mut self, keep: &[bool]) {
        let order: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter(|(_, k)| **k)
            .map(|(i, _)| i)
            .collect();
        self.reorder(&order);
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
    }
}
