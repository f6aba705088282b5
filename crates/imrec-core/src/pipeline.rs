//! Document reconciliation pipeline
//!
//! Stages, in order:
//! 1. Required column check (fails before any row is read)
//! 2. Provider column preparation
//! 3. Per-record DOI consensus, field coalescing and validation
//! 4. Completion date and sort key
//! 5. Optional reference merge
//! 6. Classification rules
//! 7. Review vote
//! 8. Output shaping
//!
//! Per-record stages are independent of each other and run in parallel
//! with the `parallel` feature. Output rows always follow input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::classification::apply_classification_rules;
use crate::coalesce::{coalesce_fields, CoalescedFields};
use crate::config::DocumentConfig;
use crate::consensus::{resolve_record, Resolution};
use crate::dates::{
    build_completed, build_sort_order, has_date_columns, COMPLETED_COLUMN, SORT_ORDER_COLUMN,
    UNKNOWN_DATE,
};
use crate::error::{ReconError, Result};
use crate::output::OutputAssembler;
use crate::prepare::prepare_sources;
use crate::reference::merge_reference;
use crate::review::{classify_review, ReviewVote, BASE_FLAG_COLUMN};
use crate::sources::Source;
use crate::validation::{annotate, DoiReason, ValidationFlags};
use imrec_io::{RawRecord, Table, Value};
use std::collections::BTreeMap;

/// Renames applied to the reconciled document table
pub const DOCUMENT_RENAMES: [(&str, &str); 4] = [
    ("MeSH.descriptors", "PubMed.MeSH"),
    ("OpenAlex.MeSH.descriptors", "OpenAlex.MeSH"),
    ("PubMed.MeSH_Qualifiers", "MeSH.qualifiers"),
    ("PubMed.ChemicalList", "chemical_list"),
];

const MESH_QUALIFIERS_COLUMN: &str = "PubMed.MeSH_Qualifiers";
const MESH_QUALIFIERS_FALLBACK: &str = "OpenAlex.MeSH.qualifiers";

/// Input tables of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct DocumentInputs {
    /// Merged provider export, one row per document
    pub document: Table,
    /// Optional curated reference flags keyed by `pubmed_id`
    pub reference: Option<Table>,
}

impl DocumentInputs {
    pub fn new(document: Table) -> Self {
        Self {
            document,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: Table) -> Self {
        self.reference = Some(reference);
        self
    }
}

/// Everything computed for one record by the reconciliation stage
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub resolution: Resolution,
    pub fields: CoalescedFields,
    pub flags: ValidationFlags,
}

/// Reconcile one record
pub fn reconcile_record(record: &RawRecord<'_>) -> RecordOutcome {
    let resolution = resolve_record(record);
    let fields = coalesce_fields(record);
    let flags = annotate(&resolution, &fields);
    RecordOutcome {
        resolution,
        fields,
        flags,
    }
}

/// Apply `f` to every record, keeping input order
pub fn map_rows<T, F>(table: &Table, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&RawRecord<'_>) -> T + Sync + Send,
{
    let records = table.record_views();

    #[cfg(feature = "parallel")]
    let results: Vec<T> = records.par_iter().map(|record| f(record)).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<T> = records.iter().map(|record| f(record)).collect();

    results
}

/// Check that every required column exists before processing
pub fn check_required_columns(table: &Table, required: &[String], context: &str) -> Result<()> {
    let missing = table.missing_columns(required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReconError::MissingColumns {
            context: context.to_string(),
            columns: missing,
        })
    }
}

fn set<T, F>(table: &mut Table, column: &str, outcomes: &[T], f: F) -> Result<()>
where
    F: Fn(&T) -> Value,
{
    table.set_column(column, outcomes.iter().map(f).collect())?;
    Ok(())
}

/// Write consensus, coalesced fields and flags back into the table
pub fn write_outcomes(table: &mut Table, outcomes: &[RecordOutcome], diagnostics: bool) -> Result<()> {
    set(table, "doi", outcomes, |o| o.resolution.consensus.selected_value.clone().into())?;
    set(table, "selected_source", outcomes, |o| {
        o.resolution.consensus.selected_source.map(Source::display_name).into()
    })?;
    set(table, "consensus_doi", outcomes, |o| o.resolution.consensus.consensus_value.clone().into())?;
    set(table, "consensus_support", outcomes, |o| o.resolution.consensus.support_count.into())?;
    set(table, "invalid_doi", outcomes, |o| o.flags.invalid_doi.into())?;
    set(table, "reason", outcomes, |o| o.flags.reason.as_str().into())?;
    set(table, "invalid_record", outcomes, |o| o.flags.invalid_record.into())?;

    set(table, "title", outcomes, |o| o.fields.title.clone().into())?;
    set(table, "abstract", outcomes, |o| o.fields.abstract_text.clone().into())?;
    set(table, "page", outcomes, |o| o.fields.page.clone().into())?;
    set(table, "volume", outcomes, |o| o.fields.volume.value.into())?;
    set(table, "issue", outcomes, |o| o.fields.issue.value.into())?;

    let peer_columns: Vec<&str> = Source::ALL
        .iter()
        .filter(|source| !source.is_primary())
        .map(|source| source.doi_column())
        .collect();
    table.drop_columns(&peer_columns);

    if diagnostics {
        write_diagnostics(table, outcomes)?;
    }
    Ok(())
}

fn write_diagnostics(table: &mut Table, outcomes: &[RecordOutcome]) -> Result<()> {
    for source in Source::ALL {
        let key = source.key();
        set(table, &format!("{}_doi_raw", key), outcomes, |o| {
            Value::non_empty(o.resolution.identifier(source).raw.clone())
        })?;
        set(table, &format!("{}_doi_norm", key), outcomes, |o| {
            o.resolution.identifier(source).normalized.clone().into()
        })?;
        set(table, &format!("{}_valid", key), outcomes, |o| {
            o.resolution.identifier(source).valid().into()
        })?;
    }
    set(table, "doi_same_count", outcomes, |o| o.resolution.primary_confirmations().into())?;
    set(table, "peers_valid_distinct", outcomes, |o| o.resolution.distinct_valid_count().into())?;
    set(table, "invalid_volume", outcomes, |o| o.flags.invalid_volume.into())?;
    set(table, "invalid_issue", outcomes, |o| o.flags.invalid_issue.into())?;
    Ok(())
}

/// Fill blank MeSH qualifiers from OpenAlex
fn backfill_mesh_qualifiers(table: &mut Table) -> Result<()> {
    if !(table.has_column(MESH_QUALIFIERS_COLUMN) && table.has_column(MESH_QUALIFIERS_FALLBACK)) {
        return Ok(());
    }
    let values: Vec<Value> = table
        .records()
        .map(|record| {
            let current = record.get(MESH_QUALIFIERS_COLUMN);
            if current.is_blank() {
                Value::non_empty(record.text(MESH_QUALIFIERS_FALLBACK))
            } else {
                current.clone()
            }
        })
        .collect();
    table.set_column(MESH_QUALIFIERS_COLUMN, values)?;
    Ok(())
}

/// Add the completion date and sort key columns
pub fn write_dates(table: &mut Table) -> Result<()> {
    let dated = has_date_columns(|column| table.has_column(column));
    let keys: Vec<(String, String)> = map_rows(table, |record| {
        let completed = if dated {
            build_completed(record)
        } else {
            UNKNOWN_DATE.to_string()
        };
        let sort_order = build_sort_order(record, &completed);
        (completed, sort_order)
    });
    set(table, COMPLETED_COLUMN, &keys, |(c, _)| c.as_str().into())?;
    set(table, SORT_ORDER_COLUMN, &keys, |(_, s)| s.as_str().into())?;
    Ok(())
}

/// Run the review vote and add its columns
pub fn write_review(table: &mut Table, config: &DocumentConfig) -> Result<()> {
    table.ensure_column(BASE_FLAG_COLUMN);
    table.map_column(BASE_FLAG_COLUMN, |value| {
        Value::Bool(value.as_bool().unwrap_or(false))
    });

    let votes: Vec<ReviewVote> = map_rows(table, |record| classify_review(record, &config.review));
    set(table, "n_responces", &votes, |v| i64::from(v.n_responses).into())?;
    set(table, BASE_FLAG_COLUMN, &votes, |v| v.review.into())?;
    set(table, "is_experimental", &votes, |v| v.is_experimental().into())?;

    let reviews = votes.iter().filter(|v| v.review).count();
    tracing::info!("Classified {} of {} documents as reviews", reviews, votes.len());
    Ok(())
}

fn log_reasons(outcomes: &[RecordOutcome]) {
    let mut counts: BTreeMap<DoiReason, usize> = BTreeMap::new();
    for outcome in outcomes {
        *counts.entry(outcome.flags.reason).or_default() += 1;
    }
    for (reason, count) in &counts {
        tracing::info!("DOI reason {}: {} records", reason, count);
    }
    let invalid = outcomes.iter().filter(|o| o.flags.invalid_record).count();
    tracing::info!("Flagged {} of {} records invalid", invalid, outcomes.len());
}

/// Reconcile a document table and shape the output
pub fn run_document_pipeline(inputs: DocumentInputs, config: &DocumentConfig) -> Result<Table> {
    config.validate()?;
    let assembler = OutputAssembler::from_config(config)?;

    let DocumentInputs {
        document: mut table,
        reference,
    } = inputs;
    check_required_columns(&table, &config.required_columns, "document")?;

    tracing::info!("Starting document reconciliation for {} rows", table.num_rows());

    prepare_sources(&mut table)?;

    let outcomes = map_rows(&table, reconcile_record);
    log_reasons(&outcomes);
    write_outcomes(&mut table, &outcomes, config.diagnostics)?;

    backfill_mesh_qualifiers(&mut table)?;
    write_dates(&mut table)?;

    let renames: BTreeMap<String, String> = DOCUMENT_RENAMES
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
    table.rename_columns(&renames);

    if let Some(reference) = reference {
        merge_reference(&mut table, &reference)?;
    }

    let applied = apply_classification_rules(&mut table, &config.classification_rules);
    if applied > 0 {
        tracing::debug!("Applied {} classification rules", applied);
    }

    write_review(&mut table, config)?;

    let output = assembler.assemble(table)?;
    tracing::info!(
        "Document reconciliation produced {} rows x {} columns",
        output.num_rows(),
        output.num_columns()
    );
    Ok(output)
}
