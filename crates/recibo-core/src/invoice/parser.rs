//! Rule-based field extraction for AFIP receipts.

use std::time::Instant;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::comprobante::{Comprobante, Field};

use super::rules::{is_calendar_date, validate_cuit, FieldPattern, CATALOG};

/// Result of field extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Draft record with business fields filled in.
    pub comprobante: Comprobante,
    /// Extraction notes, appended to the record's diagnostics by the caller.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// A catalog entry together with its compile outcome.
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: FieldPattern,
    regex: Result<Regex, String>,
}

/// Field catalog compiled entry by entry.
///
/// A rule that fails to compile is kept with its error so extraction can
/// report it without disturbing the other fields.
#[derive(Debug, Clone)]
pub struct CompiledCatalog {
    rules: Vec<CompiledRule>,
}

impl CompiledCatalog {
    pub fn compile(rules: &[FieldPattern]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| CompiledRule {
                rule: *rule,
                regex: rule.compile().map_err(|e| e.to_string()),
            })
            .collect();
        Self { rules }
    }

    /// Number of rules that failed to compile.
    pub fn broken_rules(&self) -> usize {
        self.rules.iter().filter(|r| r.regex.is_err()).count()
    }
}

lazy_static! {
    static ref DEFAULT_CATALOG: CompiledCatalog = CompiledCatalog::compile(CATALOG);
}

/// Fields holding a CUIT.
const CUIT_FIELDS: [Field; 2] = [Field::IssuerTaxId, Field::RecipientTaxId];

/// Fields holding a `dd/mm/yyyy` date.
const DATE_FIELDS: [Field; 4] = [
    Field::IssueDate,
    Field::BilledFrom,
    Field::BilledTo,
    Field::CaeExpiryDate,
];

/// Extracts receipt fields from plain text.
pub struct ComprobanteParser {
    catalog: CompiledCatalog,
    check_cuit: bool,
    check_dates: bool,
}

impl ComprobanteParser {
    /// Parser over the built-in AFIP catalog.
    pub fn new() -> Self {
        Self {
            catalog: DEFAULT_CATALOG.clone(),
            check_cuit: true,
            check_dates: true,
        }
    }

    /// Parser over a custom catalog.
    pub fn with_catalog(rules: &[FieldPattern]) -> Self {
        Self {
            catalog: CompiledCatalog::compile(rules),
            ..Self::new()
        }
    }

    /// Toggle the CUIT check-digit note.
    pub fn with_cuit_check(mut self, enabled: bool) -> Self {
        self.check_cuit = enabled;
        self
    }

    /// Toggle the calendar-date note.
    pub fn with_date_check(mut self, enabled: bool) -> Self {
        self.check_dates = enabled;
        self
    }

    /// Run every rule against `text`.
    ///
    /// Never fails: unmatched fields stay `None` and problems become warnings.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut comprobante = Comprobante::default();
        let mut warnings = Vec::new();

        for compiled in &self.catalog.rules {
            let field = compiled.rule.field;
            match &compiled.regex {
                Ok(regex) => {
                    let value = compiled.rule.apply(regex, text);
                    if value.is_some() {
                        debug!("Extracted {}", field.json_key());
                    }
                    comprobante.set(field, value);
                }
                Err(e) => {
                    warn!("Pattern for {} failed to compile: {}", field.json_key(), e);
                    warnings.push(format!(
                        "Pattern for {} failed to compile: {}",
                        field.json_key(),
                        e
                    ));
                    comprobante.set(field, None);
                }
            }
        }

        if self.check_cuit {
            for field in CUIT_FIELDS {
                if let Some(cuit) = comprobante.get(field).filter(|c| !validate_cuit(c)) {
                    warnings.push(format!(
                        "CUIT in {} failed check digit: {}",
                        field.json_key(),
                        cuit
                    ));
                }
            }
        }

        if self.check_dates {
            for field in DATE_FIELDS {
                if let Some(date) = comprobante.get(field).filter(|d| !is_calendar_date(d)) {
                    warnings.push(format!(
                        "Invalid calendar date in {}: {}",
                        field.json_key(),
                        date
                    ));
                }
            }
        }

        for key in comprobante.missing_required() {
            warnings.push(format!("Missing required field: {}", key));
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Field extraction finished in {}ms with {} warnings",
            processing_time_ms,
            warnings.len()
        );

        ExtractionResult {
            comprobante,
            warnings,
            processing_time_ms,
        }
    }
}

impl Default for ComprobanteParser {
    fn default() -> Self {
        Self::new()
    }
}
