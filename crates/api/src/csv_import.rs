// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV parsing and validation for bulk stock import.
//!
//! This module parses and validates stock rows without touching the store;
//! the handlers decide whether a valid row restocks an existing material or
//! creates a new one.

use csv::StringRecord;
use std::collections::HashMap;
use std::str::FromStr;
use violeta_domain::MaterialKind;

use crate::error::ApiError;

/// A stock row that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    /// The row number (1-based, excluding the header).
    pub line: usize,
    /// The material kind.
    pub kind: MaterialKind,
    /// The material name.
    pub name: String,
    /// Units to add. Always positive.
    pub quantity: i64,
    /// Unit cost in Chilean pesos. Never negative.
    pub unit_cost: i64,
}

/// A stock row that failed validation, with the raw values preserved for
/// the per-row report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRowError {
    /// The row number (1-based, excluding the header).
    pub line: usize,
    /// The kind column as given in the file.
    pub kind: String,
    /// The name column as given in the file.
    pub name: String,
    /// The parsed quantity, or zero when unparseable.
    pub quantity: i64,
    /// Zero or more validation errors, joined.
    pub message: String,
}

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &["kind", "name", "quantity", "unit_cost"];

/// Normalizes a CSV header for case-insensitive, whitespace-tolerant
/// matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let mut header_map: HashMap<String, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        let normalized: String = normalize_header(header);
        header_map.insert(normalized, idx);
    }

    let mut missing: Vec<String> = Vec::new();
    for required in REQUIRED_HEADERS {
        if !header_map.contains_key(*required) {
            missing.push(String::from(*required));
        }
    }

    if !missing.is_empty() {
        return Err(ApiError::InvalidInput {
            taxon: "VALIDATION",
            field: String::from("csv"),
            message: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

/// Parses one CSV record into a validated stock row.
fn parse_stock_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
) -> Result<StockRow, StockRowError> {
    let get_field = |name: &str| -> String {
        header_map
            .get(name)
            .and_then(|idx| record.get(*idx))
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    let kind_label: String = get_field("kind");
    let name: String = get_field("name");
    let quantity_label: String = get_field("quantity");
    let unit_cost_label: String = get_field("unit_cost");

    let mut errors: Vec<String> = Vec::new();

    let kind: Option<MaterialKind> = match MaterialKind::from_str(&kind_label) {
        Ok(kind) => Some(kind),
        Err(_) => {
            errors.push(format!(
                "kind: expected 'flower' or 'container', got '{kind_label}'"
            ));
            None
        }
    };

    if name.is_empty() {
        errors.push(String::from("name: required field is missing or empty"));
    }

    let quantity: i64 = match quantity_label.parse::<i64>() {
        Ok(quantity) if quantity > 0 => quantity,
        Ok(quantity) => {
            errors.push(format!("quantity: must be positive, got {quantity}"));
            0
        }
        Err(_) => {
            errors.push(format!("quantity: not a number: '{quantity_label}'"));
            0
        }
    };

    let unit_cost: i64 = match unit_cost_label.parse::<i64>() {
        Ok(unit_cost) if unit_cost >= 0 => unit_cost,
        Ok(unit_cost) => {
            errors.push(format!("unit_cost: must not be negative, got {unit_cost}"));
            0
        }
        Err(_) => {
            errors.push(format!("unit_cost: not a number: '{unit_cost_label}'"));
            0
        }
    };

    match (errors.is_empty(), kind) {
        (true, Some(kind)) => Ok(StockRow {
            line,
            kind,
            name,
            quantity,
            unit_cost,
        }),
        _ => Err(StockRowError {
            line,
            kind: kind_label,
            name,
            quantity,
            message: errors.join("; "),
        }),
    }
}

/// Parses CSV data into per-row results.
///
/// Malformed headers fail the whole parse; malformed rows are reported
/// individually so a partially valid file can still be applied.
///
/// # Errors
///
/// Returns an error when the header row is missing a required column or
/// the CSV itself cannot be read.
pub fn parse_stock_csv(data: &str) -> Result<Vec<Result<StockRow, StockRowError>>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput {
            taxon: "VALIDATION",
            field: String::from("csv"),
            message: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();
    let header_map: HashMap<String, usize> = validate_headers(&headers)?;

    let mut rows: Vec<Result<StockRow, StockRowError>> = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line: usize = idx + 1;
        match record {
            Ok(record) => rows.push(parse_stock_row(&record, &header_map, line)),
            Err(e) => rows.push(Err(StockRowError {
                line,
                kind: String::new(),
                name: String::new(),
                quantity: 0,
                message: format!("Malformed CSV record: {e}"),
            })),
        }
    }

    Ok(rows)
}
