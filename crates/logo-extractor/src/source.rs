//! Load site identifiers from a Parquet table.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use parquet::errors::ParquetError;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use parquet::schema::types::Type as SchemaType;

use crate::types::{ExtractError, ExtractResult};

/// Read one column of a Parquet file as site strings.
///
/// Nulls are dropped and duplicates removed, keeping first-seen order.
/// Non-string scalars are converted with their display form.
pub fn load_sites(path: &Path, column: &str) -> ExtractResult<Vec<String>> {
    let source_err = |reason: String| ExtractError::SourceLoad {
        path: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|e| source_err(e.to_string()))?;
    let reader = SerializedFileReader::new(file).map_err(|e| source_err(e.to_string()))?;

    let schema = reader.metadata().file_metadata().schema();
    let Some(field) = schema
        .get_fields()
        .iter()
        .find(|f| f.name() == column)
        .cloned()
    else {
        return Err(ExtractError::MissingColumn {
            path: path.display().to_string(),
            column: column.to_string(),
            available: column_names(schema),
        });
    };

    // Only the requested column is decoded.
    let projection = SchemaType::group_type_builder(schema.name())
        .with_fields(vec![field])
        .build()
        .map_err(|e| source_err(e.to_string()))?;
    let rows = reader
        .get_row_iter(Some(projection))
        .map_err(|e| source_err(e.to_string()))?;

    let mut values = Vec::new();
    for row in rows {
        let row = row.map_err(|e: ParquetError| source_err(e.to_string()))?;
        let value = row
            .get_column_iter()
            .find(|(name, _)| name.as_str() == column)
            .and_then(|(_, field)| field_to_site(field));
        if let Some(site) = value {
            values.push(site);
        }
    }

    Ok(dedup_sites(values))
}

/// Remove duplicates by exact string equality, keeping first occurrences.
pub fn dedup_sites<I>(sites: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    sites
        .into_iter()
        .filter(|site| seen.insert(site.clone()))
        .collect()
}

fn column_names(schema: &SchemaType) -> Vec<String> {
    schema
        .get_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect()
}

fn field_to_site(field: &Field) -> Option<String> {
    match field {
        Field::Null => None,
        Field::Str(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
