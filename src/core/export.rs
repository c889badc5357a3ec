use crate::domain::model::LaunchEntry;
use crate::utils::error::{LaunchError, Result};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use zip::write::{FileOptions, ZipWriter};

pub const ZIP_FILENAME: &str = "launches.zip";

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    mission_name: &'a str,
    launch_date: &'a str,
    launch_year: i32,
    site_name: &'a str,
    rocket_name: &'a str,
    details: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    id: &'a str,
    mission_id: &'a [String],
    mission_name: &'a str,
    launch_date: &'a str,
    launch_date_local: &'a str,
    launch_year: i32,
    site_name: &'a str,
    rocket_name: &'a str,
    details: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub contents: Vec<u8>,
}

fn export_row(entry: &LaunchEntry) -> ExportRow<'_> {
    ExportRow {
        id: entry.id(),
        mission_name: entry.launch.mission_name(),
        launch_date: &entry.display_date,
        launch_year: entry.year,
        site_name: entry.launch.site_name(),
        rocket_name: entry.launch.rocket_name(),
        details: entry.launch.details().unwrap_or(""),
    }
}

pub fn to_delimited(launches: &[Arc<LaunchEntry>], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    if launches.is_empty() {
        // serialize 不會為空集合寫出標題列
        writer.write_record([
            "id",
            "mission_name",
            "launch_date",
            "launch_year",
            "site_name",
            "rocket_name",
            "details",
        ])?;
    }
    for entry in launches {
        writer.serialize(export_row(entry))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LaunchError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| LaunchError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

pub fn to_json(launches: &[Arc<LaunchEntry>]) -> Result<String> {
    let rows: Vec<JsonRow<'_>> = launches
        .iter()
        .map(|entry| JsonRow {
            id: entry.id(),
            mission_id: &entry.launch.mission_id,
            mission_name: entry.launch.mission_name(),
            launch_date: &entry.display_date,
            launch_date_local: entry.raw_date(),
            launch_year: entry.year,
            site_name: entry.launch.site_name(),
            rocket_name: entry.launch.rocket_name(),
            details: entry.launch.details(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Renders one file per requested format, in the order given.
pub fn render(launches: &[Arc<LaunchEntry>], formats: &[String]) -> Result<Vec<ExportFile>> {
    let mut files = Vec::with_capacity(formats.len());
    for format in formats {
        let (name, contents) = match format.as_str() {
            "csv" => ("launches.csv", to_delimited(launches, b',')?),
            "tsv" => ("launches.tsv", to_delimited(launches, b'\t')?),
            "json" => ("launches.json", to_json(launches)?),
            other => {
                return Err(LaunchError::InvalidConfigValueError {
                    field: "formats".to_string(),
                    value: other.to_string(),
                    reason: "Unsupported export format".to_string(),
                })
            }
        };
        files.push(ExportFile {
            name: name.to_string(),
            contents: contents.into_bytes(),
        });
    }
    Ok(files)
}

pub fn bundle_zip(files: &[ExportFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for file in files {
        zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
        zip.write_all(&file.contents)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
