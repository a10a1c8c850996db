use std::{fs::File, io::Write, path::Path};

use anyhow::Result;

use crate::domain::CompanyRecord;

/// Header row plus one row per record. Nothing is written for an empty list.
pub fn write_csv(records: &[CompanyRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        log::info!("No records, skipping {}", path.display());
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn write_json(records: &[CompanyRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_csv, write_json};
    use crate::domain::CompanyRecord;

    fn acme() -> CompanyRecord {
        CompanyRecord {
            company_name: "Acme, Co".to_string(),
            email: "info@acme.com".to_string(),
            ..CompanyRecord::new("http://acme.com")
        }
    }

    #[test]
    fn csv_header_follows_record_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");

        write_csv(&[acme(), CompanyRecord::new("http://globex.com")], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 26);
        assert_eq!(&headers[0], "company_name");
        assert_eq!(&headers[1], "website");
        assert_eq!(&headers[25], "hunter_linkedin");

        let rows: Vec<CompanyRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, vec![acme(), CompanyRecord::new("http://globex.com")]);
    }

    #[test]
    fn empty_list_writes_no_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");

        write_csv(&[], &path).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn json_is_an_indented_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");

        write_json(&[acme()], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[\n  {\n    \"company_name\": \"Acme, Co\""));
        let parsed: Vec<CompanyRecord> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, vec![acme()]);
    }
}
