use crate::error::{EpcError, SystemError};
use crate::models::PaymentRecord;
use crate::render::{EpcQrGenerator, QrEncoder};
use crate::util::slugify;
use crate::validation::validate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchIssue {
    /// 1-based data row, header excluded.
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub total_records: usize,
    pub issues: Vec<BatchIssue>,
}

impl BatchReport {
    pub fn valid_records(&self) -> usize {
        self.total_records - self.issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue messages with their counts, most frequent first.
    pub fn summary(&self) -> Vec<(&str, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for issue in &self.issues {
            *counts.entry(issue.message.as_str()).or_insert(0) += 1;
        }
        let mut items: Vec<(&str, usize)> = counts.into_iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items
    }
}

pub fn read_records(path: &Path) -> Result<Vec<PaymentRecord>, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
    let mut records = Vec::new();
    for (idx, row) in reader.deserialize().enumerate() {
        let record: PaymentRecord = row.map_err(|err| format!("row {}: {}", idx + 1, err))?;
        records.push(record);
    }
    Ok(records)
}

/// Validates every record without rendering.
pub fn check_records(records: &[PaymentRecord]) -> BatchReport {
    let mut report = BatchReport {
        total_records: records.len(),
        issues: Vec::new(),
    };
    for (idx, record) in records.iter().enumerate() {
        if let Err(err) = validate(record) {
            report.issues.push(BatchIssue {
                row: idx + 1,
                message: err.to_string(),
            });
        }
    }
    report
}

/// Renders every valid record into `output_dir` as `<row>_<name>.svg`.
///
/// Invalid records are skipped and reported. System failures (unwritable
/// directory, symbol too large) abort the batch.
pub fn render_records<E: QrEncoder>(
    records: &[PaymentRecord],
    generator: &EpcQrGenerator<E>,
    output_dir: &Path,
) -> Result<(Vec<PathBuf>, BatchReport), SystemError> {
    std::fs::create_dir_all(output_dir).map_err(|source| SystemError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut outputs = Vec::new();
    let mut report = BatchReport {
        total_records: records.len(),
        issues: Vec::new(),
    };

    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;
        let path = output_dir.join(output_file_name(row, record));
        match generator.save_as_svg(record, &path) {
            Ok(()) => outputs.push(path),
            Err(EpcError::InvalidData(err)) => {
                log::warn!("row {} skipped: {}", row, err);
                report.issues.push(BatchIssue {
                    row,
                    message: err.to_string(),
                });
            }
            Err(EpcError::System(err)) => return Err(err),
        }
    }

    Ok((outputs, report))
}

fn output_file_name(row: usize, record: &PaymentRecord) -> String {
    let slug = slugify(&record.beneficiary_name);
    if slug.is_empty() {
        format!("{row:04}.svg")
    } else {
        format!("{row:04}_{slug}.svg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CharacterSet, EpcVersion};
    use crate::render::RenderOptions;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const CSV: &str = "\
beneficiary_name,beneficiary_iban,credit_amount,version,character_set,beneficiary_bic,remittance_unstructured
Wikimedia Foundation,GB12CITI18500818796270,1.00,002,ISO-8859-1,CITIGB2L,Thank you
Franz Mustermann,DE71110220330123456789,12.3,001,UTF-8,,Invoice 7
";

    fn write_csv(dir: &Path) -> PathBuf {
        let path = dir.join("records.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_rows_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let records = read_records(&write_csv(dir.path())).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.service_tag, "BCD");
        assert_eq!(first.identification_code, "SCT");
        assert_eq!(first.version, Some(EpcVersion::V2));
        assert_eq!(first.character_set, Some(CharacterSet::Iso8859_1));
        assert_eq!(first.beneficiary_bic.as_deref(), Some("CITIGB2L"));
        assert_eq!(first.credit_amount, dec!(1.00));

        let second = &records[1];
        assert_eq!(second.version, Some(EpcVersion::V1));
        assert_eq!(second.character_set, Some(CharacterSet::Utf8));
        assert!(second.beneficiary_bic.is_none());
    }

    #[test]
    fn check_reports_invalid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let records = read_records(&write_csv(dir.path())).unwrap();
        let report = check_records(&records);
        assert_eq!(report.total_records, 2);
        assert_eq!(report.valid_records(), 1);
        assert_eq!(
            report.issues,
            vec![BatchIssue {
                row: 2,
                message: "beneficiary_bic is mandatory when using version 001".to_string(),
            }]
        );
        assert_eq!(
            report.summary(),
            vec![("beneficiary_bic is mandatory when using version 001", 1)]
        );
    }

    #[test]
    fn render_writes_valid_rows_and_skips_invalid_ones() {
        let dir = tempfile::tempdir().unwrap();
        let records = read_records(&write_csv(dir.path())).unwrap();
        let output_dir = dir.path().join("svg");
        let generator = EpcQrGenerator::new(RenderOptions::default());

        let (outputs, report) = render_records(&records, &generator, &output_dir).unwrap();
        assert_eq!(outputs, vec![output_dir.join("0001_wikimedia-foundation.svg")]);
        assert!(outputs[0].exists());
        assert!(!output_dir.join("0002_franz-mustermann.svg").exists());
        assert!(!report.is_clean());
        assert_eq!(report.issues[0].row, 2);
    }

    #[test]
    fn malformed_rows_are_reported_with_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "beneficiary_name,beneficiary_iban,credit_amount,version\nA,BE68539007547034,1.00,007\n",
        )
        .unwrap();
        let err = read_records(&path).unwrap_err();
        assert!(err.starts_with("row 1:"), "{err}");
    }
}
