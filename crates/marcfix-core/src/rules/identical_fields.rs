//! Duplicate-field detection and removal.

use std::collections::HashSet;

use super::FixRule;
use crate::Result;
use crate::record::{FieldFix, Finding, FindingKind, Record, ValidatorReport};

/// Removes exact duplicate fields, keeping the first occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdenticalFields;

impl FixRule for IdenticalFields {
    fn name(&self) -> &str {
        "IdenticalFields"
    }

    fn apply(&self, record: &mut Record, fix: bool) -> Result<ValidatorReport> {
        let mut report = ValidatorReport::new(self.name());
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(record.fields.len());

        for field in std::mem::take(&mut record.fields) {
            if seen.contains(&field) {
                report.findings.push(Finding {
                    kind: FindingKind::Warning,
                    message: format!("Identical field {}", field.tag()),
                    fix: fix.then(|| FieldFix {
                        kind: "removed".to_string(),
                        field: field.clone(),
                    }),
                });
                if fix {
                    continue;
                }
            } else {
                seen.insert(field.clone());
            }
            kept.push(field);
        }

        record.fields = kept;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[test]
    fn keeps_first_occurrence_in_place() {
        let note = Field::data("500", " ", " ", &[("a", "Note")]);
        let mut record = Record::new("x")
            .with_field(Field::control("001", "000000001"))
            .with_field(note.clone())
            .with_field(Field::data("650", " ", "0", &[("a", "Cats")]))
            .with_field(note.clone());

        let report = IdenticalFields.apply(&mut record, true).unwrap();

        let tags: Vec<_> = record.fields.iter().map(Field::tag).collect();
        assert_eq!(tags, vec!["001", "500", "650"]);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].fix.as_ref().unwrap().field, note);
    }

    #[test]
    fn indicators_make_fields_distinct() {
        let mut record = Record::new("x")
            .with_field(Field::data("245", "1", "0", &[("a", "Title")]))
            .with_field(Field::data("245", "0", "0", &[("a", "Title")]));

        let report = IdenticalFields.apply(&mut record, true).unwrap();
        assert!(report.findings.is_empty());
        assert_eq!(record.fields.len(), 2);
    }

    #[test]
    fn report_mode_has_no_fixes() {
        let mut record = Record::new("x")
            .with_field(Field::control("005", "1"))
            .with_field(Field::control("005", "1"));

        let report = IdenticalFields.apply(&mut record, false).unwrap();
        assert_eq!(record.fields.len(), 2);
        assert!(report.findings[0].fix.is_none());
    }
}
