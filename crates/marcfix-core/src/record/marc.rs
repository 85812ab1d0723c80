//! Bibliographic record model.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, InvalidInputError};
use crate::types::RecordId;

/// Tag of the control number field.
pub const CONTROL_NUMBER_TAG: &str = "001";

/// Tag of the cataloging metadata field carried forward on rollback.
pub const CATALOGING_TAG: &str = "CAT";

/// Marker printed before each subfield code.
const SUBFIELD_MARKER: char = '‡';

/// A bibliographic record: a leader and an ordered list of fields.
///
/// Equality is structural and order-sensitive: two records are equal only
/// if every field matches in the same position. `Clone` produces a deep,
/// independent copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The record leader.
    #[serde(default)]
    pub leader: String,

    /// Control and data fields, in record order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A single field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    /// A control field with an unstructured value.
    Control {
        /// Field tag.
        tag: String,
        /// Field value.
        value: String,
    },
    /// A data field with indicators and subfields.
    Data {
        /// Field tag.
        tag: String,
        /// First indicator.
        #[serde(default = "blank_indicator")]
        ind1: String,
        /// Second indicator.
        #[serde(default = "blank_indicator")]
        ind2: String,
        /// Subfields, in order.
        subfields: Vec<Subfield>,
    },
}

/// A coded subfield of a data field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code.
    pub code: String,
    /// Subfield value.
    pub value: String,
}

fn blank_indicator() -> String {
    " ".to_string()
}

impl Record {
    /// Create an empty record with the given leader.
    pub fn new(leader: impl Into<String>) -> Self {
        Self {
            leader: leader.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field append.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a field at the end of the record.
    pub fn append_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Iterate over fields with the given tag.
    pub fn get<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag() == tag)
    }

    /// Returns the value of the control number field, if present.
    pub fn control_number(&self) -> Option<&str> {
        self.get(CONTROL_NUMBER_TAG).find_map(Field::value)
    }

    /// Returns the record id held in the control number field.
    ///
    /// # Errors
    ///
    /// Fails if the record has no control number or it is not a valid id.
    pub fn id(&self) -> Result<RecordId, Error> {
        let value = self.control_number().ok_or_else(|| InvalidInputError::Record {
            reason: "record has no 001 control number".to_string(),
        })?;
        RecordId::new(value)
    }
}

impl Field {
    /// Create a control field.
    pub fn control(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Field::Control {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Create a data field from `(code, value)` pairs.
    pub fn data(
        tag: impl Into<String>,
        ind1: impl Into<String>,
        ind2: impl Into<String>,
        subfields: &[(&str, &str)],
    ) -> Self {
        Field::Data {
            tag: tag.into(),
            ind1: ind1.into(),
            ind2: ind2.into(),
            subfields: subfields
                .iter()
                .map(|(code, value)| Subfield {
                    code: (*code).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
        }
    }

    /// Returns the field tag.
    pub fn tag(&self) -> &str {
        match self {
            Field::Control { tag, .. } | Field::Data { tag, .. } => tag,
        }
    }

    /// Returns the value of a control field.
    pub fn value(&self) -> Option<&str> {
        match self {
            Field::Control { value, .. } => Some(value),
            Field::Data { .. } => None,
        }
    }

    /// Returns the subfields of a data field (empty for control fields).
    pub fn subfields(&self) -> &[Subfield] {
        match self {
            Field::Control { .. } => &[],
            Field::Data { subfields, .. } => subfields,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Control { tag, value } => write!(f, "{tag}    {value}"),
            Field::Data {
                tag,
                ind1,
                ind2,
                subfields,
            } => {
                write!(f, "{tag} {ind1}{ind2} ")?;
                for sub in subfields {
                    write!(f, "{SUBFIELD_MARKER}{}{}", sub.code, sub.value)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LDR    {}", self.leader)?;
        for field in &self.fields {
            write!(f, "\n{field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        Record::new("00000cca^a22000007i^4500")
            .with_field(Field::control("001", "009877349"))
            .with_field(Field::data("245", "1", "0", &[("a", "Writing's on the wall.")]))
    }

    #[test]
    fn control_number_and_id() {
        let record = sample();
        assert_eq!(record.control_number(), Some("009877349"));
        assert_eq!(record.id().unwrap().value(), 9_877_349);
        assert!(Record::new("x").id().is_err());
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = sample();
        let mut b = Record::new(a.leader.clone());
        b.fields = a.fields.iter().rev().cloned().collect();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn clone_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        copy.append_field(Field::control("005", "20180201"));
        assert_eq!(original.fields.len(), 2);
        assert_eq!(copy.fields.len(), 3);
    }

    #[test]
    fn display_renders_marc_text() {
        let text = sample().to_string();
        assert_eq!(
            text,
            "LDR    00000cca^a22000007i^4500\n001    009877349\n245 10 ‡aWriting's on the wall."
        );
    }

    #[test]
    fn deserializes_both_field_kinds() {
        let record: Record = serde_json::from_value(json!({
            "leader": "00000cam",
            "fields": [
                {"tag": "001", "value": "42"},
                {"tag": "500", "ind1": " ", "ind2": " ", "subfields": [{"code": "a", "value": "Note"}]},
                {"tag": "650", "subfields": [{"code": "a", "value": "Topic"}]}
            ]
        }))
        .unwrap();

        assert_eq!(record.fields[0], Field::control("001", "42"));
        assert_eq!(record.fields[1].subfields()[0].value, "Note");
        assert_eq!(record.fields[2], Field::data("650", " ", " ", &[("a", "Topic")]));
    }
}
