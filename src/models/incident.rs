//! NEISS incident records
//!
//! A raw record is one tab-delimited line of the NEISS extract. An enriched record is the
//! filtered, decoded form written by the product filter and read by every later stage.

use std::fmt;

use smallvec::SmallVec;

/// Field delimiter of raw and enriched records
pub const TAB_DELIMITER: char = '\t';

/// Maximum number of fields in a raw record
pub const SCHEMA_SIZE: usize = 19;

/// Minimum number of fields in a raw record; the second description is optional
pub const MIN_SCHEMA_SIZE: usize = SCHEMA_SIZE - 1;

/// Width of a normalized case number
pub const CASE_NUMBER_WIDTH: usize = 9;

/// Number of value fields of an enriched record (everything but the case number)
pub const ENRICHED_VALUE_FIELDS: usize = 13;

/// Fields of a raw NEISS record, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawField {
    CaseNumber = 0,
    TreatmentDate = 1,
    Hospital = 2,
    Weight = 3,
    Stratum = 4,
    Age = 5,
    Gender = 6,
    Race = 7,
    RaceOther = 8,
    Diagnosis = 9,
    DiagnosisOther = 10,
    BodyPart = 11,
    Disposition = 12,
    Location = 13,
    FireDept = 14,
    Product1 = 15,
    Product2 = 16,
    Description1 = 17,
    Description2 = 18,
}

/// Why a raw line could not be read as a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    /// The line has no tab at all
    #[error("Found a record not formatted correctly for the schema")]
    NoDelimiter,
    /// The line has tabs but too few fields
    #[error("Found a record with {0} tab delimited fields. Expected 18 or 19 for this schema")]
    TooFewFields(usize),
}

/// One raw NEISS line split into its fields
///
/// The line is split into at most 19 fields; any tabs beyond the 18th stay inside the
/// last field.
#[derive(Debug, Clone)]
pub struct RawRecord<'a> {
    fields: SmallVec<[&'a str; SCHEMA_SIZE]>,
}

impl<'a> RawRecord<'a> {
    /// Split a raw line, rejecting lines that can't match the schema
    pub fn parse(line: &'a str) -> Result<Self, MalformedRecord> {
        if !line.contains(TAB_DELIMITER) {
            return Err(MalformedRecord::NoDelimiter);
        }

        let fields: SmallVec<[&'a str; SCHEMA_SIZE]> =
            line.splitn(SCHEMA_SIZE, TAB_DELIMITER).collect();
        if fields.len() < MIN_SCHEMA_SIZE {
            return Err(MalformedRecord::TooFewFields(fields.len()));
        }

        Ok(Self { fields })
    }

    /// Value of a field; the optional second description reads as empty when absent
    #[must_use]
    pub fn field(&self, field: RawField) -> &'a str {
        self.fields.get(field as usize).copied().unwrap_or("")
    }

    /// Number of fields present (18 or 19)
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false; a parsed record has at least 18 fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Both description fields joined without a separator
    #[must_use]
    pub fn description(&self) -> String {
        let mut description = self.field(RawField::Description1).to_string();
        description.push_str(self.field(RawField::Description2));
        description
    }

    /// Both product codes joined by a single space
    #[must_use]
    pub fn products(&self) -> String {
        format!("{} {}", self.field(RawField::Product1), self.field(RawField::Product2))
    }
}

/// Left-pad a case number with zeros to nine characters
///
/// # Errors
/// Returns the original case number when it is already longer than nine characters.
pub fn pad_case_number(case_number: &str) -> Result<String, String> {
    if case_number.chars().count() > CASE_NUMBER_WIDTH {
        return Err(case_number.to_string());
    }
    Ok(format!("{case_number:0>width$}", width = CASE_NUMBER_WIDTH))
}

/// Year of a `MM/DD/YYYY` treatment date, taken from its third `/` component
#[must_use]
pub fn parse_treatment_year(date: &str) -> Option<i32> {
    date.split('/').nth(2).and_then(|year| year.trim().parse::<i32>().ok())
}

/// A filtered incident with its coded fields expanded to text
///
/// `Display` renders only the value part (the 13 fields after the case number) since
/// the case number travels as the record key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EnrichedRecord {
    pub case_number: String,
    pub treatment_date: String,
    pub hospital: String,
    pub weight: String,
    pub stratum: String,
    pub age: String,
    pub gender: String,
    pub race: String,
    pub diagnosis: String,
    pub body_part: String,
    pub disposition: String,
    pub location: String,
    pub products: String,
    pub description: String,
}

impl EnrichedRecord {
    /// Read a `case\tvalue` line written by the product filter
    ///
    /// The value is split into at most 13 fields so a description containing tabs
    /// survives intact. Returns `None` for lines with fewer fields.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let (case_number, value) = line.split_once(TAB_DELIMITER)?;
        let fields: SmallVec<[&str; ENRICHED_VALUE_FIELDS]> =
            value.splitn(ENRICHED_VALUE_FIELDS, TAB_DELIMITER).collect();
        if fields.len() < ENRICHED_VALUE_FIELDS {
            return None;
        }

        Some(Self {
            case_number: case_number.to_string(),
            treatment_date: fields[0].to_string(),
            hospital: fields[1].to_string(),
            weight: fields[2].to_string(),
            stratum: fields[3].to_string(),
            age: fields[4].to_string(),
            gender: fields[5].to_string(),
            race: fields[6].to_string(),
            diagnosis: fields[7].to_string(),
            body_part: fields[8].to_string(),
            disposition: fields[9].to_string(),
            location: fields[10].to_string(),
            products: fields[11].to_string(),
            description: fields[12].to_string(),
        })
    }

    /// Treatment year, if the date carries one
    #[must_use]
    pub fn treatment_year(&self) -> Option<i32> {
        parse_treatment_year(&self.treatment_date)
    }
}

impl fmt::Display for EnrichedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            &self.treatment_date,
            &self.hospital,
            &self.weight,
            &self.stratum,
            &self.age,
            &self.gender,
            &self.race,
            &self.diagnosis,
            &self.body_part,
            &self.disposition,
            &self.location,
            &self.products,
            &self.description,
        ];
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            f.write_str(field)?;
        }
        Ok(())
    }
}
