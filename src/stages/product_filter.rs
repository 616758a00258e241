//! Record filter and enricher
//!
//! Keeps the raw NEISS records whose product codes name an amusement attraction, expands
//! their coded fields through the broadcast code tables and re-keys them by a nine
//! character case number. Map-only.

use std::path::Path;
use std::sync::Arc;

use log::error;

use crate::broadcast::{CodeTables, Dimension};
use crate::config::PipelineConfig;
use crate::engine::{InputSplit, JobReport, MapOnlyJob, Mapper, TaskContext};
use crate::error::Result;
use crate::models::{EnrichedRecord, MalformedRecord, RawField, RawRecord, pad_case_number};

/// Job name used in logs and reports
pub const JOB_NAME: &str = "Filter NEISS Data by Products";

pub const NUM_AMUSEMENTS: &str = "NUM_AMUSEMENTS";
pub const NUM_REJECTED: &str = "NUM_REJECTED";
pub const BAD_RECORD: &str = "BAD_RECORD";
pub const MALFORMED_RECORD: &str = "MALFORMED_RECORD";
pub const CASE_NUMBER_TOO_LONG: &str = "CASE_NUMBER_TOO_LONG";

/// Product codes of amusement attractions, sorted for binary search
///
/// 1200 sports and recreation (n.e.c.), 1242 slides, 1293 amusement attractions,
/// 3219 other playground equipment, 3293-3295 water slides.
pub const AMUSEMENT_PRODUCT_CODES: [i32; 7] = [1200, 1242, 1293, 3219, 3293, 3294, 3295];

/// Whether either product code names an amusement attraction
///
/// A non-numeric first code ends the check without looking at the second.
#[must_use]
pub fn is_amusement_product(first: &str, second: &str) -> bool {
    let Ok(first) = first.parse::<i32>() else {
        return false;
    };
    if AMUSEMENT_PRODUCT_CODES.binary_search(&first).is_ok() {
        return true;
    }
    second
        .parse::<i32>()
        .is_ok_and(|code| AMUSEMENT_PRODUCT_CODES.binary_search(&code).is_ok())
}

/// Mapper filtering and enriching raw records
pub struct ProductMapper {
    tables: Arc<CodeTables>,
}

impl ProductMapper {
    #[must_use]
    pub fn new(tables: Arc<CodeTables>) -> Self {
        Self { tables }
    }

    fn enrich(
        &self,
        record: &RawRecord<'_>,
        line: &str,
        ctx: &mut TaskContext<String, EnrichedRecord>,
    ) -> EnrichedRecord {
        let raw_case_number = record.field(RawField::CaseNumber);
        let case_number = pad_case_number(raw_case_number).unwrap_or_else(|original| {
            ctx.increment(CASE_NUMBER_TOO_LONG, 1);
            error!(
                "Case number \"{original}\" is {} characters, longer than a padded case number",
                original.chars().count()
            );
            original
        });

        let mut decode = |dimension: Dimension, field: RawField, detail: Option<RawField>| {
            self.decode(record, &case_number, line, dimension, field, detail, ctx)
        };
        let gender = decode(Dimension::Gender, RawField::Gender, None);
        let race = decode(Dimension::Race, RawField::Race, Some(RawField::RaceOther));
        let diagnosis = decode(
            Dimension::Diagnosis,
            RawField::Diagnosis,
            Some(RawField::DiagnosisOther),
        );
        let body_part = decode(Dimension::BodyPart, RawField::BodyPart, None);
        let disposition = decode(Dimension::Disposition, RawField::Disposition, None);
        let location = decode(Dimension::Location, RawField::Location, None);

        EnrichedRecord {
            treatment_date: record.field(RawField::TreatmentDate).to_string(),
            hospital: record.field(RawField::Hospital).to_string(),
            weight: record.field(RawField::Weight).to_string(),
            stratum: record.field(RawField::Stratum).to_string(),
            age: record.field(RawField::Age).to_string(),
            gender,
            race,
            diagnosis,
            body_part,
            disposition,
            location,
            products: record.products(),
            description: record.description(),
            case_number,
        }
    }

    /// Decode one coded field, substituting the dimension's unknown code for values that
    /// don't parse or aren't in the table
    #[allow(clippy::too_many_arguments)]
    fn decode(
        &self,
        record: &RawRecord<'_>,
        case_number: &str,
        line: &str,
        dimension: Dimension,
        field: RawField,
        detail: Option<RawField>,
        ctx: &mut TaskContext<String, EnrichedRecord>,
    ) -> String {
        let raw = record.field(field);
        let code = if raw.is_empty() {
            dimension.unknown_code()
        } else {
            match raw.parse::<i32>() {
                Ok(code) if self.tables.describe(dimension, code).is_some() => code,
                Ok(code) => {
                    let reason = format!("unknown code {code}");
                    self.report_bad_value(dimension, case_number, record, line, &reason, ctx);
                    dimension.unknown_code()
                }
                Err(e) => {
                    let reason = format!("\"{raw}\": {e}");
                    self.report_bad_value(dimension, case_number, record, line, &reason, ctx);
                    dimension.unknown_code()
                }
            }
        };

        let text = self.tables.describe(dimension, code).unwrap_or_default();
        match detail {
            Some(detail) if dimension.other_code() == Some(code) => {
                format!("{text}-{}", record.field(detail).to_uppercase())
            }
            _ => text.to_string(),
        }
    }

    fn report_bad_value(
        &self,
        dimension: Dimension,
        case_number: &str,
        record: &RawRecord<'_>,
        line: &str,
        reason: &str,
        ctx: &mut TaskContext<String, EnrichedRecord>,
    ) {
        ctx.increment(BAD_RECORD, 1);
        ctx.increment(dimension.bad_value_counter(), 1);
        error!(
            "CaseNbr={case_number} TreatmentDate={} {dimension} {reason}",
            record.field(RawField::TreatmentDate)
        );
        error!("BAD_DATA: \"{line}\"");
    }
}

impl Mapper for ProductMapper {
    type Key = String;
    type Value = EnrichedRecord;

    fn map(&self, line: &str, _split: &InputSplit, ctx: &mut TaskContext<String, EnrichedRecord>) {
        let record = match RawRecord::parse(line) {
            Ok(record) => record,
            Err(e) => {
                ctx.increment(BAD_RECORD, 1);
                if matches!(e, MalformedRecord::TooFewFields(_)) {
                    ctx.increment(MALFORMED_RECORD, 1);
                }
                error!("{e}");
                error!("BAD_DATA: \"{line}\"");
                return;
            }
        };

        let (first, second) = (record.field(RawField::Product1), record.field(RawField::Product2));
        if !is_amusement_product(first, second) {
            ctx.increment(NUM_REJECTED, 1);
            return;
        }

        let enriched = self.enrich(&record, line, ctx);
        ctx.write(enriched.case_number.clone(), enriched);
        ctx.increment(NUM_AMUSEMENTS, 1);
    }
}

/// Run the product filter over raw NEISS partitions
///
/// The six code tables are loaded from the configured reference directory before any
/// record is read; a missing or empty table fails the job.
pub fn run(input_dir: &Path, output_dir: &Path, config: &PipelineConfig) -> Result<JobReport> {
    let tables = Arc::new(CodeTables::load(&config.reference_dir)?);
    run_with_tables(input_dir, output_dir, config, tables)
}

/// Run the product filter with code tables that are already loaded
pub fn run_with_tables(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    tables: Arc<CodeTables>,
) -> Result<JobReport> {
    let mapper = ProductMapper::new(tables);
    MapOnlyJob::new(JOB_NAME, &mapper).run(input_dir, output_dir, config)
}
