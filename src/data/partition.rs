//! Partition the raw volume report into Calls and Puts
//!
//! The report nests records as `monthData[].strikeData[]`. Each record is
//! judged on its own: a malformed one is skipped with a reason and the rest
//! of the batch carries on.

use serde_json::Value;
use std::fmt;

use crate::core::{coerce_number, ChartDataset, OptionType, StrikeBounds, StrikeRecord};

/// Why a strike record did not make it into the dataset
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Record is not a JSON object
    NotAnObject,
    /// `strike` missing or unreadable
    UnparsableStrike,
    /// Strike outside the requested bounds
    OutOfRange { strike: f64 },
    /// `monthID` missing or not a string
    MissingCategory,
    /// `monthID` ends in neither `-Calls` nor `-Puts`
    UnknownSide { month_id: String },
}

impl SkipReason {
    /// Out-of-range and other-side records are expected; the rest are malformed
    pub fn is_malformed(&self) -> bool {
        !matches!(
            self,
            SkipReason::OutOfRange { .. } | SkipReason::UnknownSide { .. }
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "record is not an object"),
            SkipReason::UnparsableStrike => write!(f, "strike is missing or not a number"),
            SkipReason::OutOfRange { strike } => write!(f, "strike {} outside bounds", strike),
            SkipReason::MissingCategory => write!(f, "monthID is missing"),
            SkipReason::UnknownSide { month_id } => {
                write!(f, "monthID {:?} is neither calls nor puts", month_id)
            }
        }
    }
}

/// Result of partitioning a single record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Record kept; `defaulted` names fields that fell back to 0.0
    Kept {
        record: StrikeRecord,
        defaulted: Vec<&'static str>,
    },
    Skipped(SkipReason),
}

/// Outcome of one record with its position in the report
#[derive(Debug, Clone, PartialEq)]
pub struct RecordReport {
    /// Index into `monthData`
    pub month: usize,
    /// Index into that month's `strikeData`
    pub index: usize,
    pub outcome: RecordOutcome,
}

/// Partitioned dataset plus the per-record audit trail
#[derive(Debug, Clone, Default)]
pub struct PartitionReport {
    pub dataset: ChartDataset,
    pub records: Vec<RecordReport>,
}

impl PartitionReport {
    pub fn kept(&self) -> impl Iterator<Item = &RecordReport> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Kept { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&RecordReport, &SkipReason)> {
        self.records.iter().filter_map(|r| match &r.outcome {
            RecordOutcome::Skipped(reason) => Some((r, reason)),
            RecordOutcome::Kept { .. } => None,
        })
    }
}

/// Judge one `strikeData` element against the bounds
///
/// `change` and `totalVolume` are lenient: unreadable values become 0.0 and
/// are listed in `defaulted`. `strike` is not: an unreadable strike skips the
/// record as [`SkipReason::UnparsableStrike`] even when 0 lies inside `bounds`.
pub fn classify_record(raw: &Value, bounds: &StrikeBounds) -> RecordOutcome {
    let Some(fields) = raw.as_object() else {
        return RecordOutcome::Skipped(SkipReason::NotAnObject);
    };

    let Some(strike) = coerce_number(fields.get("strike")) else {
        return RecordOutcome::Skipped(SkipReason::UnparsableStrike);
    };
    if !bounds.contains(strike) {
        return RecordOutcome::Skipped(SkipReason::OutOfRange { strike });
    }

    let Some(month_id) = fields.get("monthID").and_then(Value::as_str) else {
        return RecordOutcome::Skipped(SkipReason::MissingCategory);
    };
    let Some(side) = OptionType::from_month_id(month_id) else {
        return RecordOutcome::Skipped(SkipReason::UnknownSide {
            month_id: month_id.to_string(),
        });
    };

    let mut defaulted = Vec::new();
    let mut lenient = |name: &'static str| {
        coerce_number(fields.get(name)).unwrap_or_else(|| {
            defaulted.push(name);
            0.0
        })
    };
    let change = lenient("change");
    let volume = lenient("totalVolume");

    RecordOutcome::Kept {
        record: StrikeRecord::new(strike, change, volume, side),
        defaulted,
    }
}

/// Partition a whole report into ordered Calls/Puts within `bounds`
pub fn partition_report(payload: &Value, bounds: &StrikeBounds) -> PartitionReport {
    let mut report = PartitionReport::default();

    let Some(months) = payload.get("monthData").and_then(Value::as_array) else {
        tracing::warn!("Report has no monthData array");
        return report;
    };

    for (month, month_data) in months.iter().enumerate() {
        let Some(strikes) = month_data.get("strikeData").and_then(Value::as_array) else {
            tracing::debug!("monthData[{}] has no strikeData", month);
            continue;
        };

        for (index, raw) in strikes.iter().enumerate() {
            let outcome = classify_record(raw, bounds);
            match &outcome {
                RecordOutcome::Kept { record, defaulted } => {
                    if !defaulted.is_empty() {
                        tracing::warn!(
                            "monthData[{}].strikeData[{}]: {:?} unreadable, using 0.0",
                            month,
                            index,
                            defaulted
                        );
                    }
                    report.dataset.push(*record);
                }
                RecordOutcome::Skipped(reason) if reason.is_malformed() => {
                    tracing::warn!("Skipping monthData[{}].strikeData[{}]: {}", month, index, reason);
                }
                RecordOutcome::Skipped(reason) => {
                    tracing::debug!("Filtered monthData[{}].strikeData[{}]: {}", month, index, reason);
                }
            }
            report.records.push(RecordReport {
                month,
                index,
                outcome,
            });
        }
    }

    report.dataset.sort();
    tracing::info!(
        "Partitioned {} records: {} calls, {} puts",
        report.records.len(),
        report.dataset.calls.len(),
        report.dataset.puts.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bounds() -> StrikeBounds {
        StrikeBounds::new(3300.0, 3400.0)
    }

    #[test]
    fn test_two_call_scenario() {
        let payload = json!({
            "monthData": [{
                "strikeData": [
                    {"strike": "3400", "change": "-3", "totalVolume": "10", "monthID": "OG Q25-Calls"},
                    {"strike": "3300", "change": "12", "totalVolume": "500", "monthID": "OG Q25-Calls"}
                ]
            }]
        });

        let report = partition_report(&payload, &bounds());
        let calls = &report.dataset.calls;

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], StrikeRecord::new(3300.0, 12.0, 500.0, OptionType::Call));
        assert_eq!(calls[1], StrikeRecord::new(3400.0, -3.0, 10.0, OptionType::Call));
        assert!(report.dataset.puts.is_empty());
        assert_eq!(report.skipped().count(), 0);
    }

    #[test]
    fn test_boundary_inclusion() {
        let payload = json!({
            "monthData": [{
                "strikeData": [
                    {"strike": 3299, "change": 1, "totalVolume": 1, "monthID": "OG-Calls"},
                    {"strike": 3300, "change": 1, "totalVolume": 1, "monthID": "OG-Calls"},
                    {"strike": 3400, "change": 1, "totalVolume": 1, "monthID": "OG-Puts"},
                    {"strike": 3401, "change": 1, "totalVolume": 1, "monthID": "OG-Puts"}
                ]
            }]
        });

        let report = partition_report(&payload, &bounds());
        assert_eq!(report.dataset.calls.len(), 1);
        assert_eq!(report.dataset.calls[0].strike, 3300.0);
        assert_eq!(report.dataset.puts.len(), 1);
        assert_eq!(report.dataset.puts[0].strike, 3400.0);

        let out_of_range: Vec<f64> = report
            .skipped()
            .filter_map(|(_, reason)| match reason {
                SkipReason::OutOfRange { strike } => Some(*strike),
                _ => None,
            })
            .collect();
        assert_eq!(out_of_range, vec![3299.0, 3401.0]);
    }

    #[test]
    fn test_side_routing() {
        let payload = json!({
            "monthData": [{
                "strikeData": [
                    {"strike": 3350, "change": 1, "totalVolume": 1, "monthID": "OG Q25-Calls"},
                    {"strike": 3350, "change": 2, "totalVolume": 2, "monthID": "OG Q25-Puts"},
                    {"strike": 3350, "change": 3, "totalVolume": 3, "monthID": "OG Q25-Futures"}
                ]
            }]
        });

        let report = partition_report(&payload, &bounds());
        assert_eq!(report.dataset.calls.len(), 1);
        assert_eq!(report.dataset.calls[0].change, 1.0);
        assert_eq!(report.dataset.puts.len(), 1);
        assert_eq!(report.dataset.puts[0].change, 2.0);

        let skipped: Vec<_> = report.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0.index, 2);
        assert_eq!(
            skipped[0].1,
            &SkipReason::UnknownSide {
                month_id: "OG Q25-Futures".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_records_are_isolated() {
        let payload = json!({
            "monthData": [
                {"strikeData": [
                    "garbage",
                    {"strike": "abc", "monthID": "OG-Calls"},
                    {"strike": 3320, "change": 4},
                    {"strike": 3320, "change": 4, "monthID": 17},
                    {"strike": "3,330", "change": "1,005.5", "totalVolume": "", "monthID": "OG-Calls"}
                ]},
                {"noStrikes": true},
                {"strikeData": [
                    {"strike": 3340, "change": "-6", "totalVolume": "2,000", "monthID": "OG-Puts"}
                ]}
            ]
        });

        let report = partition_report(&payload, &bounds());

        let reasons: Vec<SkipReason> = report.skipped().map(|(_, r)| r.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::NotAnObject,
                SkipReason::UnparsableStrike,
                SkipReason::MissingCategory,
                SkipReason::MissingCategory,
            ]
        );
        assert!(reasons.iter().all(SkipReason::is_malformed));

        assert_eq!(report.dataset.calls.len(), 1);
        assert_eq!(report.dataset.calls[0].change, 1005.5);
        assert_eq!(report.dataset.calls[0].volume, 0.0);
        assert_eq!(report.dataset.puts[0].volume, 2000.0);

        let kept: Vec<_> = report.kept().collect();
        assert_eq!(kept.len(), 2);
        assert_eq!((kept[1].month, kept[1].index), (2, 0));
        match &kept[0].outcome {
            RecordOutcome::Kept { defaulted, .. } => assert_eq!(defaulted, &vec!["totalVolume"]),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_strike_not_zero() {
        let around_zero = StrikeBounds::new(-10.0, 10.0);
        let record = json!({"strike": "n/a", "change": 7, "totalVolume": 3, "monthID": "OG-Calls"});
        assert_eq!(
            classify_record(&record, &around_zero),
            RecordOutcome::Skipped(SkipReason::UnparsableStrike)
        );

        let zero = json!({"strike": "0", "change": 7, "totalVolume": 3, "monthID": "OG-Calls"});
        assert!(matches!(
            classify_record(&zero, &around_zero),
            RecordOutcome::Kept { .. }
        ));
    }

    #[test]
    fn test_missing_month_data() {
        let report = partition_report(&json!({"error": "nope"}), &bounds());
        assert!(report.dataset.is_empty());
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_sorted_ascending_across_months() {
        let payload = json!({
            "monthData": [
                {"strikeData": [{"strike": 3380, "change": 1, "totalVolume": 1, "monthID": "A-Puts"}]},
                {"strikeData": [{"strike": 3310, "change": 1, "totalVolume": 1, "monthID": "A-Puts"}]}
            ]
        });

        let mut dataset = partition_report(&payload, &bounds()).dataset;
        let strikes: Vec<f64> = dataset.puts.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![3310.0, 3380.0]);

        let before = dataset.clone();
        dataset.sort();
        assert_eq!(dataset, before);
    }
}
