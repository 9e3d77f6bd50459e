//! Report assembly

use super::aggregator::Aggregator;
use super::pricing::PricingTable;
use crate::types::{DateBucket, Report, UsageRecord};
use chrono::NaiveDate;

/// Order date buckets chronologically and drop dates without requests.
pub fn assemble(buckets: impl IntoIterator<Item = (NaiveDate, DateBucket)>) -> Report {
    let mut days: Vec<DateBucket> = buckets
        .into_iter()
        .map(|(_, bucket)| bucket)
        .filter(|bucket| bucket.total_requests > 0)
        .collect();
    days.sort_by_key(|bucket| bucket.date);
    Report { days }
}

/// Aggregate merged records and assemble the final report
pub fn build_report(records: &[UsageRecord], pricing: &PricingTable) -> Report {
    assemble(Aggregator::aggregate(records, pricing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pricing::PricingRule;
    use crate::types::{ModelBucket, UsageSource};
    use std::collections::{BTreeMap, HashMap};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn bucket(d: u32, requests: u64) -> (NaiveDate, DateBucket) {
        let mut models = BTreeMap::new();
        if requests > 0 {
            models.insert(
                "m".to_string(),
                ModelBucket {
                    requests,
                    ..ModelBucket::default()
                },
            );
        }
        (date(d), DateBucket::from_models(date(d), models))
    }

    #[test]
    fn test_assemble_sorts_ascending() {
        // HashMap iteration order is arbitrary
        let buckets: HashMap<NaiveDate, DateBucket> =
            [bucket(20, 1), bucket(3, 2), bucket(11, 3)].into_iter().collect();

        let report = assemble(buckets);

        let dates: Vec<NaiveDate> = report.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(3), date(11), date(20)]);
    }

    #[test]
    fn test_assemble_drops_empty_dates() {
        let report = assemble(vec![bucket(1, 0), bucket(2, 5), bucket(3, 0)]);

        assert_eq!(report.days.len(), 1);
        assert_eq!(report.days[0].date, date(2));
    }

    #[test]
    fn test_assemble_empty() {
        assert!(assemble(Vec::new()).is_empty());
    }

    #[test]
    fn test_build_report_excludes_dates_without_records() {
        let pricing = PricingTable::new(PricingRule::new(1.0, 7.5));
        let records = vec![
            UsageRecord::new("2024-01-01T00:00:00Z", Some("a"), 1, 1, None, UsageSource::Remote),
            UsageRecord::new("2024-01-05T00:00:00Z", Some("a"), 1, 1, None, UsageSource::Remote),
            UsageRecord::new("", Some("a"), 1, 1, None, UsageSource::Remote),
        ];

        let report = build_report(&records, &pricing);

        let dates: Vec<NaiveDate> = report.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(1), date(5)]);
    }
}
