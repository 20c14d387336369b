//! Call statistics.
//!
//! Aggregation runs in memory over calls (and their analyses) already fetched
//! from the store. It is pure: the same input always yields the same report.
//!
//! # Conventions
//!
//! - A call is "missed" when its status is `missed` or `busy`
//! - Average talk time only considers answered calls
//! - Average wait time considers every call
//! - Sentiment and quality averages only consider calls that have them

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::analysis::{AiAnalysis, Sentiment};
use crate::models::call::{Call, CallDirection, CallStatus};

/// Aggregated statistics returned by `GET /api/calls/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStats {
    #[serde(flatten)]
    pub totals: CallTotals,
    pub sentiment: SentimentBreakdown,
    pub managers: Vec<ManagerStats>,
    pub daily: Vec<DailyStats>,
}

/// Counters and averages shared by the overall report and each manager row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTotals {
    pub total_calls: u64,
    pub answered_calls: u64,
    pub missed_calls: u64,
    pub failed_calls: u64,
    pub incoming_calls: u64,
    pub outgoing_calls: u64,

    /// answered / total, 0 when there are no calls
    pub answer_rate: f64,
    pub total_duration_seconds: i64,
    pub average_duration_seconds: f64,
    pub average_wait_seconds: f64,
    pub average_sentiment_score: Option<f64>,
    pub average_quality_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentBreakdown {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

/// Statistics for one manager; `manager` is `null` for unassigned calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStats {
    pub manager: Option<String>,
    #[serde(flatten)]
    pub totals: CallTotals,
}

/// Call volume for one UTC day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_calls: u64,
    pub answered_calls: u64,
}

/// Running sums behind `CallTotals`.
#[derive(Default)]
struct Accumulator {
    total: u64,
    answered: u64,
    missed: u64,
    failed: u64,
    incoming: u64,
    outgoing: u64,
    duration: i64,
    answered_duration: i64,
    wait: i64,
    sentiment_sum: f64,
    sentiment_count: u64,
    quality_sum: f64,
    quality_count: u64,
}

impl Accumulator {
    fn add(&mut self, call: &Call, analysis: Option<&AiAnalysis>) {
        self.total += 1;
        self.duration += i64::from(call.duration_seconds);
        self.wait += i64::from(call.wait_seconds);

        match call.call_status() {
            Some(CallStatus::Answered) => {
                self.answered += 1;
                self.answered_duration += i64::from(call.duration_seconds);
            }
            Some(CallStatus::Missed) | Some(CallStatus::Busy) => self.missed += 1,
            Some(CallStatus::Failed) => self.failed += 1,
            None => {}
        }

        if call.direction == CallDirection::Incoming.as_str() {
            self.incoming += 1;
        } else if call.direction == CallDirection::Outgoing.as_str() {
            self.outgoing += 1;
        }

        if let Some(analysis) = analysis {
            self.sentiment_sum += analysis.sentiment_score;
            self.sentiment_count += 1;
            if let Some(quality) = analysis.quality_score {
                self.quality_sum += quality;
                self.quality_count += 1;
            }
        }
    }

    fn totals(&self) -> CallTotals {
        CallTotals {
            total_calls: self.total,
            answered_calls: self.answered,
            missed_calls: self.missed,
            failed_calls: self.failed,
            incoming_calls: self.incoming,
            outgoing_calls: self.outgoing,
            answer_rate: ratio(self.answered as f64, self.total),
            total_duration_seconds: self.duration,
            average_duration_seconds: ratio(self.answered_duration as f64, self.answered),
            average_wait_seconds: ratio(self.wait as f64, self.total),
            average_sentiment_score: average(self.sentiment_sum, self.sentiment_count),
            average_quality_score: average(self.quality_sum, self.quality_count),
        }
    }
}

fn ratio(sum: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn average(sum: f64, count: u64) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Aggregate calls into a report.
///
/// `analyses` may contain analyses of calls not in `calls`; they are ignored.
pub fn aggregate(calls: &[Call], analyses: &[AiAnalysis]) -> CallStats {
    let by_call: HashMap<Uuid, &AiAnalysis> = analyses.iter().map(|a| (a.call_id, a)).collect();

    let mut overall = Accumulator::default();
    let mut sentiment = SentimentBreakdown::default();
    let mut managers: HashMap<Option<&str>, Accumulator> = HashMap::new();
    let mut daily: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for call in calls {
        let analysis = by_call.get(&call.id).copied();

        overall.add(call, analysis);
        managers
            .entry(call.manager_name.as_deref())
            .or_default()
            .add(call, analysis);

        match analysis.and_then(AiAnalysis::sentiment) {
            Some(Sentiment::Positive) => sentiment.positive += 1,
            Some(Sentiment::Neutral) => sentiment.neutral += 1,
            Some(Sentiment::Negative) => sentiment.negative += 1,
            None => {}
        }

        let day = daily.entry(call.started_at.date_naive()).or_default();
        day.0 += 1;
        if call.call_status() == Some(CallStatus::Answered) {
            day.1 += 1;
        }
    }

    let mut managers: Vec<ManagerStats> = managers
        .into_iter()
        .map(|(manager, acc)| ManagerStats {
            manager: manager.map(str::to_string),
            totals: acc.totals(),
        })
        .collect();

    // Busiest first; named managers alphabetically; unassigned last among equals.
    managers.sort_by(|a, b| {
        b.totals
            .total_calls
            .cmp(&a.totals.total_calls)
            .then_with(|| match (&a.manager, &b.manager) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
    });

    let daily = daily
        .into_iter()
        .map(|(date, (total_calls, answered_calls))| DailyStats {
            date,
            total_calls,
            answered_calls,
        })
        .collect();

    CallStats {
        totals: overall.totals(),
        sentiment,
        managers,
        daily,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn call(manager: Option<&str>, status: &str, direction: &str, duration: i32, wait: i32, started_at: DateTime<Utc>) -> Call {
        Call {
            id: Uuid::new_v4(),
            organization_id: Uuid::nil(),
            binotel_account_id: None,
            external_id: None,
            direction: direction.to_string(),
            status: status.to_string(),
            caller_number: "+380500000000".into(),
            callee_number: "+380440000000".into(),
            manager_name: manager.map(str::to_string),
            duration_seconds: duration,
            wait_seconds: wait,
            started_at,
            recording_path: None,
            notes: None,
            tags: vec![],
            created_at: started_at,
            updated_at: started_at,
        }
    }

    fn analysis(call: &Call, sentiment: &str, score: f64, quality: Option<f64>) -> AiAnalysis {
        AiAnalysis {
            id: Uuid::new_v4(),
            call_id: call.id,
            sentiment: sentiment.to_string(),
            sentiment_score: score,
            summary: String::new(),
            quality_score: quality,
            topics: vec![],
            recommendations: None,
            model: None,
            created_at: call.started_at,
        }
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let stats = aggregate(&[], &[]);

        assert_eq!(stats.totals, CallTotals::default());
        assert_eq!(stats.totals.answer_rate, 0.0);
        assert!(stats.totals.average_sentiment_score.is_none());
        assert!(stats.managers.is_empty());
        assert!(stats.daily.is_empty());
    }

    #[test]
    fn computes_overall_totals() {
        let calls = vec![
            call(Some("Olena"), "answered", "incoming", 120, 10, at(1, 9)),
            call(Some("Olena"), "answered", "outgoing", 60, 0, at(1, 10)),
            call(Some("Taras"), "missed", "incoming", 0, 30, at(2, 9)),
            call(None, "busy", "incoming", 0, 5, at(2, 11)),
            call(None, "failed", "outgoing", 0, 15, at(3, 8)),
        ];

        let stats = aggregate(&calls, &[]);
        let totals = &stats.totals;

        assert_eq!(totals.total_calls, 5);
        assert_eq!(totals.answered_calls, 2);
        assert_eq!(totals.missed_calls, 2);
        assert_eq!(totals.failed_calls, 1);
        assert_eq!(totals.incoming_calls, 3);
        assert_eq!(totals.outgoing_calls, 2);
        assert_eq!(totals.answer_rate, 0.4);
        assert_eq!(totals.total_duration_seconds, 180);
        assert_eq!(totals.average_duration_seconds, 90.0);
        assert_eq!(totals.average_wait_seconds, 12.0);
    }

    #[test]
    fn groups_by_manager_busiest_first() {
        let calls = vec![
            call(Some("Taras"), "answered", "incoming", 30, 0, at(1, 9)),
            call(Some("Olena"), "answered", "incoming", 100, 0, at(1, 9)),
            call(Some("Olena"), "missed", "incoming", 0, 20, at(1, 10)),
            call(None, "missed", "incoming", 0, 20, at(1, 11)),
            call(Some("Andriy"), "answered", "incoming", 40, 0, at(1, 12)),
        ];

        let stats = aggregate(&calls, &[]);
        let names: Vec<Option<&str>> = stats.managers.iter().map(|m| m.manager.as_deref()).collect();

        assert_eq!(names, vec![Some("Olena"), Some("Andriy"), Some("Taras"), None]);

        let olena = &stats.managers[0].totals;
        assert_eq!(olena.total_calls, 2);
        assert_eq!(olena.answered_calls, 1);
        assert_eq!(olena.answer_rate, 0.5);
        assert_eq!(olena.average_duration_seconds, 100.0);
    }

    #[test]
    fn averages_sentiment_and_quality_over_analysed_calls() {
        let calls = vec![
            call(Some("Olena"), "answered", "incoming", 60, 0, at(1, 9)),
            call(Some("Olena"), "answered", "incoming", 60, 0, at(1, 10)),
            call(Some("Olena"), "answered", "incoming", 60, 0, at(1, 11)),
        ];
        let analyses = vec![
            analysis(&calls[0], "positive", 0.8, Some(90.0)),
            analysis(&calls[1], "negative", -0.4, None),
        ];

        let stats = aggregate(&calls, &analyses);

        assert_eq!(stats.sentiment, SentimentBreakdown { positive: 1, neutral: 0, negative: 1 });
        let score = stats.totals.average_sentiment_score.unwrap();
        assert!((score - 0.2).abs() < 1e-9);
        assert_eq!(stats.totals.average_quality_score, Some(90.0));
        assert_eq!(stats.managers[0].totals.average_quality_score, Some(90.0));
    }

    #[test]
    fn ignores_analyses_of_unknown_calls() {
        let calls = vec![call(None, "answered", "incoming", 60, 0, at(1, 9))];
        let stranger = call(None, "answered", "incoming", 60, 0, at(1, 9));
        let analyses = vec![analysis(&stranger, "positive", 1.0, Some(100.0))];

        let stats = aggregate(&calls, &analyses);

        assert!(stats.totals.average_sentiment_score.is_none());
        assert_eq!(stats.sentiment, SentimentBreakdown::default());
    }

    #[test]
    fn buckets_calls_per_day_in_order() {
        let calls = vec![
            call(None, "answered", "incoming", 60, 0, at(3, 9)),
            call(None, "missed", "incoming", 0, 0, at(1, 9)),
            call(None, "answered", "incoming", 60, 0, at(1, 23)),
        ];

        let stats = aggregate(&calls, &[]);

        assert_eq!(stats.daily.len(), 2);
        assert_eq!(stats.daily[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(stats.daily[0].total_calls, 2);
        assert_eq!(stats.daily[0].answered_calls, 1);
        assert_eq!(stats.daily[1].date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    }

    #[test]
    fn serializes_flat_camel_case() {
        let calls = vec![call(Some("Olena"), "answered", "incoming", 60, 0, at(1, 9))];
        let json = serde_json::to_value(aggregate(&calls, &[])).unwrap();

        assert_eq!(json["totalCalls"], 1);
        assert_eq!(json["managers"][0]["manager"], "Olena");
        assert_eq!(json["managers"][0]["answeredCalls"], 1);
        assert_eq!(json["daily"][0]["date"], "2025-03-01");
    }
}
