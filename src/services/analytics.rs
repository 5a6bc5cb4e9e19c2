// SPDX-License-Identifier: MIT

//! Derived activity analytics.
//!
//! Pure functions over fetched record sets: 24h activity counters,
//! weekday/hour punch-cards, and the cumulative 7-day follow timeline.
//! `now` is injected by the caller so the math stays deterministic
//! under test. All bucketing is on the UTC wall clock.
//!
//! Records with malformed or missing `createdAt` are excluded from
//! every bucket; they never abort a computation.

use std::collections::HashMap;
use std::collections::VecDeque;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc};

use crate::models::{ActivityCounts, FollowPeriodPoint, PunchCardEntry, Record};

/// Weekday names, Sun-first, matching `num_days_from_sunday`.
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Length of one follow-timeline period.
const PERIOD_HOURS: i64 = 12;

/// Days of history covered by the follow timeline.
const TIMELINE_WINDOW_DAYS: i64 = 7;

/// Count records created yesterday (previous calendar day) and today
/// (current calendar day so far).
///
/// "Yesterday" is the half-open interval `[yesterday0, today0)`;
/// "today" is `[today0, ∞)`, so a record created exactly at midnight
/// counts toward today.
pub fn count_activity(records: &[Record], now: DateTime<Utc>) -> ActivityCounts {
    let today0 = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let yesterday0 = today0 - Duration::days(1);

    let mut counts = ActivityCounts::default();
    for record in records {
        let Some(created) = record.created_at() else {
            continue;
        };
        if created >= today0 {
            counts.today += 1;
        } else if created >= yesterday0 {
            counts.yesterday += 1;
        }
    }
    counts
}

/// Bucket records by (weekday, hour-of-day), emitting only non-empty
/// buckets. Emission order is unspecified; consumers treat the result
/// as a set.
pub fn build_punch_card(records: &[Record]) -> Vec<PunchCardEntry> {
    let mut counts: HashMap<(usize, u32), u32> = HashMap::new();

    for record in records {
        let Some(created) = record.created_at() else {
            continue;
        };
        let weekday = created.weekday().num_days_from_sunday() as usize;
        let hour = created.hour();
        *counts.entry((weekday, hour)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((weekday, hour), count)| PunchCardEntry {
            weekday: WEEKDAYS[weekday],
            hour,
            count,
        })
        .collect()
}

/// Reconstruct the cumulative follow count at 12-hour period boundaries
/// over the trailing 7 days, plus a live "now" point.
///
/// `records` is the full follow collection in API return order
/// (newest-first). The walk re-evaluates the boundary condition per
/// record, not per period: each record older than the current boundary
/// inserts one point and steps the boundary back 12 hours. Periods
/// nobody crossed produce no point. This matches the shipped frontend
/// contract exactly, so keep the stepping rule as is.
pub fn build_follow_timeline(records: &[Record], now: DateTime<Utc>) -> Vec<FollowPeriodPoint> {
    let follows_total = records.len() as u64;

    // Seed with the live point; everything else is prepended before it.
    let mut points: VecDeque<FollowPeriodPoint> = VecDeque::new();
    points.push_back(FollowPeriodPoint {
        timestamp: now,
        count: follows_total,
    });

    // Snap down to the start of the current 12h period.
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let mut period_start = if now.hour() >= 12 {
        midnight + Duration::hours(PERIOD_HOURS)
    } else {
        midnight
    };
    let window_start = period_start - Duration::days(TIMELINE_WINDOW_DAYS);

    // Oldest-first, so index i means "the (i+1)-th oldest follow".
    let oldest_first: Vec<&Record> = records.iter().rev().collect();

    // Walk newest to oldest. Records outside the window are skipped,
    // never a reason to stop early.
    for i in (0..oldest_first.len()).rev() {
        let Some(created) = oldest_first[i].created_at() else {
            continue;
        };
        if created < window_start {
            continue;
        }
        if created < period_start {
            points.push_front(FollowPeriodPoint {
                timestamp: period_start,
                count: (i as u64) + 1,
            });
            period_start -= Duration::hours(PERIOD_HOURS);
        }
    }

    // Nothing happened in the last 7 days: draw a flat line.
    if points.len() == 1 {
        points.push_front(FollowPeriodPoint {
            timestamp: period_start,
            count: follows_total,
        });
    }

    points.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::RecordValue;

    fn record(created_at: &str) -> Record {
        Record {
            uri: "at://did:plc:test/app.bsky.graph.follow/1".to_string(),
            cid: "bafytest".to_string(),
            value: RecordValue {
                created_at: Some(created_at.to_string()),
                ..Default::default()
            },
        }
    }

    fn malformed_record() -> Record {
        record("definitely-not-a-timestamp")
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    // now is mid-afternoon so the current period starts at 12:00.
    // 2024-01-15 is a Monday.
    const NOW: &str = "2024-01-15T15:30:00Z";

    // ─── count_activity ──────────────────────────────────────────

    #[test]
    fn test_count_activity_empty() {
        let counts = count_activity(&[], utc(NOW));
        assert_eq!(counts, ActivityCounts::default());
    }

    #[test]
    fn test_count_activity_buckets() {
        let records = vec![
            record("2024-01-15T09:00:00Z"), // today
            record("2024-01-15T00:00:00Z"), // exactly midnight: today
            record("2024-01-14T23:59:59Z"), // yesterday
            record("2024-01-14T00:00:00Z"), // yesterday
            record("2024-01-13T23:59:59Z"), // older, neither
        ];

        let counts = count_activity(&records, utc(NOW));
        assert_eq!(counts.today, 2);
        assert_eq!(counts.yesterday, 2);
    }

    #[test]
    fn test_count_activity_excludes_malformed() {
        let records = vec![record("2024-01-15T09:00:00Z"), malformed_record()];
        let counts = count_activity(&records, utc(NOW));
        assert_eq!(counts.today, 1);
        assert_eq!(counts.yesterday, 0);
    }

    // ─── build_punch_card ────────────────────────────────────────

    #[test]
    fn test_punch_card_buckets_by_weekday_and_hour() {
        let records = vec![
            record("2024-01-15T10:30:00Z"), // Mon 10
            record("2024-01-15T10:05:00Z"), // Mon 10
            record("2024-01-14T23:00:00Z"), // Sun 23
        ];

        let mut entries = build_punch_card(&records);
        entries.sort_by_key(|e| (e.weekday, e.hour));

        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&PunchCardEntry {
            weekday: "Mon",
            hour: 10,
            count: 2
        }));
        assert!(entries.contains(&PunchCardEntry {
            weekday: "Sun",
            hour: 23,
            count: 1
        }));
    }

    #[test]
    fn test_punch_card_sparse_and_conservative() {
        let records = vec![
            record("2024-01-15T10:30:00Z"),
            record("2024-01-12T03:00:00Z"),
            record("2024-01-10T18:00:00Z"),
            malformed_record(),
        ];

        let entries = build_punch_card(&records);
        assert!(entries.iter().all(|e| e.count >= 1));
        // Sum equals the number of parseable records.
        let total: u32 = entries.iter().map(|e| e.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_punch_card_empty() {
        assert!(build_punch_card(&[]).is_empty());
    }

    // ─── build_follow_timeline ───────────────────────────────────

    #[test]
    fn test_follow_timeline_empty_is_two_flat_points() {
        let points = build_follow_timeline(&[], utc(NOW));

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].count, 0);
        assert_eq!(points[1].count, 0);
        assert_eq!(points[1].timestamp, utc(NOW));
        assert_eq!(points[0].timestamp, utc("2024-01-15T12:00:00Z"));
    }

    #[test]
    fn test_follow_timeline_all_follows_older_than_window() {
        let records = vec![
            record("2023-06-01T10:00:00Z"),
            record("2023-05-01T10:00:00Z"),
            record("2023-04-01T10:00:00Z"),
        ];

        let points = build_follow_timeline(&records, utc(NOW));

        // Flat line at the current total.
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].count, 3);
        assert_eq!(points[1].count, 3);
        assert_eq!(points[1].timestamp, utc(NOW));
    }

    #[test]
    fn test_follow_timeline_boundaries() {
        // Newest-first, as the API returns them.
        let records = vec![
            record("2024-01-15T13:00:00Z"), // in the current period, no insert
            record("2024-01-15T01:00:00Z"),
            record("2024-01-14T20:00:00Z"),
        ];

        let points = build_follow_timeline(&records, utc(NOW));

        assert_eq!(
            points,
            vec![
                FollowPeriodPoint {
                    timestamp: utc("2024-01-15T00:00:00Z"),
                    count: 1
                },
                FollowPeriodPoint {
                    timestamp: utc("2024-01-15T12:00:00Z"),
                    count: 2
                },
                FollowPeriodPoint {
                    timestamp: utc(NOW),
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn test_follow_timeline_ten_follows_over_three_days() {
        // 10 follows, newest-first, evenly spaced every 7h12m back
        // from now.
        let now = utc(NOW);
        let records: Vec<Record> = (0..10)
            .map(|k| record(&(now - Duration::minutes(432 * k)).to_rfc3339()))
            .collect();

        let points = build_follow_timeline(&records, now);

        let expected: Vec<(DateTime<Utc>, u64)> = vec![
            (utc("2024-01-13T00:00:00Z"), 1),
            (utc("2024-01-13T12:00:00Z"), 2),
            (utc("2024-01-14T00:00:00Z"), 4),
            (utc("2024-01-14T12:00:00Z"), 6),
            (utc("2024-01-15T00:00:00Z"), 7),
            (utc("2024-01-15T12:00:00Z"), 9),
            (now, 10),
        ];
        let got: Vec<(DateTime<Utc>, u64)> =
            points.iter().map(|p| (p.timestamp, p.count)).collect();
        assert_eq!(got, expected);

        // Ascending in both dimensions.
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(points.windows(2).all(|w| w[0].count <= w[1].count));
    }

    #[test]
    fn test_follow_timeline_old_record_inserts_at_current_boundary() {
        // One record in the current period and one five days old. The
        // per-record walk pins the old record to the newest un-stepped
        // boundary rather than its own period.
        let records = vec![
            record("2024-01-15T13:00:00Z"),
            record("2024-01-10T08:00:00Z"),
        ];

        let points = build_follow_timeline(&records, utc(NOW));

        assert_eq!(
            points,
            vec![
                FollowPeriodPoint {
                    timestamp: utc("2024-01-15T12:00:00Z"),
                    count: 1
                },
                FollowPeriodPoint {
                    timestamp: utc(NOW),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_follow_timeline_morning_snaps_to_midnight() {
        let now = utc("2024-01-15T09:45:12Z");
        let points = build_follow_timeline(&[], now);

        assert_eq!(points[0].timestamp, utc("2024-01-15T00:00:00Z"));
        assert_eq!(points[1].timestamp, now);
    }

    #[test]
    fn test_follow_timeline_malformed_records_are_skipped() {
        let records = vec![
            record("2024-01-15T01:00:00Z"),
            malformed_record(),
            record("2024-01-14T20:00:00Z"),
        ];

        let points = build_follow_timeline(&records, utc(NOW));

        // Counts still reflect list positions (the total includes the
        // malformed record, matching the frontend contract).
        assert_eq!(points.last().unwrap().count, 3);
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }
}
