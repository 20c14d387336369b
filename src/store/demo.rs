//! Sample records served when `DATA_SOURCE=memory`.
//!
//! Ids are fixed so links into the demo data stay valid across restarts.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::analysis::AiAnalysis;
use crate::models::call::Call;
use crate::models::organization::{BinotelAccount, Organization};
use crate::models::transcript::{Transcript, TranscriptSegment};
use crate::store::memory::Dataset;

pub const ORG_KYIV: Uuid = Uuid::from_u128(0x0e7a_0000_0000_4000_8000_0000_0000_0001);
pub const ORG_LVIV: Uuid = Uuid::from_u128(0x0e7a_0000_0000_4000_8000_0000_0000_0002);

pub const ACCOUNT_KYIV_MAIN: Uuid = Uuid::from_u128(0xb170_0000_0000_4000_8000_0000_0000_0001);
pub const ACCOUNT_KYIV_SALES: Uuid = Uuid::from_u128(0xb170_0000_0000_4000_8000_0000_0000_0002);
pub const ACCOUNT_LVIV_MAIN: Uuid = Uuid::from_u128(0xb170_0000_0000_4000_8000_0000_0000_0003);

/// Id of the n-th demo call.
pub fn call_id(n: u128) -> Uuid {
    Uuid::from_u128(0xca11_0000_0000_4000_8000_0000_0000_0000 + n)
}

fn derived_id(prefix: u128, n: u128) -> Uuid {
    Uuid::from_u128((prefix << 112) + 0x0000_0000_0000_4000_8000_0000_0000_0000 + n)
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

struct CallSeed {
    n: u128,
    org: Uuid,
    account: Option<Uuid>,
    direction: &'static str,
    status: &'static str,
    caller: &'static str,
    callee: &'static str,
    manager: Option<&'static str>,
    duration: i32,
    wait: i32,
    minutes_after_base: i64,
    notes: Option<&'static str>,
    tags: &'static [&'static str],
}

struct AnalysisSeed {
    call: u128,
    sentiment: &'static str,
    score: f64,
    quality: Option<f64>,
    summary: &'static str,
    topics: &'static [&'static str],
    recommendations: Option<&'static str>,
    lines: &'static [(&'static str, &'static str)],
}

const CALLS: &[CallSeed] = &[
    CallSeed { n: 1, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_MAIN), direction: "incoming", status: "answered", caller: "+380501112233", callee: "+380443334455", manager: Some("Olena Kovalenko"), duration: 184, wait: 7, minutes_after_base: 15, notes: None, tags: &[] },
    CallSeed { n: 2, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_MAIN), direction: "incoming", status: "missed", caller: "+380672223344", callee: "+380443334455", manager: None, duration: 0, wait: 42, minutes_after_base: 47, notes: None, tags: &[] },
    CallSeed { n: 3, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_SALES), direction: "outgoing", status: "answered", caller: "+380443334466", callee: "+380931234567", manager: Some("Taras Shevchuk"), duration: 312, wait: 4, minutes_after_base: 95, notes: Some("Offered annual plan, client will decide by Friday"), tags: &["sales", "follow-up"] },
    CallSeed { n: 4, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_MAIN), direction: "incoming", status: "answered", caller: "+380509998877", callee: "+380443334455", manager: Some("Olena Kovalenko"), duration: 427, wait: 12, minutes_after_base: 180, notes: Some("Escalated to Olena's supervisor"), tags: &["complaint"] },
    CallSeed { n: 5, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_SALES), direction: "outgoing", status: "busy", caller: "+380443334466", callee: "+380977654321", manager: Some("Taras Shevchuk"), duration: 0, wait: 9, minutes_after_base: 260, notes: None, tags: &[] },
    CallSeed { n: 6, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_MAIN), direction: "incoming", status: "answered", caller: "+380635556677", callee: "+380443334455", manager: Some("Iryna Melnyk"), duration: 95, wait: 3, minutes_after_base: 1455, notes: None, tags: &[] },
    CallSeed { n: 7, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_MAIN), direction: "incoming", status: "failed", caller: "+380681112200", callee: "+380443334455", manager: None, duration: 0, wait: 0, minutes_after_base: 1510, notes: None, tags: &[] },
    CallSeed { n: 8, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_SALES), direction: "outgoing", status: "answered", caller: "+380443334466", callee: "+380501112233", manager: Some("Olena Kovalenko"), duration: 158, wait: 6, minutes_after_base: 1600, notes: None, tags: &["callback"] },
    CallSeed { n: 9, org: ORG_LVIV, account: Some(ACCOUNT_LVIV_MAIN), direction: "incoming", status: "answered", caller: "+380662224466", callee: "+380322001122", manager: Some("Andriy Bondar"), duration: 233, wait: 18, minutes_after_base: 1700, notes: None, tags: &[] },
    CallSeed { n: 10, org: ORG_LVIV, account: Some(ACCOUNT_LVIV_MAIN), direction: "incoming", status: "missed", caller: "+380731239876", callee: "+380322001122", manager: Some("Andriy Bondar"), duration: 0, wait: 35, minutes_after_base: 2890, notes: None, tags: &[] },
    CallSeed { n: 11, org: ORG_LVIV, account: None, direction: "outgoing", status: "answered", caller: "+380322001133", callee: "+380954443322", manager: Some("Andriy Bondar"), duration: 61, wait: 2, minutes_after_base: 2950, notes: None, tags: &[] },
    CallSeed { n: 12, org: ORG_KYIV, account: Some(ACCOUNT_KYIV_MAIN), direction: "incoming", status: "answered", caller: "+380507770011", callee: "+380443334455", manager: Some("Iryna Melnyk"), duration: 540, wait: 25, minutes_after_base: 3000, notes: None, tags: &[] },
];

const ANALYSES: &[AnalysisSeed] = &[
    AnalysisSeed {
        call: 1,
        sentiment: "positive",
        score: 0.72,
        quality: Some(88.0),
        summary: "Client confirmed the order and asked about delivery dates.",
        topics: &["order", "delivery"],
        recommendations: None,
        lines: &[
            ("manager", "Good morning, this is Olena, how can I help?"),
            ("client", "Hi, I want to confirm my order and check when it ships."),
            ("manager", "It ships tomorrow, delivery takes two days."),
        ],
    },
    AnalysisSeed {
        call: 3,
        sentiment: "neutral",
        score: 0.1,
        quality: Some(74.0),
        summary: "Sales pitch for the annual plan; client undecided.",
        topics: &["pricing", "annual plan"],
        recommendations: Some("Send the pricing comparison before the follow-up call."),
        lines: &[
            ("manager", "Hello, I'm calling about our annual plan offer."),
            ("client", "I need to think about it, send me the details."),
        ],
    },
    AnalysisSeed {
        call: 4,
        sentiment: "negative",
        score: -0.65,
        quality: Some(52.0),
        summary: "Complaint about a late delivery; client asked for a refund.",
        topics: &["complaint", "refund", "delivery"],
        recommendations: Some("Apologize earlier and offer compensation options."),
        lines: &[
            ("client", "My parcel is a week late and nobody answers emails."),
            ("manager", "I'm sorry, let me check what happened."),
            ("client", "I want a refund."),
        ],
    },
    AnalysisSeed {
        call: 6,
        sentiment: "positive",
        score: 0.55,
        quality: None,
        summary: "Quick question about opening hours.",
        topics: &["opening hours"],
        recommendations: None,
        lines: &[
            ("client", "Are you open on Saturday?"),
            ("manager", "Yes, from ten to four."),
        ],
    },
    AnalysisSeed {
        call: 9,
        sentiment: "neutral",
        score: 0.0,
        quality: Some(70.0),
        summary: "Client asked to update the billing address.",
        topics: &["billing"],
        recommendations: None,
        lines: &[
            ("client", "I moved, please update my billing address."),
            ("manager", "Done, you'll get a confirmation email."),
        ],
    },
    AnalysisSeed {
        call: 12,
        sentiment: "negative",
        score: -0.3,
        quality: Some(61.0),
        summary: "Long troubleshooting session, issue not resolved.",
        topics: &["support", "technical issue"],
        recommendations: Some("Escalate unresolved technical issues after ten minutes."),
        lines: &[
            ("client", "The app keeps logging me out."),
            ("manager", "Let's try reinstalling it."),
            ("client", "Still the same."),
        ],
    },
];

/// Build the demo dataset.
pub fn dataset() -> Dataset {
    let base = base_time();

    let organizations = vec![
        Organization {
            id: ORG_KYIV,
            name: "Kyiv Contact Center".to_string(),
            slug: "kyiv".to_string(),
            created_at: base - Duration::days(90),
        },
        Organization {
            id: ORG_LVIV,
            name: "Lviv Support".to_string(),
            slug: "lviv".to_string(),
            created_at: base - Duration::days(60),
        },
    ];

    let binotel_accounts = vec![
        BinotelAccount {
            id: ACCOUNT_KYIV_MAIN,
            organization_id: ORG_KYIV,
            name: "Main line".to_string(),
            api_key: "demo-kyiv-main-7f3a9c1e".to_string(),
            phone_number: Some("+380443334455".to_string()),
            is_active: true,
            created_at: base - Duration::days(89),
        },
        BinotelAccount {
            id: ACCOUNT_KYIV_SALES,
            organization_id: ORG_KYIV,
            name: "Sales".to_string(),
            api_key: "demo-kyiv-sales-2b8d4e60".to_string(),
            phone_number: Some("+380443334466".to_string()),
            is_active: true,
            created_at: base - Duration::days(45),
        },
        BinotelAccount {
            id: ACCOUNT_LVIV_MAIN,
            organization_id: ORG_LVIV,
            name: "Main line".to_string(),
            api_key: "demo-lviv-main-91c0aa37".to_string(),
            phone_number: Some("+380322001122".to_string()),
            is_active: false,
            created_at: base - Duration::days(59),
        },
    ];

    let calls: Vec<Call> = CALLS
        .iter()
        .map(|seed| {
            let started_at = base + Duration::minutes(seed.minutes_after_base);
            let ended_at = started_at + Duration::seconds(i64::from(seed.duration + seed.wait));
            Call {
                id: call_id(seed.n),
                organization_id: seed.org,
                binotel_account_id: seed.account,
                external_id: Some(format!("{}", 48_123_300 + seed.n)),
                direction: seed.direction.to_string(),
                status: seed.status.to_string(),
                caller_number: seed.caller.to_string(),
                callee_number: seed.callee.to_string(),
                manager_name: seed.manager.map(str::to_string),
                duration_seconds: seed.duration,
                wait_seconds: seed.wait,
                started_at,
                recording_path: (seed.status == "answered").then(|| {
                    format!("{}/{}.mp3", started_at.format("%Y/%m/%d"), 48_123_300 + seed.n)
                }),
                notes: seed.notes.map(str::to_string),
                tags: seed.tags.iter().map(|t| t.to_string()).collect(),
                created_at: ended_at,
                updated_at: ended_at,
            }
        })
        .collect();

    let mut transcripts = Vec::new();
    let mut analyses = Vec::new();

    for seed in ANALYSES {
        let Some(call) = calls.iter().find(|c| c.id == call_id(seed.call)) else {
            continue;
        };
        let processed_at = call.updated_at + Duration::minutes(2);

        let mut offset = 0.0;
        let segments: Vec<TranscriptSegment> = seed
            .lines
            .iter()
            .map(|(speaker, text)| {
                let length = 0.4 * text.split_whitespace().count() as f64;
                let segment = TranscriptSegment {
                    speaker: speaker.to_string(),
                    start: offset,
                    end: offset + length,
                    text: text.to_string(),
                };
                offset += length + 0.5;
                segment
            })
            .collect();

        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        transcripts.push(Transcript {
            id: derived_id(0x7a5c, seed.call),
            call_id: call.id,
            language: Some("uk".to_string()),
            text,
            segments: Json(segments),
            created_at: processed_at,
        });

        analyses.push(AiAnalysis {
            id: derived_id(0xa1a1, seed.call),
            call_id: call.id,
            sentiment: seed.sentiment.to_string(),
            sentiment_score: seed.score,
            summary: seed.summary.to_string(),
            quality_score: seed.quality,
            topics: seed.topics.iter().map(|t| t.to_string()).collect(),
            recommendations: seed.recommendations.map(str::to_string),
            model: Some("demo-analyzer".to_string()),
            created_at: processed_at + Duration::seconds(30),
        });
    }

    Dataset {
        organizations,
        binotel_accounts,
        calls,
        transcripts,
        analyses,
    }
}
