// leaderboard.rs - Ranked score board with daily buckets, kept in memory and
// optionally mirrored to a JSON file.
//
// A single async mutex covers read-modify-persist of a submission, so two
// concurrent submits can never lose each other's entry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error_handling::{Result, ServerError};

pub const MAX_NAME_CHARS: usize = 20;
pub const TOP_N: usize = 10;
/// Number of most recent daily buckets kept on every write
pub const DAILY_RETENTION: usize = 7;
pub const DEFAULT_NAME: &str = "Anonymous";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub words_collected: i64,
    /// Completion time in seconds
    pub time: i64,
    pub timestamp: NaiveDateTime,
}

/// Body of a score submission; every field is optional on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScoreSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub words_collected: i64,
    #[serde(default)]
    pub time: i64,
}

impl ScoreSubmission {
    pub fn into_entry(self, timestamp: NaiveDateTime) -> LeaderboardEntry {
        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        LeaderboardEntry {
            name: name.chars().take(MAX_NAME_CHARS).collect(),
            words_collected: self.words_collected,
            time: self.time,
            timestamp,
        }
    }
}

/// Persisted shape: every entry ever, plus per-day buckets keyed `YYYY-MM-DD`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardData {
    #[serde(default)]
    pub all_time: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub daily: BTreeMap<String, Vec<LeaderboardEntry>>,
}

impl LeaderboardData {
    /// Record under the entry's own date
    pub fn record(&mut self, entry: LeaderboardEntry) {
        let day = entry.timestamp.date();
        self.record_on(day, entry);
    }

    pub fn record_on(&mut self, day: NaiveDate, entry: LeaderboardEntry) {
        self.all_time.push(entry.clone());
        self.daily.entry(day_key(day)).or_default().push(entry);
        self.prune_daily();
    }

    /// Drop all but the most recent daily buckets. Keys sort chronologically.
    pub fn prune_daily(&mut self) {
        while self.daily.len() > DAILY_RETENTION {
            self.daily.pop_first();
        }
    }

    pub fn standings(&self, today: NaiveDate) -> Standings {
        let daily = self
            .daily
            .get(&day_key(today))
            .map(|entries| rank(entries))
            .unwrap_or_default();
        Standings {
            daily,
            all_time: rank(&self.all_time),
        }
    }
}

fn day_key(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Top entries by words collected (desc), then time (asc); ties keep insertion order
pub fn rank(entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| {
        b.words_collected
            .cmp(&a.words_collected)
            .then(a.time.cmp(&b.time))
    });
    ranked.truncate(TOP_N);
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standings {
    pub daily: Vec<LeaderboardEntry>,
    pub all_time: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    File(PathBuf),
    Memory,
}

pub struct Leaderboard {
    storage: Storage,
    data: Mutex<LeaderboardData>,
}

impl Leaderboard {
    /// Load existing scores. A missing file starts empty; so does a corrupt
    /// one, after a warning, and it is overwritten on the next submit.
    pub async fn open(storage: Storage) -> Result<Self> {
        let data = match &storage {
            Storage::Memory => LeaderboardData::default(),
            Storage::File(path) => load_file(path).await?,
        };
        log::info!(
            "Leaderboard ready ({:?}): {} all-time entries, {} daily buckets",
            storage,
            data.all_time.len(),
            data.daily.len()
        );
        Ok(Self {
            storage,
            data: Mutex::new(data),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            storage: Storage::Memory,
            data: Mutex::new(LeaderboardData::default()),
        }
    }

    pub async fn submit(&self, submission: ScoreSubmission) -> Result<LeaderboardEntry> {
        self.submit_at(submission, Local::now().naive_local()).await
    }

    pub async fn submit_at(
        &self,
        submission: ScoreSubmission,
        now: NaiveDateTime,
    ) -> Result<LeaderboardEntry> {
        let entry = submission.into_entry(now);
        let mut data = self.data.lock().await;

        let mut next = data.clone();
        next.record(entry.clone());
        self.persist(&next).await?;
        *data = next;

        log::info!(
            "Recorded score for '{}': {} words in {}s",
            entry.name,
            entry.words_collected,
            entry.time
        );
        Ok(entry)
    }

    pub async fn standings(&self) -> Standings {
        self.standings_on(Local::now().date_naive()).await
    }

    pub async fn standings_on(&self, today: NaiveDate) -> Standings {
        self.data.lock().await.standings(today)
    }

    /// Swap in a whole new data set (used for seeding)
    pub async fn replace(&self, mut replacement: LeaderboardData) -> Result<()> {
        replacement.prune_daily();
        let mut data = self.data.lock().await;
        self.persist(&replacement).await?;
        *data = replacement;
        Ok(())
    }

    pub async fn snapshot(&self) -> LeaderboardData {
        self.data.lock().await.clone()
    }

    async fn persist(&self, data: &LeaderboardData) -> Result<()> {
        match &self.storage {
            Storage::Memory => Ok(()),
            Storage::File(path) => write_file(path, data).await,
        }
    }
}

async fn load_file(path: &Path) -> Result<LeaderboardData> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No leaderboard at {}, starting empty", path.display());
            return Ok(LeaderboardData::default());
        }
        Err(e) => return Err(ServerError::io(path, e)),
    };

    match serde_json::from_str(&raw) {
        Ok(data) => Ok(data),
        Err(e) => {
            log::warn!("Unreadable leaderboard {}: {}; starting empty", path.display(), e);
            Ok(LeaderboardData::default())
        }
    }
}

/// Write to a sibling temp file, then rename over the target
async fn write_file(path: &Path, data: &LeaderboardData) -> Result<()> {
    let json = serde_json::to_vec_pretty(data)?;
    let tmp = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));

    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| ServerError::io(&tmp, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ServerError::io(path, e));
    }
    log::debug!("Wrote leaderboard ({} bytes) to {}", json.len(), path.display());
    Ok(())
}

/// Demo standings: (name, words collected, seconds)
pub const DEMO_SCORES: [(&str, i64, i64); 10] = [
    ("Prisad vare Admin!", 79, 7 * 60 + 57),
    ("rraaaaaaahghghhhh", 66, 6 * 60 + 44),
    ("Preaching is hard", 30, 2 * 60 + 38),
    ("Andréas", 25, 3 * 60 + 22),
    ("Stärkt till medveten", 17, 60 + 45),
    ("Gil", 14, 60 + 42),
    ("Gil", 4, 40),
    ("Drake", 3, 53),
    ("Predikoutkastaren", 3, 60 + 1),
    ("Stärkt", 2, 48),
];

/// Demo scores spread over today and the two days before
pub fn demo_data(now: NaiveDateTime) -> LeaderboardData {
    let mut data = LeaderboardData::default();
    for (i, (name, words, time)) in DEMO_SCORES.iter().enumerate() {
        let days_back = chrono::Duration::days((i % 3) as i64);
        let day = now.date() - days_back;
        let timestamp = now - days_back - chrono::Duration::hours(i as i64);
        data.record_on(
            day,
            LeaderboardEntry {
                name: name.to_string(),
                words_collected: *words,
                time: *time,
                timestamp,
            },
        );
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(date: &str, hms: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {hms}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap()
    }

    fn entry(name: &str, words: i64, time: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.into(),
            words_collected: words,
            time,
            timestamp: at("2025-03-01", "12:00:00"),
        }
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("leaderboard-test-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_rank_orders_by_words_then_time() {
        let ranked = rank(&[
            entry("slow", 10, 90),
            entry("few", 3, 10),
            entry("fast", 10, 30),
            entry("most", 12, 200),
        ]);
        let names: Vec<_> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["most", "fast", "slow", "few"]);
    }

    #[test]
    fn test_rank_keeps_top_ten() {
        let entries: Vec<_> = (0..25).map(|i| entry(&format!("p{i}"), i, 100)).collect();
        let ranked = rank(&entries);
        assert_eq!(ranked.len(), TOP_N);
        assert_eq!(ranked[0].words_collected, 24);
        assert_eq!(ranked[9].words_collected, 15);
    }

    #[test]
    fn test_submission_defaults_and_truncation() {
        let now = at("2025-03-01", "08:30:00");
        let anon = ScoreSubmission::default().into_entry(now);
        assert_eq!(anon.name, DEFAULT_NAME);
        assert_eq!(anon.words_collected, 0);
        assert_eq!(anon.time, 0);

        let long = ScoreSubmission {
            name: Some("Stärkt till medveten och mer därtill".into()),
            words_collected: 5,
            time: 61,
        }
        .into_entry(now);
        assert_eq!(long.name.chars().count(), MAX_NAME_CHARS);
        assert_eq!(long.name, "Stärkt till medveten");
    }

    #[test]
    fn test_submission_json_fields_are_optional() {
        let sub: ScoreSubmission = serde_json::from_str(r#"{"words_collected": 4}"#).unwrap();
        assert_eq!(sub.name, None);
        assert_eq!(sub.words_collected, 4);
        assert_eq!(sub.time, 0);
    }

    #[test]
    fn test_daily_retention_keeps_latest_seven() {
        let mut data = LeaderboardData::default();
        for d in 1..=10 {
            let mut e = entry("p", d, 10);
            e.timestamp = at(&format!("2025-03-{d:02}"), "10:00:00");
            data.record(e);
        }
        assert_eq!(data.all_time.len(), 10);
        assert_eq!(data.daily.len(), DAILY_RETENTION);
        assert_eq!(data.daily.keys().next().map(String::as_str), Some("2025-03-04"));
        assert_eq!(data.daily.keys().last().map(String::as_str), Some("2025-03-10"));
    }

    #[test]
    fn test_standings_split_daily_and_all_time() {
        let mut data = LeaderboardData::default();
        let mut yesterday = entry("yesterday", 50, 10);
        yesterday.timestamp = at("2025-03-01", "23:59:00");
        let mut today = entry("today", 5, 10);
        today.timestamp = at("2025-03-02", "00:01:00");
        data.record(yesterday);
        data.record(today);

        let standings = data.standings(day("2025-03-02"));
        assert_eq!(standings.daily.len(), 1);
        assert_eq!(standings.daily[0].name, "today");
        assert_eq!(standings.all_time[0].name, "yesterday");

        assert!(data.standings(day("2025-04-01")).daily.is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_submit_and_query() {
        let board = Leaderboard::in_memory();
        let now = at("2025-05-05", "09:00:00");
        for (name, words, time) in [("a", 3, 50), ("b", 7, 80), ("c", 7, 40)] {
            let sub = ScoreSubmission {
                name: Some(name.into()),
                words_collected: words,
                time,
            };
            board.submit_at(sub, now).await.unwrap();
        }
        let standings = board.standings_on(now.date()).await;
        let names: Vec<_> = standings.daily.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
        assert_eq!(standings.all_time, standings.daily);
    }

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let path = temp_path();
        let now = at("2025-06-01", "18:00:00");
        {
            let board = Leaderboard::open(Storage::File(path.clone())).await.unwrap();
            let sub = ScoreSubmission {
                name: Some("Gil".into()),
                words_collected: 14,
                time: 102,
            };
            board.submit_at(sub, now).await.unwrap();
        }

        let reopened = Leaderboard::open(Storage::File(path.clone())).await.unwrap();
        let standings = reopened.standings_on(now.date()).await;
        assert_eq!(standings.all_time.len(), 1);
        assert_eq!(standings.daily[0].name, "Gil");
        assert_eq!(standings.daily[0].timestamp, now);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"2025-06-01\""));
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_files_start_empty() {
        let path = temp_path();
        let board = Leaderboard::open(Storage::File(path.clone())).await.unwrap();
        assert_eq!(board.snapshot().await, LeaderboardData::default());

        std::fs::write(&path, "{ not json").unwrap();
        let board = Leaderboard::open(Storage::File(path.clone())).await.unwrap();
        assert_eq!(board.snapshot().await, LeaderboardData::default());
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_submissions_are_all_kept() {
        let board = std::sync::Arc::new(Leaderboard::in_memory());
        let mut handles = Vec::new();
        for i in 0..32 {
            let board = board.clone();
            handles.push(tokio::spawn(async move {
                let sub = ScoreSubmission {
                    name: Some(format!("p{i}")),
                    words_collected: i,
                    time: 10,
                };
                board.submit(sub).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(board.snapshot().await.all_time.len(), 32);
    }

    #[test]
    fn test_demo_data_spread_over_three_days() {
        let now = at("2025-07-10", "20:00:00");
        let data = demo_data(now);
        assert_eq!(data.all_time.len(), DEMO_SCORES.len());
        assert_eq!(data.daily.len(), 3);
        assert_eq!(data.daily["2025-07-10"].len(), 4);
        assert_eq!(data.daily["2025-07-09"].len(), 3);
        assert_eq!(data.daily["2025-07-08"].len(), 3);
        assert_eq!(rank(&data.all_time)[0].name, "Prisad vare Admin!");
    }

    proptest! {
        #[test]
        fn prop_rank_is_sorted_prefix(scores in prop::collection::vec((0i64..100, 0i64..600), 0..40)) {
            let entries: Vec<_> = scores
                .iter()
                .enumerate()
                .map(|(i, (w, t))| entry(&format!("p{i}"), *w, *t))
                .collect();
            let ranked = rank(&entries);

            prop_assert_eq!(ranked.len(), entries.len().min(TOP_N));
            for pair in ranked.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(
                    a.words_collected > b.words_collected
                        || (a.words_collected == b.words_collected && a.time <= b.time)
                );
            }
            if let Some(last) = ranked.last() {
                let better_left_out = entries
                    .iter()
                    .filter(|e| !ranked.contains(e))
                    .any(|e| (e.words_collected, -e.time) > (last.words_collected, -last.time));
                prop_assert!(!better_left_out);
            }
        }
    }
}
