use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Gameplay and catalogue counters, shared across handlers.
#[derive(Clone)]
pub struct Metrics {
    pub questions_created: Arc<AtomicU64>,
    pub questions_deleted: Arc<AtomicU64>,
    pub duplicates_rejected: Arc<AtomicU64>,
    pub searches: Arc<AtomicU64>,
    pub quiz_questions_served: Arc<AtomicU64>,
    pub quizzes_exhausted: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            questions_created: Arc::new(AtomicU64::new(0)),
            questions_deleted: Arc::new(AtomicU64::new(0)),
            duplicates_rejected: Arc::new(AtomicU64::new(0)),
            searches: Arc::new(AtomicU64::new(0)),
            quiz_questions_served: Arc::new(AtomicU64::new(0)),
            quizzes_exhausted: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_questions_created(&self) {
        self.questions_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_questions_deleted(&self) {
        self.questions_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_duplicates_rejected(&self) {
        self.duplicates_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_searches(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_quiz_questions_served(&self) {
        self.quiz_questions_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_quizzes_exhausted(&self) {
        self.quizzes_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            questions_created: self.questions_created.load(Ordering::Relaxed),
            questions_deleted: self.questions_deleted.load(Ordering::Relaxed),
            duplicates_rejected: self.duplicates_rejected.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            quiz_questions_served: self.quiz_questions_served.load(Ordering::Relaxed),
            quizzes_exhausted: self.quizzes_exhausted.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub questions_created: u64,
    pub questions_deleted: u64,
    pub duplicates_rejected: u64,
    pub searches: u64,
    pub quiz_questions_served: u64,
    pub quizzes_exhausted: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Prometheus text exposition format (version 0.0.4).
    pub fn to_prometheus(&self) -> String {
        let counters: [(&str, &str, u64); 6] = [
            ("trivia_questions_created", "Questions added", self.questions_created),
            ("trivia_questions_deleted", "Questions deleted", self.questions_deleted),
            ("trivia_duplicates_rejected", "Duplicate questions rejected", self.duplicates_rejected),
            ("trivia_searches", "Question searches", self.searches),
            ("trivia_quiz_questions_served", "Quiz questions served", self.quiz_questions_served),
            ("trivia_quizzes_exhausted", "Quiz requests with no unseen question left", self.quizzes_exhausted),
        ];
        let mut out = String::new();
        for (name, help, value) in counters {
            out.push_str(&format!("# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n"));
        }
        out.push_str(&format!(
            "# HELP trivia_uptime_seconds Uptime seconds\n# TYPE trivia_uptime_seconds gauge\ntrivia_uptime_seconds {}\n",
            self.uptime_seconds
        ));
        out
    }
}
