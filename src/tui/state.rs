use crate::engine::Estimate;
use std::collections::VecDeque;
use std::time::Instant;

const MAX_HISTORY: usize = 50;
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone)]
pub struct AppState {
    pub model_label: String,
    pub categorical_columns: usize,
    pub numerical_columns: usize,
    pub start_time: Instant,
    pub submissions: u64,
    pub last_result: Option<ResultView>,
    pub history: VecDeque<PredictionRow>,
    pub logs: VecDeque<LogEntry>,
}

/// What the result panel shows after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Success(String),
    Failure(String),
}

#[derive(Debug, Clone)]
pub struct PredictionRow {
    pub time: String,
    pub summary: String,
    pub price: String,
    pub backfilled: usize,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

impl AppState {
    pub fn new(model_label: &str, categorical_columns: usize, numerical_columns: usize) -> Self {
        Self {
            model_label: model_label.to_string(),
            categorical_columns,
            numerical_columns,
            start_time: Instant::now(),
            submissions: 0,
            last_result: None,
            history: VecDeque::with_capacity(MAX_HISTORY),
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    pub fn push_prediction(&mut self, row: PredictionRow) {
        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(row);
    }

    pub fn record_success(&mut self, summary: String, estimate: &Estimate) {
        self.submissions += 1;
        let prediction = &estimate.prediction;
        self.last_result = Some(ResultView::Success(prediction.display()));
        if !estimate.backfilled.is_empty() {
            self.push_log(
                "INFO",
                format!("defaulted {}", estimate.backfilled.join(", ")),
            );
        }
        self.push_log(
            "PRED",
            format!("{} -> {}", summary, prediction.price_string()),
        );
        self.push_prediction(PredictionRow {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            summary,
            price: prediction.price_string(),
            backfilled: estimate.backfilled.len(),
        });
    }

    pub fn record_failure(&mut self, summary: String, error: &anyhow::Error) {
        self.submissions += 1;
        let message = format!("{:#}", error);
        self.last_result = Some(ResultView::Failure(message.clone()));
        self.push_log("ERROR", format!("{}: {}", summary, message));
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}
