use chrono::{Local, NaiveDate};

/// 「今日」を与える時計
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// ローカル時刻の日付を返す時計
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// 常に同じ日付を返す時計
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
