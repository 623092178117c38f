//! Exponential backoff with an elapsed-delay ceiling.
//!
//! The attempt count is unbounded; retrying stops once the next wait would
//! exceed `ceiling`. With the defaults (1s, x2, 32s) a failing call is tried
//! seven times, waiting 1, 2, 4, 8, 16 and 32 seconds in between, and the
//! seventh failure is returned.

use crate::domain::ports::Sleeper;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub multiplier: u32,
    pub ceiling: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            multiplier: 2,
            ceiling: Duration::from_secs(32),
        }
    }
}

impl RetryPolicy {
    pub fn new(initial_delay: Duration, multiplier: u32, ceiling: Duration) -> Self {
        Self {
            initial_delay,
            multiplier,
            ceiling,
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        // multiplier 小於 2 時序列永遠不會超過上限
        delay
            .checked_mul(self.multiplier.max(2))
            .unwrap_or(Duration::MAX)
    }

    /// 執行 `operation`，遇到可重試錯誤時等待後重試；其他錯誤直接回傳
    pub async fn run<T, F, Fut, Z>(&self, sleeper: &Z, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        Z: Sleeper + ?Sized,
    {
        let mut delay = self.initial_delay;
        let mut attempt: u32 = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!("✅ Succeeded on attempt {}", attempt);
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    if delay > self.ceiling {
                        tracing::error!(
                            "❌ Giving up after {} attempts (next wait {:?} exceeds {:?}): {}",
                            attempt,
                            delay,
                            self.ceiling,
                            e
                        );
                        return Err(e);
                    }

                    tracing::warn!(
                        "⚠️ Attempt {} failed: {}. Retrying in {:?}",
                        attempt,
                        e,
                        delay
                    );
                    sleeper.sleep(delay).await;
                    delay = self.next_delay(delay);
                    attempt += 1;
                }
            }
        }
    }
}

/// 只記錄等待時間、不真的等待的 Sleeper，用於測試與模擬
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|delays| delays.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}
