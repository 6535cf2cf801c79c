// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chrono::DateTime;
use chrono::Duration;
use chrono::Local;
use chrono::NaiveDate;
use chrono::TimeZone;

/// The session's notion of "now" and "today", captured once at program
/// start. Every due computation and every newly scheduled review date uses
/// this clock, so a long interactive session stays internally consistent.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    started_at: DateTime<Local>,
    today: NaiveDate,
}

impl SessionClock {
    pub fn start() -> Self {
        Self::at(Local::now())
    }

    pub fn at(moment: DateTime<Local>) -> Self {
        SessionClock {
            started_at: moment,
            today: moment.date_naive(),
        }
    }

    /// The moment the session started, as a unix timestamp.
    pub fn now_ts(&self) -> i64 {
        self.started_at.timestamp()
    }

    /// The current calendar day, in local time.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// The local calendar day a unix timestamp falls on. Timestamps outside
    /// the representable range count as far future.
    pub fn day_of(&self, ts: i64) -> NaiveDate {
        match DateTime::from_timestamp(ts, 0) {
            Some(dt) => dt.with_timezone(&Local).date_naive(),
            None => NaiveDate::MAX,
        }
    }

    /// Local midnight of today plus `days`, as a unix timestamp. Dates
    /// past the representable range saturate to the far future.
    pub fn ts_after_days(&self, days: u32) -> i64 {
        let day = self
            .today
            .checked_add_signed(Duration::days(days as i64))
            .unwrap_or(NaiveDate::MAX);
        let midnight = day.and_hms_opt(0, 0, 0).unwrap();
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.timestamp())
            // Midnight can fall in a DST gap; approximate with UTC then.
            .unwrap_or_else(|| midnight.and_utc().timestamp())
    }

    /// Seed for the shuffle RNG.
    pub fn seed(&self) -> u64 {
        self.started_at.timestamp() as u64
    }
}
