//! When the games were played
//!
//! Hours, weekdays and calendar days are taken in UTC. Win rates per hour,
//! weekday and period of the day stay insufficient below
//! `min_games_for_pattern` games.
//!
//! A session is every game played on one calendar day, provided the day holds
//! at least `min_session_games` games. Sessions are grouped by length:
//!
//! | Length | Games |
//! |---|---|
//! | short | up to 5 |
//! | medium | 6 to 10 |
//! | long | more than 10 |

use std::collections::BTreeMap;

use chesslytics_model::GameRecord;
use chesslytics_stats::estimate::{Estimate, mean, ratio};
use chrono::{Datelike as _, NaiveDate, Timelike as _};
use serde::Serialize;

use crate::config::AnalysisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    /// 00:00 to 06:00
    Night,
    /// 06:00 to 12:00
    Morning,
    /// 12:00 to 18:00
    Afternoon,
    /// 18:00 to 24:00
    Evening,
}

impl DayPeriod {
    pub const ALL: [Self; 4] = [Self::Night, Self::Morning, Self::Afternoon, Self::Evening];

    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..6 => Self::Night,
            6..12 => Self::Morning,
            12..18 => Self::Afternoon,
            _ => Self::Evening,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];
}

impl From<chrono::Weekday> for Weekday {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// Games and wins in one time slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotStats {
    pub games: usize,
    pub wins: usize,
    /// Insufficient below `min_games_for_pattern` games
    pub win_rate: Estimate<f64>,
}

impl SlotStats {
    #[expect(clippy::cast_precision_loss)]
    fn new<'a, I>(games: I, min_games: usize) -> Self
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let (games, wins) = games.into_iter().fold((0, 0), |(games, wins), game| {
            (games + 1, wins + usize::from(game.outcome().is_win()))
        });
        Self {
            games,
            wins,
            win_rate: Estimate::require(games, min_games, || wins as f64 / games as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPerformance {
    /// Hour of day (UTC), 0 to 23
    pub hour: u32,
    pub games: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLength {
    Short,
    Medium,
    Long,
}

impl SessionLength {
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Long];

    #[must_use]
    pub fn of(games: usize) -> Self {
        match games {
            0..=5 => Self::Short,
            6..=10 => Self::Medium,
            _ => Self::Long,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionGroup {
    pub sessions: usize,
    pub games: usize,
    /// Mean of the per-session win rates
    pub avg_win_rate: Estimate<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub min_session_games: usize,
    /// Distinct calendar days with at least one game
    pub days_played: usize,
    pub sessions: usize,
    pub by_length: BTreeMap<SessionLength, SessionGroup>,
    /// Length with the highest average win rate; the shorter one on ties
    pub best_length: Option<SessionLength>,
}

impl SessionReport {
    #[must_use]
    pub fn new(games: &[GameRecord], min_session_games: usize) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<&GameRecord>> = BTreeMap::new();
        for game in games {
            days.entry(game.played_at().date_naive()).or_default().push(game);
        }

        let mut lengths: BTreeMap<SessionLength, (usize, Vec<f64>)> = BTreeMap::new();
        for day in days.values().filter(|day| day.len() >= min_session_games) {
            let wins = day.iter().filter(|game| game.outcome().is_win()).count();
            if let Estimate::Value(rate) = ratio(wins, day.len()) {
                let (games, rates) = lengths.entry(SessionLength::of(day.len())).or_default();
                *games += day.len();
                rates.push(rate);
            }
        }

        let by_length = SessionLength::ALL
            .into_iter()
            .map(|length| {
                let (games, rates) = lengths.remove(&length).unwrap_or_default();
                let group = SessionGroup {
                    sessions: rates.len(),
                    games,
                    avg_win_rate: mean(rates),
                };
                (length, group)
            })
            .collect::<BTreeMap<_, _>>();
        let best_length = by_length
            .iter()
            .filter_map(|(&length, group)| group.avg_win_rate.value().map(|rate| (length, rate)))
            .fold(None, |best: Option<(SessionLength, f64)>, (length, rate)| match best {
                Some((_, best_rate)) if best_rate >= rate => best,
                _ => Some((length, rate)),
            })
            .map(|(length, _)| length);

        Self {
            min_session_games,
            days_played: days.len(),
            sessions: by_length.values().map(|group| group.sessions).sum(),
            by_length,
            best_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    /// Hours (UTC) with at least one game
    pub by_hour: BTreeMap<u32, SlotStats>,
    /// Hours with a sufficient sample, by win rate descending
    pub best_hours: Vec<HourPerformance>,
    pub by_weekday: BTreeMap<Weekday, SlotStats>,
    pub by_period: BTreeMap<DayPeriod, SlotStats>,
    pub sessions: SessionReport,
}

impl ScheduleReport {
    #[must_use]
    pub fn new(games: &[GameRecord], config: &AnalysisConfig) -> Self {
        let min_games = config.min_games_for_pattern;
        let hour_of = |game: &GameRecord| game.played_at().hour();

        let mut hours = games.iter().map(hour_of).collect::<Vec<_>>();
        hours.sort_unstable();
        hours.dedup();
        let by_hour = hours
            .into_iter()
            .map(|hour| {
                let stats = SlotStats::new(games.iter().filter(|game| hour_of(*game) == hour), min_games);
                (hour, stats)
            })
            .collect::<BTreeMap<_, _>>();

        let mut best_hours = by_hour
            .iter()
            .filter_map(|(&hour, stats)| {
                stats.win_rate.value().map(|win_rate| HourPerformance {
                    hour,
                    games: stats.games,
                    win_rate,
                })
            })
            .collect::<Vec<_>>();
        best_hours.sort_by(|a, b| {
            b.win_rate
                .total_cmp(&a.win_rate)
                .then(b.games.cmp(&a.games))
                .then(a.hour.cmp(&b.hour))
        });
        best_hours.truncate(config.ranking_top_n);

        let by_weekday = Weekday::ALL
            .into_iter()
            .map(|weekday| {
                let matching = games
                    .iter()
                    .filter(|game| Weekday::from(game.played_at().weekday()) == weekday);
                (weekday, SlotStats::new(matching, min_games))
            })
            .collect();
        let by_period = DayPeriod::ALL
            .into_iter()
            .map(|period| {
                let matching = games
                    .iter()
                    .filter(|game| DayPeriod::from_hour(hour_of(*game)) == period);
                (period, SlotStats::new(matching, min_games))
            })
            .collect();

        Self {
            by_hour,
            best_hours,
            by_weekday,
            by_period,
            sessions: SessionReport::new(games, config.min_session_games),
        }
    }
}

#[cfg(test)]
mod tests {
    use chesslytics_model::Outcome;

    use super::*;
    use crate::test_util::GameBuilder;

    /// 2024-01-01 00:00:00 UTC, a Monday
    const MONDAY: i64 = 1_704_067_200;

    fn played(outcome: Outcome, day: i64, hour: i64, minute: i64) -> GameRecord {
        GameBuilder::new(outcome)
            .end_time(MONDAY + day * 86_400 + hour * 3_600 + minute * 60)
            .build()
    }

    #[test]
    fn test_hours_weekdays_and_periods() {
        let games = vec![
            played(Outcome::Win, 0, 9, 0),
            played(Outcome::Win, 0, 9, 10),
            played(Outcome::Loss, 0, 9, 20),
            played(Outcome::Win, 0, 21, 0),
            played(Outcome::Win, 0, 21, 10),
            played(Outcome::Win, 0, 21, 20),
            played(Outcome::Loss, 1, 14, 0),
        ];
        let report = ScheduleReport::new(&games, &AnalysisConfig::default());

        assert_eq!(report.by_hour.keys().copied().collect::<Vec<_>>(), [9, 14, 21]);
        assert!(report.by_hour[&14].win_rate.is_insufficient());
        let best = report
            .best_hours
            .iter()
            .map(|hour| (hour.hour, hour.games))
            .collect::<Vec<_>>();
        assert_eq!(best, [(21, 3), (9, 3)]);
        assert_eq!(report.best_hours[0].win_rate, 1.0);

        let monday = &report.by_weekday[&Weekday::Monday];
        assert_eq!((monday.games, monday.wins), (6, 5));
        assert!(report.by_weekday[&Weekday::Tuesday].win_rate.is_insufficient());
        assert_eq!(report.by_weekday[&Weekday::Sunday].games, 0);

        assert_eq!(report.by_period[&DayPeriod::Evening].win_rate, Estimate::Value(1.0));
        assert_eq!(report.by_period[&DayPeriod::Morning].wins, 2);
        assert_eq!(report.by_period[&DayPeriod::Afternoon].games, 1);
        assert_eq!(report.by_period[&DayPeriod::Night].games, 0);
    }

    #[test]
    fn test_best_hours_capped() {
        let games = (0..6)
            .flat_map(|hour| (0..3).map(move |minute| played(Outcome::Win, 0, hour, minute)))
            .collect::<Vec<_>>();
        let config = AnalysisConfig {
            ranking_top_n: 2,
            ..AnalysisConfig::default()
        };
        let report = ScheduleReport::new(&games, &config);
        // Equal rates and sizes fall back to the earlier hour
        let hours = report.best_hours.iter().map(|h| h.hour).collect::<Vec<_>>();
        assert_eq!(hours, [0, 1]);
    }

    #[test]
    fn test_sessions() {
        let mut games = vec![];
        // Short session: 2 of 4 won
        for (minute, outcome) in [Outcome::Win, Outcome::Loss, Outcome::Win, Outcome::Draw]
            .into_iter()
            .enumerate()
        {
            games.push(played(outcome, 0, 12, i64::try_from(minute).unwrap()));
        }
        // Short session: all 3 won
        for minute in 0..3 {
            games.push(played(Outcome::Win, 1, 12, minute));
        }
        // Long session: 3 of 12 won
        for minute in 0..12 {
            let outcome = if minute < 3 { Outcome::Win } else { Outcome::Loss };
            games.push(played(outcome, 2, 12, minute));
        }
        // Too few games for a session
        games.push(played(Outcome::Win, 3, 12, 0));

        let sessions = SessionReport::new(&games, 3);
        assert_eq!(sessions.days_played, 4);
        assert_eq!(sessions.sessions, 3);

        let short = &sessions.by_length[&SessionLength::Short];
        assert_eq!((short.sessions, short.games), (2, 7));
        assert_eq!(short.avg_win_rate, Estimate::Value(0.75));
        assert_eq!(
            sessions.by_length[&SessionLength::Long].avg_win_rate,
            Estimate::Value(0.25)
        );
        assert!(sessions.by_length[&SessionLength::Medium].avg_win_rate.is_insufficient());
        assert_eq!(sessions.best_length, Some(SessionLength::Short));
    }

    #[test]
    fn test_sessions_without_enough_games() {
        let games = vec![played(Outcome::Win, 0, 8, 0), played(Outcome::Win, 0, 8, 5)];
        let sessions = SessionReport::new(&games, 3);
        assert_eq!(sessions.days_played, 1);
        assert_eq!(sessions.sessions, 0);
        assert_eq!(sessions.best_length, None);
    }

    #[test]
    fn test_period_boundaries() {
        let periods = [0, 5, 6, 11, 12, 17, 18, 23].map(DayPeriod::from_hour);
        assert_eq!(
            periods,
            [
                DayPeriod::Night,
                DayPeriod::Night,
                DayPeriod::Morning,
                DayPeriod::Morning,
                DayPeriod::Afternoon,
                DayPeriod::Afternoon,
                DayPeriod::Evening,
                DayPeriod::Evening,
            ]
        );
    }
}
