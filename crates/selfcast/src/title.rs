//! Episode title synthesis.
//!
//! A recording whose time slot matches a scheduled program gets a
//! program-qualified title; anything else gets a generic timestamp title.
//! Total for any channel/timestamp pair, including unknown channels.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::schedule::Schedule;

/// Build the episode title for a broadcast at `at` on `channel`.
pub fn synthesize(channel: &str, at: NaiveDateTime, schedule: &Schedule) -> String {
    let slot = format!("{:02}{:02}", at.hour(), at.minute());
    let weekday = at.weekday().num_days_from_sunday() as u8;

    let program = schedule
        .channel(channel)
        .and_then(|c| c.program_at(&slot, weekday));

    match program {
        Some(program) => format!("{} {}", program.name, japanese_date(at)),
        None => format!("{} {:02}:{:02}", japanese_date(at), at.hour(), at.minute()),
    }
}

/// `2015年3月10日`, with no zero padding on month or day.
fn japanese_date(at: NaiveDateTime) -> String {
    format!("{}年{}月{}日", at.year(), at.month(), at.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn matching_slot_yields_program_title() {
        let schedule = Schedule::load_default().unwrap();
        // 2015-03-10 is a Tuesday; クラシックカフェ airs Mon-Thu at 14:00.
        let title = synthesize("NHK-FM", ts(2015, 3, 10, 14, 0), &schedule);
        assert_eq!(title, "クラシックカフェ 2015年3月10日");
    }

    #[test]
    fn no_match_yields_generic_title() {
        let schedule = Schedule::load_default().unwrap();
        let title = synthesize("NHK-FM", ts(2015, 3, 10, 3, 33), &schedule);
        assert_eq!(title, "2015年3月10日 03:33");
    }

    #[test]
    fn unknown_channel_falls_back() {
        let schedule = Schedule::load_default().unwrap();
        let title = synthesize("NO-SUCH", ts(2015, 3, 11, 14, 0), &schedule);
        assert_eq!(title, "2015年3月11日 14:00");
    }

    #[test]
    fn empty_schedule_falls_back() {
        let schedule = Schedule::from_toml_str("").unwrap();
        let title = synthesize("NHK-FM", ts(2015, 3, 11, 14, 0), &schedule);
        assert_eq!(title, "2015年3月11日 14:00");
    }

    #[test]
    fn weekday_gates_the_match() {
        let schedule = Schedule::load_default().unwrap();
        // 2015-03-13 is a Friday; クラシックカフェ does not air Fridays,
        // but オペラ・ファンタスティカ does at the same 14:00 slot.
        let title = synthesize("NHK-FM", ts(2015, 3, 13, 14, 0), &schedule);
        assert_eq!(title, "オペラ・ファンタスティカ 2015年3月13日");
    }

    #[test]
    fn tie_break_is_list_order() {
        let schedule = Schedule::from_toml_str(
            r#"
            [[channel]]
            name = "TEST"
            id = 9

            [[channel.program]]
            name = "early bird"
            at = "0600"
            weekdays = [1, 2]

            [[channel.program]]
            name = "late riser"
            at = "0600"
            weekdays = [2, 3]
            "#,
        )
        .unwrap();
        // 2015-03-10 is a Tuesday (weekday 2): both entries match.
        let title = synthesize("TEST", ts(2015, 3, 10, 6, 0), &schedule);
        assert_eq!(title, "early bird 2015年3月10日");
    }

    #[test]
    fn date_has_no_leading_zeros() {
        let schedule = Schedule::from_toml_str("").unwrap();
        let title = synthesize("X", ts(2015, 3, 5, 7, 5), &schedule);
        assert_eq!(title, "2015年3月5日 07:05");
    }
}
