use crate::attendance::status_of;
use crate::models::{
    Board, DayDocument, Participant, Status, StatusCounts, Tier, Weather, WeatherCondition,
};
use crate::variant::Variant;
use chrono::{NaiveDateTime, NaiveTime, Timelike};

const CAN_PLAY: usize = 4;
const CAN_PRACTICE: usize = 2;

pub fn count_statuses(participants: &[Participant]) -> StatusCounts {
    participants
        .iter()
        .fold(StatusCounts::default(), |mut counts, participant| {
            match participant.status {
                Status::Join => counts.join += 1,
                Status::Maybe => counts.maybe += 1,
                Status::Pass => counts.pass += 1,
                Status::None => {}
            }
            counts
        })
}

pub fn tier_for(join_count: usize) -> Tier {
    if join_count >= CAN_PLAY {
        Tier::CanPlay
    } else if join_count >= CAN_PRACTICE {
        Tier::CanPractice
    } else {
        Tier::NotEnough
    }
}

pub fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::CanPlay => "green",
        Tier::CanPractice => "yellow",
        Tier::NotEnough => "gray",
    }
}

pub fn tier_message(variant: Variant, tier: Tier) -> &'static str {
    let copy = variant.copy();
    match tier {
        Tier::CanPlay => copy.can_play,
        Tier::CanPractice => copy.can_practice,
        Tier::NotEnough => copy.not_enough,
    }
}

/// 11:50–11:59 or 12:20–12:59 local time.
pub fn is_close_to_kickoff(time: NaiveTime) -> bool {
    let (hour, minute) = (time.hour(), time.minute());
    (hour == 12 && minute >= 20) || (hour == 11 && minute >= 50)
}

pub fn shows_weather_warning(weather: &Weather) -> bool {
    matches!(weather.condition, WeatherCondition::Rain | WeatherCondition::Storm)
}

/// Joiners first, then undecided, then passing; arrival order within each.
pub fn sorted_roster(participants: &[Participant]) -> Vec<Participant> {
    let mut roster = participants.to_vec();
    roster.sort_by_key(|participant| participant.status.order());
    roster
}

pub fn build_board_at(
    variant: Variant,
    date_key: &str,
    document: Option<&DayDocument>,
    nickname: Option<&str>,
    now: NaiveDateTime,
    weather: Weather,
) -> Board {
    let participants = document
        .map(|document| document.participants.as_slice())
        .unwrap_or_default();
    let counts = count_statuses(participants);
    let tier = tier_for(counts.join);

    Board {
        date_key: date_key.to_string(),
        date_label: variant.date_label(now.date()),
        revision: document.map_or(0, |document| document.revision),
        participants: sorted_roster(participants),
        counts,
        tier,
        color: tier_color(tier).to_string(),
        message: tier_message(variant, tier).to_string(),
        nickname: nickname.map(str::to_string),
        my_status: status_of(document, nickname),
        starting_soon: is_close_to_kickoff(now.time()) && counts.join >= CAN_PLAY,
        weather,
        weather_warning: shows_weather_warning(&weather),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn participant(nickname: &str, status: Status) -> Participant {
        Participant {
            nickname: nickname.into(),
            status,
            time: "11:30".into(),
        }
    }

    fn noon_plus(minutes: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(12, minutes, 0)
            .unwrap()
    }

    fn board_at(
        variant: Variant,
        document: Option<&DayDocument>,
        nickname: Option<&str>,
        minutes: u32,
    ) -> Board {
        build_board_at(
            variant,
            "2026-10-18",
            document,
            nickname,
            noon_plus(minutes),
            Weather::default(),
        )
    }

    fn document(participants: Vec<Participant>) -> DayDocument {
        DayDocument {
            participants,
            revision: 1,
            ..DayDocument::default()
        }
    }

    #[test]
    fn counts_and_tier_for_small_group() {
        let doc = document(vec![
            participant("a", Status::Join),
            participant("b", Status::Pass),
            participant("c", Status::Join),
        ]);
        let board = board_at(Variant::Korean, Some(&doc), Some("b"), 0);

        assert_eq!(board.counts.join, 2);
        assert_eq!(board.counts.pass, 1);
        assert_eq!(board.tier, Tier::CanPractice);
        assert_eq!(board.message, "패스 연습 가능해요!");
        assert_eq!(board.color, "yellow");
        assert_eq!(board.my_status, Status::Pass);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(tier_for(0), Tier::NotEnough);
        assert_eq!(tier_for(1), Tier::NotEnough);
        assert_eq!(tier_for(2), Tier::CanPractice);
        assert_eq!(tier_for(3), Tier::CanPractice);
        assert_eq!(tier_for(4), Tier::CanPlay);
        assert_eq!(tier_for(11), Tier::CanPlay);
    }

    #[test]
    fn kickoff_window() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert!(!is_close_to_kickoff(at(11, 49)));
        assert!(is_close_to_kickoff(at(11, 50)));
        assert!(!is_close_to_kickoff(at(12, 19)));
        assert!(is_close_to_kickoff(at(12, 20)));
        assert!(is_close_to_kickoff(at(12, 59)));
        assert!(!is_close_to_kickoff(at(13, 0)));
    }

    #[test]
    fn starting_soon_needs_a_full_side() {
        let three = document(vec![
            participant("a", Status::Join),
            participant("b", Status::Join),
            participant("c", Status::Join),
        ]);
        let board = board_at(Variant::Korean, Some(&three), None, 25);
        assert!(!board.starting_soon);

        let mut four = three.clone();
        four.participants.push(participant("d", Status::Join));
        let board = board_at(Variant::Korean, Some(&four), None, 25);
        assert!(board.starting_soon);
        assert_eq!(board.tier, Tier::CanPlay);
    }

    #[test]
    fn roster_orders_by_status_then_arrival() {
        let roster = sorted_roster(&[
            participant("p1", Status::Pass),
            participant("j1", Status::Join),
            participant("m1", Status::Maybe),
            participant("j2", Status::Join),
        ]);
        let names: Vec<_> = roster.iter().map(|p| p.nickname.as_str()).collect();
        assert_eq!(names, ["j1", "j2", "m1", "p1"]);
    }

    #[test]
    fn empty_day_board() {
        let board = board_at(Variant::Japanese, None, Some("kim"), 0);
        assert!(board.participants.is_empty());
        assert_eq!(board.tier, Tier::NotEnough);
        assert_eq!(board.message, "まだ人数が不足しています");
        assert_eq!(board.my_status, Status::None);
        assert_eq!(board.revision, 0);
        assert!(!board.weather_warning);
    }

    #[test]
    fn rain_raises_weather_warning() {
        let weather = Weather {
            condition: WeatherCondition::Rain,
            temp: 12,
        };
        assert!(shows_weather_warning(&weather));
        assert!(!shows_weather_warning(&Weather::default()));
    }
}
