use crate::errors::{AppError, AttendanceError, NicknameError};
use crate::models::Status;
use chrono::{Datelike, NaiveDate, Weekday};
use std::str::FromStr;

/// Board flavour chosen at startup. The localized boards drop the "maybe"
/// status and enforce nickname ownership across days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Classic,
    Korean,
    Japanese,
}

pub struct BoardCopy {
    pub title: &'static str,
    pub nickname_required: &'static str,
    pub nickname_too_long: &'static str,
    pub nickname_taken: &'static str,
    pub nickname_check_failed: &'static str,
    pub status_update_failed: &'static str,
    pub not_registered: &'static str,
    pub can_play: &'static str,
    pub can_practice: &'static str,
    pub not_enough: &'static str,
    pub starting_soon: &'static str,
    pub join: &'static str,
    pub maybe: &'static str,
    pub pass: &'static str,
}

const CLASSIC: BoardCopy = BoardCopy {
    title: "Today's Lunch Soccer",
    nickname_required: "닉네임을 입력해주세요.",
    nickname_too_long: "닉네임은 최대 10글자까지 입력 가능합니다.",
    nickname_taken: "이미 사용 중인 닉네임입니다. 다른 닉네임을 입력해주세요.",
    nickname_check_failed: "닉네임 확인 중 오류가 발생했습니다. 다시 시도해주세요.",
    status_update_failed: "상태 업데이트에 실패했습니다. 다시 시도해주세요.",
    not_registered: "닉네임을 먼저 등록해주세요.",
    can_play: "🎯 경기 가능해요!",
    can_practice: "⚽ 패스 연습 가능해요!",
    not_enough: "😢 아직 인원이 부족해요",
    starting_soon: "🔥 곧 시작합니다!",
    join: "✅ 참가해요",
    maybe: "❓ 미정이에요",
    pass: "❌ 불참해요",
};

const KOREAN: BoardCopy = BoardCopy {
    title: "Today's Lunch Soccer",
    nickname_required: "닉네임을 입력해주세요.",
    nickname_too_long: "닉네임은 최대 10글자까지 입력 가능합니다.",
    nickname_taken: "이미 사용 중인 닉네임입니다. 다른 닉네임을 입력해주세요.",
    nickname_check_failed: "닉네임 확인 중 오류가 발생했습니다. 다시 시도해주세요.",
    status_update_failed: "상태 업데이트에 실패했습니다. 다시 시도해주세요.",
    not_registered: "닉네임을 먼저 등록해주세요.",
    can_play: "경기 가능해요!",
    can_practice: "패스 연습 가능해요!",
    not_enough: "아직 인원이 부족해요",
    starting_soon: "곧 시작합니다!",
    join: "참가해요",
    maybe: "미정이에요",
    pass: "불참해요",
};

const JAPANESE: BoardCopy = BoardCopy {
    title: "Today's Lunch Soccer",
    nickname_required: "ニックネームを入力してください。",
    nickname_too_long: "ニックネームは最大10文字まで入力可能です。",
    nickname_taken: "既に使用されているニックネームです。別のニックネームを入力してください。",
    nickname_check_failed: "ニックネーム確認中にエラーが発生しました。再度お試しください。",
    status_update_failed: "状態更新に失敗しました。再度お試しください。",
    not_registered: "先にニックネームを登録してください。",
    can_play: "試合可能です！",
    can_practice: "パス練習可能です！",
    not_enough: "まだ人数が不足しています",
    starting_soon: "もうすぐ始まります！",
    join: "参加します",
    maybe: "未定です",
    pass: "不参加です",
};

impl Variant {
    pub fn copy(self) -> &'static BoardCopy {
        match self {
            Variant::Classic => &CLASSIC,
            Variant::Korean => &KOREAN,
            Variant::Japanese => &JAPANESE,
        }
    }

    pub fn offers(self, status: Status) -> bool {
        status != Status::Maybe || self == Variant::Classic
    }

    pub fn enforces_unique_nicknames(self) -> bool {
        self != Variant::Classic
    }

    pub fn lang(self) -> &'static str {
        match self {
            Variant::Japanese => "ja",
            Variant::Classic | Variant::Korean => "ko",
        }
    }

    /// Month/day/weekday label in the board's locale, e.g. `10월 18일 (일)`.
    pub fn date_label(self, date: NaiveDate) -> String {
        match self {
            Variant::Japanese => format!(
                "{}月{}日({})",
                date.month(),
                date.day(),
                japanese_weekday(date.weekday())
            ),
            Variant::Classic | Variant::Korean => format!(
                "{}월 {}일 ({})",
                date.month(),
                date.day(),
                korean_weekday(date.weekday())
            ),
        }
    }

    /// Turns a domain error into a response, using this board's wording for
    /// anything the user can fix.
    pub fn reject(self, err: AttendanceError) -> AppError {
        let copy = self.copy();
        let localized = match &err {
            AttendanceError::InvalidNickname(NicknameError::Empty) => Some(copy.nickname_required),
            AttendanceError::InvalidNickname(NicknameError::TooLong { .. }) => {
                Some(copy.nickname_too_long)
            }
            AttendanceError::NicknameTaken(_) => Some(copy.nickname_taken),
            AttendanceError::NotRegistered => Some(copy.not_registered),
            _ => None,
        };
        let mut response = AppError::from(err);
        if let Some(message) = localized {
            response.message = message.to_string();
        }
        response
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" | "base" => Ok(Variant::Classic),
            "ko" | "korean" => Ok(Variant::Korean),
            "ja" | "japanese" => Ok(Variant::Japanese),
            other => Err(format!("unknown board variant '{other}'")),
        }
    }
}

fn korean_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "월",
        Weekday::Tue => "화",
        Weekday::Wed => "수",
        Weekday::Thu => "목",
        Weekday::Fri => "금",
        Weekday::Sat => "토",
        Weekday::Sun => "일",
    }
}

fn japanese_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn only_classic_offers_maybe() {
        assert!(Variant::Classic.offers(Status::Maybe));
        assert!(!Variant::Korean.offers(Status::Maybe));
        assert!(!Variant::Japanese.offers(Status::Maybe));
        assert!(Variant::Japanese.offers(Status::Join));
        assert!(Variant::Korean.offers(Status::None));
    }

    #[test]
    fn only_localized_boards_own_nicknames() {
        assert!(!Variant::Classic.enforces_unique_nicknames());
        assert!(Variant::Korean.enforces_unique_nicknames());
        assert!(Variant::Japanese.enforces_unique_nicknames());
    }

    #[test]
    fn date_labels_follow_locale() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(Variant::Korean.date_label(date), "10월 18일 (일)");
        assert_eq!(Variant::Japanese.date_label(date), "10月18日(日)");
    }

    #[test]
    fn parses_variant_names() {
        assert_eq!("KO".parse::<Variant>(), Ok(Variant::Korean));
        assert_eq!("classic".parse::<Variant>(), Ok(Variant::Classic));
        assert_eq!(" ja ".parse::<Variant>(), Ok(Variant::Japanese));
        assert!("fr".parse::<Variant>().is_err());
    }

    #[test]
    fn reject_localizes_user_errors() {
        let err = Variant::Japanese.reject(AttendanceError::NicknameTaken("bob".into()));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, JAPANESE.nickname_taken);

        let err = Variant::Korean.reject(AttendanceError::InvalidNickname(NicknameError::Empty));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, KOREAN.nickname_required);

        let err = Variant::Classic.reject(AttendanceError::InvalidDateKey("today".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
