//! Greeting and quote of the day.
//!
//! The app lives on a fixed UTC+3 clock, so "today" and the greeting hour
//! are the same for every user regardless of the host timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

const APP_UTC_OFFSET_SECS: i32 = 3 * 3600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// The app's fixed clock offset.
pub fn app_offset() -> FixedOffset {
    FixedOffset::east_opt(APP_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// `now` on the app clock.
pub fn app_time(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    now.with_timezone(&app_offset())
}

/// Calendar date on the app clock.
pub fn app_today(now: DateTime<Utc>) -> NaiveDate {
    app_time(now).date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    /// Morning 6-11, afternoon 12-16, evening 17-20, night otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DayPart::Morning,
            12..=16 => DayPart::Afternoon,
            17..=20 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    pub fn greeting(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::En, DayPart::Morning) => "Good Morning",
            (Language::En, DayPart::Afternoon) => "Good Afternoon",
            (Language::En, DayPart::Evening) => "Good Evening",
            (Language::En, DayPart::Night) => "Good Night",
            (Language::Ar, DayPart::Morning) => "صباح الخير",
            (Language::Ar, DayPart::Afternoon | DayPart::Evening) => "مساء الخير",
            (Language::Ar, DayPart::Night) => "ليلة سعيدة",
        }
    }
}

pub fn greeting(hour: u32) -> DayPart {
    DayPart::from_hour(hour)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
    pub language: Language,
}

const fn q(text: &'static str, author: &'static str, language: Language) -> Quote {
    Quote {
        text,
        author,
        language,
    }
}

pub const QUOTES: &[Quote] = &[
    q("المعرفة قوة", "فرانسيس بيكون", Language::Ar),
    q("الحياة غير المفحوصة لا تستحق العيش", "سقراط", Language::Ar),
    q("نحن ما نفعله بانتظام. التميز إذن ليس فعلاً بل عادة", "أرسطو", Language::Ar),
    q("الطريق الوحيد للقيام بعمل عظيم هو أن تحب ما تفعله", "ستيف جوبز", Language::Ar),
    q("في وسط الصعوبة تكمن الفرصة", "ألبرت أينشتاين", Language::Ar),
    q("الإنسان محكوم عليه أن يكون حراً", "جان بول سارتر", Language::Ar),
    q("أعرف أنني لا أعرف شيئاً", "سقراط", Language::Ar),
    q("الصداقة الحقيقية نبتة بطيئة النمو", "جورج واشنطن", Language::Ar),
    q("السعادة ليست هدفاً... إنها نتيجة ثانوية لحياة عاشها الإنسان جيداً", "إليانور روزفلت", Language::Ar),
    q("كن أنت التغيير الذي تريد أن تراه في العالم", "المهتما غاندي", Language::Ar),
    q("الحكمة تبدأ بالدهشة", "أرسطو", Language::Ar),
    q("الصبر مفتاح الفرج", "الإمام علي", Language::Ar),
    q("Knowledge is power", "Francis Bacon", Language::En),
    q("The unexamined life is not worth living", "Socrates", Language::En),
    q("We are what we repeatedly do. Excellence, then, is not an act, but a habit", "Aristotle", Language::En),
    q("The only way to do great work is to love what you do", "Steve Jobs", Language::En),
    q("In the middle of difficulty lies opportunity", "Albert Einstein", Language::En),
    q("Man is condemned to be free", "Jean-Paul Sartre", Language::En),
    q("I know that I know nothing", "Socrates", Language::En),
    q("True friendship is a plant of slow growth", "George Washington", Language::En),
    q("Happiness is not a goal... it's a by-product of a life well-lived", "Eleanor Roosevelt", Language::En),
    q("Be the change you wish to see in the world", "Mahatma Gandhi", Language::En),
    q("Wisdom begins in wonder", "Aristotle", Language::En),
    q("Patience is the key to relief", "Imam Ali", Language::En),
];

/// Quote for `date`: the language's quotes indexed by day-of-year.
pub fn daily_quote(language: Language, date: NaiveDate) -> Option<Quote> {
    let pool: Vec<&Quote> = QUOTES.iter().filter(|q| q.language == language).collect();
    if pool.is_empty() {
        return None;
    }
    let index = date.ordinal() as usize % pool.len();
    pool.get(index).map(|q| **q)
}

/// What the home screen shows for `now`.
#[derive(Debug, Clone, Serialize)]
pub struct Today {
    pub date: NaiveDate,
    pub time: String,
    pub part_of_day: DayPart,
    pub greeting: &'static str,
    pub quote: Option<Quote>,
}

impl Today {
    pub fn at(now: DateTime<Utc>, language: Language) -> Self {
        let local = app_time(now);
        let part = DayPart::from_hour(local.hour());
        Self {
            date: local.date_naive(),
            time: local.format("%H:%M").to_string(),
            part_of_day: part,
            greeting: part.greeting(language),
            quote: daily_quote(language, local.date_naive()),
        }
    }
}
