use chrono::Weekday;
use serde::Serialize;

/// How the student hands in answers on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerInput {
    Text,
    Upload,
}

#[derive(Debug, Serialize)]
pub struct DayPlan {
    #[serde(skip)]
    pub weekday: Weekday,
    pub name: &'static str,
    pub count: usize,
    pub kind: &'static str,
    pub placeholder: &'static str,
}

impl DayPlan {
    pub fn is_rest_day(&self) -> bool {
        self.count == 0
    }

    pub fn input(&self) -> AnswerInput {
        if self.weekday == Weekday::Thu {
            AnswerInput::Upload
        } else {
            AnswerInput::Text
        }
    }
}

static WEEK: [DayPlan; 7] = [
    DayPlan {
        weekday: Weekday::Mon,
        name: "Monday",
        count: 3,
        kind: "Question-Answer (3-5 lines)",
        placeholder: "Type your detailed answer here...",
    },
    DayPlan {
        weekday: Weekday::Tue,
        name: "Tuesday",
        count: 10,
        kind: "One-Liner Question",
        placeholder: "Type the precise one-line answer...",
    },
    DayPlan {
        weekday: Weekday::Wed,
        name: "Wednesday",
        count: 5,
        kind: "Two-Liner Question",
        placeholder: "Type your short, summarized answer...",
    },
    DayPlan {
        weekday: Weekday::Thu,
        name: "Thursday",
        count: 1,
        kind: "Drawing-Based Question",
        placeholder: "Upload your diagram/drawing (Image/PDF) or describe it here.",
    },
    DayPlan {
        weekday: Weekday::Fri,
        name: "Friday",
        count: 2,
        kind: "Observation-Based Question",
        placeholder: "Describe your observation and conclusion...",
    },
    DayPlan {
        weekday: Weekday::Sat,
        name: "Saturday",
        count: 0,
        kind: "Rest Day",
        placeholder: "",
    },
    DayPlan {
        weekday: Weekday::Sun,
        name: "Sunday",
        count: 0,
        kind: "Rest Day",
        placeholder: "",
    },
];

pub fn plan_for(weekday: Weekday) -> &'static DayPlan {
    &WEEK[weekday.num_days_from_monday() as usize]
}

/// The full schedule, Monday first.
pub fn week() -> impl Iterator<Item = &'static DayPlan> {
    WEEK.iter()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    plan_for(weekday).name
}

/// Inverse of [`weekday_name`]. Only the full English names are accepted.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    WEEK.iter()
        .find(|plan| plan.name == name)
        .map(|plan| plan.weekday)
}
