//! Date-bucketed views over the course schedules

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use crate::course::{Course, ScheduleItem, TaskCategory};

/// Only these categories are shown as deadlines
const DEADLINE_CATEGORIES: [TaskCategory; 3] = [
    TaskCategory::Assignment,
    TaskCategory::Exam,
    TaskCategory::Project,
];

/// A schedule item, along with the name of its course
#[derive(Clone, Debug, PartialEq)]
pub struct AgendaEntry {
    pub course_name: String,
    pub item: ScheduleItem,
}

impl AgendaEntry {
    pub fn date(&self) -> NaiveDate {
        self.item.date()
    }
}

/// Every schedule item of `courses`, sorted by date
pub fn all_entries<'a, I>(courses: I) -> Vec<AgendaEntry>
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut entries: Vec<AgendaEntry> = courses.into_iter()
        .flat_map(|course| course.schedule().iter().map(move |item| AgendaEntry {
            course_name: course.name().to_string(),
            item: item.clone(),
        }))
        .collect();
    entries.sort_by_key(|entry| entry.date());
    entries
}


/// The entries of a calendar month
#[derive(Clone, Debug, PartialEq)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<AgendaEntry>,
}

impl MonthGroup {
    /// e.g. `October 2026`
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }

    /// The entries of this month, by day of month
    pub fn by_day(&self) -> BTreeMap<u32, Vec<&AgendaEntry>> {
        let mut days: BTreeMap<u32, Vec<&AgendaEntry>> = BTreeMap::new();
        for entry in &self.entries {
            days.entry(entry.date().day()).or_default().push(entry);
        }
        days
    }
}

/// Group entries by month, in chronological order
pub fn group_by_month(entries: &[AgendaEntry]) -> Vec<MonthGroup> {
    let mut months: BTreeMap<(i32, u32), Vec<AgendaEntry>> = BTreeMap::new();
    for entry in entries {
        months.entry((entry.date().year(), entry.date().month()))
            .or_default()
            .push(entry.clone());
    }
    months.into_iter()
        .map(|((year, month), entries)| MonthGroup { year, month, entries })
        .collect()
}


/// The entries of a week, from Sunday to Saturday
#[derive(Clone, Debug, PartialEq)]
pub struct WeekGroup {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub entries: Vec<AgendaEntry>,
}

impl WeekGroup {
    /// e.g. `Oct 18 - Oct 24, 2026`
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%b %-d"), self.end.format("%b %-d, %Y"))
    }
}

/// Group entries by week.
///
/// Weeks run from Sunday to Saturday, and every week between the first and the last entry is returned, even empty ones.
pub fn group_by_week(entries: &[AgendaEntry]) -> Vec<WeekGroup> {
    let (first, last) = match (entries.iter().map(|e| e.date()).min(), entries.iter().map(|e| e.date()).max()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Vec::new(),
    };

    let mut weeks = Vec::new();
    let mut start = week_start(first);
    while start <= last {
        let end = start + Duration::days(6);
        let week_entries = entries.iter()
            .filter(|e| e.date() >= start && e.date() <= end)
            .cloned()
            .collect();
        weeks.push(WeekGroup { start, end, entries: week_entries });
        start = start + Duration::days(7);
    }
    weeks
}

/// The Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}


/// The next assignments, exams and projects due today or later.
///
/// Unlike the task list, item kinds are matched regardless of case here (`Exam` is a deadline).
pub fn upcoming_deadlines(entries: &[AgendaEntry], today: NaiveDate, limit: usize) -> Vec<AgendaEntry> {
    let mut deadlines: Vec<AgendaEntry> = entries.iter()
        .filter(|e| e.date() >= today)
        .filter(|e| match TaskCategory::from_name(&e.item.kind().as_str().to_lowercase()) {
            Some(cat) => DEADLINE_CATEGORIES.contains(&cat),
            None => false,
        })
        .cloned()
        .collect();
    deadlines.sort_by_key(|e| e.date());
    deadlines.truncate(limit);
    deadlines
}

/// The first day after `today` that is not a Saturday nor a Sunday
pub fn next_working_day(today: NaiveDate) -> NaiveDate {
    let mut day = today + Duration::days(1);
    while day.weekday() == Weekday::Sat || day.weekday() == Weekday::Sun {
        day = day + Duration::days(1);
    }
    day
}

/// The entries of the next working day, sorted by time of day.
/// Entries without a (parsable) time come first.
pub fn next_working_day_entries(entries: &[AgendaEntry], today: NaiveDate) -> (NaiveDate, Vec<AgendaEntry>) {
    let day = next_working_day(today);
    let mut found: Vec<AgendaEntry> = entries.iter()
        .filter(|e| e.date() == day)
        .cloned()
        .collect();
    found.sort_by_key(|e| e.item.time().and_then(parse_time_of_day));
    (day, found)
}

/// Parse a time such as `14:30`, `2:30 PM` or `2:30PM`
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"].iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

/// A human-readable delay until `date`
pub fn days_until_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        n if n < 0 => "Overdue".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        n => format!("{} days", n),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn courses() -> Vec<Course> {
        vec![
            Course::new("Chemistry".to_string(), String::new(), None, Map::new(), Map::new(), vec![
                ScheduleItem::new(day(2026, 11, 3), TaskCategory::Exam, "Midterm".to_string(), None),
                ScheduleItem::new(day(2026, 10, 19), "lecture".to_string(), "Acids".to_string(), None)
                    .with_time("2:00 PM".to_string()),
                ScheduleItem::new(day(2026, 10, 19), TaskCategory::Quiz, "Bases".to_string(), None)
                    .with_time("09:15".to_string()),
            ]),
            Course::new("Drama".to_string(), String::new(), None, Map::new(), Map::new(), vec![
                ScheduleItem::new(day(2026, 10, 21), TaskCategory::Project, "Play".to_string(), None),
                ScheduleItem::new(day(2026, 10, 10), TaskCategory::Assignment, "Script".to_string(), None),
            ]),
        ]
    }

    #[test]
    fn entries_are_sorted_by_date() {
        let entries = all_entries(&courses());
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].course_name, "Drama");
    }

    #[test]
    fn months() {
        let months = group_by_month(&all_entries(&courses()));
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label(), "October 2026");
        assert_eq!(months[0].entries.len(), 4);
        assert_eq!(months[1].label(), "November 2026");

        let days = months[0].by_day();
        assert_eq!(days.keys().copied().collect::<Vec<_>>(), vec![10, 19, 21]);
        assert_eq!(days[&19].len(), 2);
    }

    #[test]
    fn weeks_cover_sunday_to_saturday() {
        let weeks = group_by_week(&all_entries(&courses()));
        // 2026-10-10 is a Saturday, 2026-11-03 is a Tuesday
        assert_eq!(weeks.first().map(|w| w.start), Some(day(2026, 10, 4)));
        assert_eq!(weeks.last().map(|w| w.end), Some(day(2026, 11, 7)));
        assert_eq!(weeks.len(), 5);
        // The week of Oct 25 has no entry, but is listed anyway
        assert!(weeks[3].entries.is_empty());
        assert_eq!(weeks[0].label(), "Oct 4 - Oct 10, 2026");
        assert!(group_by_week(&[]).is_empty());
    }

    #[test]
    fn deadlines() {
        let entries = all_entries(&courses());
        let found = upcoming_deadlines(&entries, day(2026, 10, 18), 5);
        let titles: Vec<&str> = found.iter().map(|e| e.item.title()).collect();
        // Quizzes and lectures are not deadlines, and past items are ignored
        assert_eq!(titles, vec!["Play", "Midterm"]);
        assert_eq!(upcoming_deadlines(&entries, day(2026, 10, 18), 1).len(), 1);
    }

    #[test]
    fn deadline_kinds_ignore_case() {
        let course = Course::new("History".to_string(), String::new(), None, Map::new(), Map::new(), vec![
            ScheduleItem::new(day(2026, 10, 22), "Exam".to_string(), "Revolutions".to_string(), None),
            ScheduleItem::new(day(2026, 10, 23), "QUIZ".to_string(), "Dates".to_string(), None),
        ]);
        let entries = all_entries(&[course]);
        let found = upcoming_deadlines(&entries, day(2026, 10, 18), 5);
        let titles: Vec<&str> = found.iter().map(|e| e.item.title()).collect();
        assert_eq!(titles, vec!["Revolutions"]);
    }

    #[test]
    fn next_working_day_skips_weekends() {
        // Friday -> Monday
        assert_eq!(next_working_day(day(2026, 10, 16)), day(2026, 10, 19));
        // Saturday -> Monday
        assert_eq!(next_working_day(day(2026, 10, 17)), day(2026, 10, 19));
        // Monday -> Tuesday
        assert_eq!(next_working_day(day(2026, 10, 19)), day(2026, 10, 20));

        let (date, found) = next_working_day_entries(&all_entries(&courses()), day(2026, 10, 16));
        assert_eq!(date, day(2026, 10, 19));
        let titles: Vec<&str> = found.iter().map(|e| e.item.title()).collect();
        assert_eq!(titles, vec!["Bases", "Acids"]);
    }

    #[test]
    fn labels() {
        let today = day(2026, 10, 18);
        assert_eq!(days_until_label(day(2026, 10, 17), today), "Overdue");
        assert_eq!(days_until_label(today, today), "Today");
        assert_eq!(days_until_label(day(2026, 10, 19), today), "Tomorrow");
        assert_eq!(days_until_label(day(2026, 10, 25), today), "7 days");
        assert_eq!(parse_time_of_day("14:30"), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_time_of_day("2:30 PM"), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_time_of_day("soon"), None);
    }
}
