//! Thread history list
//!
//! Threads grouped under relative date headers, newest first.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use gpui::prelude::*;
use gpui::*;

use crate::api::types::ThreadSummary;
use crate::app::AppRoot;
use crate::i18n::I18n;
use crate::state::AppState;
use crate::theme::Theme;

/// Relative date bucket of a thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateGroup {
    Today,
    Yesterday,
    Previous7Days,
    Previous30Days,
    /// Older threads, labeled by month, e.g. "March 2024"
    Month(String),
    /// Creation time could not be parsed
    Undated,
}

impl DateGroup {
    pub fn for_date(date: NaiveDate, today: NaiveDate) -> Self {
        let days = (today - date).num_days();
        match days {
            i64::MIN..=0 => DateGroup::Today,
            1 => DateGroup::Yesterday,
            2..=7 => DateGroup::Previous7Days,
            8..=30 => DateGroup::Previous30Days,
            _ => DateGroup::Month(date.format("%B %Y").to_string()),
        }
    }

    pub fn label(&self, i18n: &I18n) -> String {
        match self {
            DateGroup::Today => i18n.t("threads.today"),
            DateGroup::Yesterday => i18n.t("threads.yesterday"),
            DateGroup::Previous7Days => i18n.t("threads.previous_7_days"),
            DateGroup::Previous30Days => i18n.t("threads.previous_30_days"),
            DateGroup::Month(month) => month.clone(),
            DateGroup::Undated => i18n.t("threads.older"),
        }
    }
}

/// Local wall-clock time a thread was created at
pub fn local_created_at(thread: &ThreadSummary) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(&thread.created_at)
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

/// Sort threads newest first and split them into date groups
pub fn group_by_date<'a>(
    threads: Vec<&'a ThreadSummary>,
    today: NaiveDate,
    created_at: impl Fn(&ThreadSummary) -> Option<NaiveDateTime>,
) -> Vec<(DateGroup, Vec<&'a ThreadSummary>)> {
    let mut dated: Vec<(Option<NaiveDateTime>, &ThreadSummary)> =
        threads.into_iter().map(|t| (created_at(t), t)).collect();
    // Newest first, undated last
    dated.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut groups: Vec<(DateGroup, Vec<&ThreadSummary>)> = Vec::new();
    for (date, thread) in dated {
        let group = match date {
            Some(created) => DateGroup::for_date(created.date(), today),
            None => DateGroup::Undated,
        };
        match groups.last_mut() {
            Some((last, members)) if *last == group => members.push(thread),
            _ => groups.push((group, vec![thread])),
        }
    }
    groups
}

/// Thread history rendering functions
pub struct ThreadHistory;

impl ThreadHistory {
    pub fn render_inline(cx: &mut Context<AppRoot>) -> impl IntoElement {
        let state = cx.global::<AppState>();
        let theme = cx.global::<Theme>();
        let i18n = cx.global::<I18n>();

        if state.threads_loading {
            return div()
                .px(px(12.0))
                .py(px(8.0))
                .text_sm()
                .text_color(theme.text_muted)
                .child(i18n.t("threads.loading"))
                .into_any_element();
        }

        if state.threads.is_empty() {
            return div()
                .px(px(12.0))
                .py(px(8.0))
                .text_sm()
                .text_color(theme.text_muted)
                .child(i18n.t("threads.empty"))
                .into_any_element();
        }

        let today = Local::now().date_naive();
        let groups: Vec<(String, Vec<(String, String, bool)>)> =
            group_by_date(state.threads.iter().collect(), today, local_created_at)
                .into_iter()
                .map(|(group, threads)| {
                    let rows = threads
                        .into_iter()
                        .map(|t| {
                            let title = t.name.clone().unwrap_or_else(|| i18n.t("threads.untitled"));
                            let active = state.active_thread_id.as_deref() == Some(t.id.as_str());
                            (t.id.clone(), title, active)
                        })
                        .collect();
                    (group.label(i18n), rows)
                })
                .collect();

        let text_muted = theme.text_muted;
        let hover_bg = theme.background_element;
        let active_bg = theme.primary.opacity(0.15);

        div()
            .flex()
            .flex_col()
            .gap(px(12.0))
            .px(px(8.0))
            .py(px(4.0))
            .children(groups.into_iter().map(|(label, rows)| {
                div()
                    .flex()
                    .flex_col()
                    .gap(px(2.0))
                    .child(
                        div()
                            .px(px(8.0))
                            .py(px(4.0))
                            .text_xs()
                            .font_weight(FontWeight::MEDIUM)
                            .text_color(text_muted)
                            .child(label),
                    )
                    .children(rows.into_iter().map(|(thread_id, title, active)| {
                        let id_for_click = thread_id.clone();
                        let id_for_delete = thread_id.clone();
                        let group_name = SharedString::from(format!("thread-row-{}", thread_id));
                        div()
                            .id(SharedString::from(format!("thread-{}", thread_id)))
                            .group(group_name.clone())
                            .px(px(8.0))
                            .py(px(6.0))
                            .rounded(px(6.0))
                            .flex()
                            .items_center()
                            .justify_between()
                            .gap(px(4.0))
                            .when(active, |el| el.bg(active_bg))
                            .cursor_pointer()
                            .hover(move |style| style.bg(hover_bg))
                            .on_click(cx.listener(move |this, _event, _window, cx| {
                                this.select_thread(id_for_click.clone(), cx);
                            }))
                            .child(div().flex_1().text_sm().text_ellipsis().child(title))
                            .child(
                                div()
                                    .id(SharedString::from(format!("delete-thread-{}", thread_id)))
                                    .px(px(4.0))
                                    .text_xs()
                                    .text_color(text_muted)
                                    .invisible()
                                    .group_hover(group_name, |style| style.visible())
                                    .on_click(cx.listener(move |this, _event, _window, cx| {
                                        cx.stop_propagation();
                                        this.delete_thread(id_for_delete.clone(), cx);
                                    }))
                                    .child("×"),
                            )
                    }))
            }))
            .into_any_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::prelude::v1::test;

    fn thread(id: &str, created_at: &str) -> ThreadSummary {
        ThreadSummary {
            id: id.to_string(),
            name: None,
            created_at: created_at.to_string(),
        }
    }

    fn utc_created_at(thread: &ThreadSummary) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(&thread.created_at)
            .ok()
            .map(|dt| dt.naive_utc())
    }

    fn ids<'a>(groups: Vec<(DateGroup, Vec<&'a ThreadSummary>)>) -> Vec<(DateGroup, Vec<&'a str>)> {
        groups
            .into_iter()
            .map(|(g, ts)| (g, ts.into_iter().map(|t| t.id.as_str()).collect()))
            .collect()
    }

    #[test]
    fn buckets_by_age() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        assert_eq!(DateGroup::for_date(today, today), DateGroup::Today);
        assert_eq!(DateGroup::for_date(day(16), today), DateGroup::Today);
        assert_eq!(DateGroup::for_date(day(14), today), DateGroup::Yesterday);
        assert_eq!(DateGroup::for_date(day(8), today), DateGroup::Previous7Days);
        assert_eq!(DateGroup::for_date(day(1), today), DateGroup::Previous30Days);
        assert_eq!(
            DateGroup::for_date(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), today),
            DateGroup::Month("March 2024".to_string())
        );
    }

    #[test]
    fn groups_sorted_newest_first() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let threads = vec![
            thread("old", "2024-01-10T09:00:00Z"),
            thread("broken", "yesterday-ish"),
            thread("today-1", "2024-06-15T08:00:00Z"),
            thread("yday", "2024-06-14T22:00:00Z"),
            thread("today-2", "2024-06-15T07:00:00Z"),
        ];

        let groups = group_by_date(threads.iter().collect(), today, utc_created_at);

        assert_eq!(
            ids(groups),
            vec![
                (DateGroup::Today, vec!["today-1", "today-2"]),
                (DateGroup::Yesterday, vec!["yday"]),
                (DateGroup::Month("January 2024".to_string()), vec!["old"]),
                (DateGroup::Undated, vec!["broken"]),
            ]
        );
    }

    #[test]
    fn same_day_threads_ordered_by_time() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let threads = vec![
            thread("morning", "2024-06-15T07:00:00Z"),
            thread("evening", "2024-06-15T19:30:00Z"),
            thread("noon", "2024-06-15T12:00:00Z"),
        ];

        let groups = group_by_date(threads.iter().collect(), today, utc_created_at);

        assert_eq!(
            ids(groups),
            vec![(DateGroup::Today, vec!["evening", "noon", "morning"])]
        );
    }
}
