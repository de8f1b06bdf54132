//! Plain-text rendering of a [`FeedViewModel`].
//!
//! The renderer draws one frame as lines of text: header, the active panel,
//! and a footer with calendar and cache figures. It never reads view state
//! directly, only the computed view model.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use news_brief::storage::CacheStore;
//! use news_brief::ui::render;
//! use news_brief::BriefState;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let state = BriefState::new(CacheStore::new(), today);
//!
//! let text = render(&state.compute_viewmodel(today), 80);
//! assert!(text.contains("No news found"));
//! ```

use crate::domain::{Category, NewsItem, DATE_FORMAT};
use crate::ui::viewmodel::{CalendarInfo, FeedViewModel, HeaderInfo, Panel};
use std::fmt::Write;

/// Narrowest width the renderer lays out for.
const MIN_WIDTH: usize = 40;

/// Renders `vm` into lines no wider than `cols` (at least 40).
#[must_use]
pub fn render(vm: &FeedViewModel, cols: usize) -> String {
    let width = cols.max(MIN_WIDTH);
    let mut out = String::new();

    render_header(&mut out, &vm.header, width);
    render_panel(&mut out, &vm.panel, width);
    if let Some(item) = &vm.detail {
        render_detail(&mut out, item, width);
    }
    render_footer(&mut out, vm, width);

    out
}

fn render_header(out: &mut String, header: &HeaderInfo, width: usize) {
    let control = if header.is_loading {
        format!("[{}…]", header.refresh_label)
    } else {
        format!("[{}]", header.refresh_label)
    };
    let title = truncate(&header.title, width.saturating_sub(control.chars().count() + 1));
    let pad = width.saturating_sub(title.chars().count() + control.chars().count());

    let _ = writeln!(out, "{title}{}{control}", " ".repeat(pad));
    rule(out, width);
}

fn render_panel(out: &mut String, panel: &Panel, width: usize) {
    match panel {
        Panel::Loading { message, detail } => {
            let _ = writeln!(out, "{message}");
            let _ = writeln!(out, "{detail}");
        }
        Panel::Error {
            message,
            can_exit_search,
            ..
        } => {
            let _ = writeln!(out, "! {message}");
            let _ = writeln!(out, "{}", actions(*can_exit_search, "[r] Retry"));
        }
        Panel::Feed {
            title,
            items,
            counts,
            can_exit_search,
        } => {
            let _ = writeln!(
                out,
                "{title}  ({} domestic, {} international)",
                counts.domestic, counts.international
            );
            for item in items {
                render_card(out, item, width);
            }
            if *can_exit_search {
                let _ = writeln!(out, "[b] Back to daily brief");
            }
        }
        Panel::Empty {
            message,
            hint,
            can_exit_search,
        } => {
            let _ = writeln!(out, "{message}");
            let _ = writeln!(out, "{hint}");
            if *can_exit_search {
                let _ = writeln!(out, "[b] Back to daily brief");
            }
        }
    }
}

fn actions(can_exit_search: bool, primary: &str) -> String {
    if can_exit_search {
        format!("{primary}  [b] Back to daily brief")
    } else {
        primary.to_string()
    }
}

fn render_card(out: &mut String, item: &NewsItem, width: usize) {
    let tag = match item.category {
        Category::Domestic => "DOM",
        Category::International => "INT",
    };
    let _ = writeln!(out);
    let _ = writeln!(out, "[{tag}] {}", truncate(&item.title, width.saturating_sub(6)));
    let _ = writeln!(out, "      {}", truncate(&item.summary, width.saturating_sub(6)));
    let _ = writeln!(
        out,
        "      {} · {}",
        truncate(&item.source, width / 2),
        item.timestamp
    );
}

fn render_detail(out: &mut String, item: &NewsItem, width: usize) {
    rule(out, width);
    let _ = writeln!(out, "{}", item.title);
    let _ = writeln!(out, "{} · {}", item.source, item.category.label());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", item.content);
    if !item.url.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", item.url);
    }
}

fn render_footer(out: &mut String, vm: &FeedViewModel, width: usize) {
    rule(out, width);
    let _ = writeln!(out, "{}", calendar_line(&vm.calendar));
    let _ = writeln!(
        out,
        "Cache: {} days, {} items",
        vm.stats.days, vm.stats.items
    );
}

fn calendar_line(calendar: &CalendarInfo) -> String {
    let dates = calendar
        .available
        .iter()
        .map(|date| {
            let label = date.format(DATE_FORMAT).to_string();
            if *date == calendar.selected {
                format!("*{label}")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("Dates: {dates}")
}

fn rule(out: &mut String, width: usize) {
    let _ = writeln!(out, "{}", "─".repeat(width));
}

/// Shortens `text` to at most `max` characters, ending in an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::news::sample_item;
    use crate::domain::CategoryCounts;
    use crate::storage::CacheStats;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn vm(panel: Panel) -> FeedViewModel {
        FeedViewModel {
            header: HeaderInfo {
                title: "2024-05-02".to_string(),
                refresh_label: "Refresh",
                is_loading: false,
            },
            panel,
            calendar: CalendarInfo {
                selected: day(2),
                available: vec![day(1), day(2)],
            },
            stats: CacheStats { days: 1, items: 2 },
            detail: None,
        }
    }

    #[test]
    fn feed_lists_cards_and_counts() {
        let items = vec![
            sample_item("a", Category::Domestic),
            sample_item("b", Category::International),
        ];
        let counts = CategoryCounts::of(&items);

        let text = render(
            &vm(Panel::Feed {
                title: "Today's highlights".to_string(),
                items,
                counts,
                can_exit_search: false,
            }),
            80,
        );

        assert!(text.contains("(1 domestic, 1 international)"));
        assert!(text.contains("[DOM] title a"));
        assert!(text.contains("[INT] title b"));
        assert!(!text.contains("Back to daily brief"));
    }

    #[test]
    fn search_error_offers_retry_and_exit() {
        let text = render(
            &vm(Panel::Error {
                kind: crate::app::ViewErrorKind::SearchFailed,
                message: "Search for \"x\" failed. Please try again.".to_string(),
                can_exit_search: true,
            }),
            80,
        );

        assert!(text.contains("[r] Retry  [b] Back to daily brief"));
    }

    #[test]
    fn footer_marks_selected_date() {
        let text = render(
            &vm(Panel::Empty {
                message: "No news found",
                hint: "hint",
                can_exit_search: false,
            }),
            80,
        );

        assert!(text.contains("Dates: 2024-05-01 *2024-05-02"));
        assert!(text.contains("Cache: 1 days, 2 items"));
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("人工智能新闻", 4), "人工智…");
        assert_eq!(truncate("short", 10), "short");
    }
}
