//! Server-side pagination footer.
//!
//! [`PageWindow`] is the arithmetic (label, button state, page numbers) and
//! [`Pagination`] renders it. Pages keep the index and size in signals and
//! reset the index to 0 whenever search, a filter or the size changes.

use dioxus::prelude::*;
use helpdesk_api::models::Page;

use crate::icons::{FaChevronLeft, FaChevronRight};
use crate::Icon;

pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// How many numbered buttons to show around the current page.
const NUMBER_SPAN: u32 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based.
    pub index: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub rows: u32,
}

impl PageWindow {
    pub fn of<T>(page: &Page<T>, index: u32, size: u32) -> Self {
        let total_pages = if page.total_pages > 0 || size == 0 {
            page.total_pages
        } else {
            page.total_elements.div_ceil(u64::from(size)) as u32
        };
        Self {
            index,
            size,
            total_elements: page.total_elements,
            total_pages,
            rows: page.data.len() as u32,
        }
    }

    pub fn label(&self) -> String {
        if self.total_elements == 0 || self.rows == 0 {
            return format!("Showing 0 to 0 of {} entries", self.total_elements);
        }
        let offset = u64::from(self.index) * u64::from(self.size);
        let first = offset + 1;
        let last = (offset + u64::from(self.rows)).min(self.total_elements);
        format!("Showing {first} to {last} of {} entries", self.total_elements)
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }

    /// Zero-based page numbers to offer as buttons, centred on the current one.
    pub fn numbers(&self) -> Vec<u32> {
        if self.total_pages == 0 {
            return Vec::new();
        }
        let span = NUMBER_SPAN.min(self.total_pages);
        let start = self
            .index
            .saturating_sub(span / 2)
            .min(self.total_pages - span);
        (start..start + span).collect()
    }
}

#[component]
pub fn Pagination(
    window: PageWindow,
    on_page: EventHandler<u32>,
    on_size: EventHandler<u32>,
) -> Element {
    let current = window.index;

    rsx! {
        div {
            class: "pagination",
            div {
                class: "pagination-info",
                span { "{window.label()}" }
                label {
                    class: "pagination-size",
                    "Show "
                    select {
                        value: "{window.size}",
                        onchange: move |evt: FormEvent| {
                            if let Ok(size) = evt.value().parse::<u32>() {
                                on_size.call(size);
                            }
                        },
                        for size in PAGE_SIZES {
                            option { value: "{size}", selected: size == window.size, "{size}" }
                        }
                    }
                    " entries"
                }
            }
            div {
                class: "pagination-buttons",
                button {
                    class: "page-btn",
                    disabled: !window.has_previous(),
                    title: "Previous",
                    onclick: move |_| on_page.call(current.saturating_sub(1)),
                    Icon { icon: FaChevronLeft, width: 12, height: 12 }
                    " Previous"
                }
                for number in window.numbers() {
                    button {
                        key: "{number}",
                        class: if number == current { "page-btn active" } else { "page-btn" },
                        onclick: move |_| on_page.call(number),
                        "{number + 1}"
                    }
                }
                button {
                    class: "page-btn",
                    disabled: !window.has_next(),
                    title: "Next",
                    onclick: move |_| on_page.call(current + 1),
                    "Next "
                    Icon { icon: FaChevronRight, width: 12, height: 12 }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: usize, total: u64, pages: u32) -> Page<u32> {
        Page {
            data: vec![0; rows],
            total_elements: total,
            total_pages: pages,
            number: None,
            size: None,
        }
    }

    #[test]
    fn test_first_page_of_many() {
        let window = PageWindow::of(&page(10, 137, 14), 0, 10);
        assert_eq!(window.label(), "Showing 1 to 10 of 137 entries");
        assert!(window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn test_last_partial_page() {
        let window = PageWindow::of(&page(7, 137, 14), 13, 10);
        assert_eq!(window.label(), "Showing 131 to 137 of 137 entries");
        assert!(!window.has_next());
        assert!(window.has_previous());
    }

    #[test]
    fn test_empty_result() {
        let window = PageWindow::of(&page(0, 0, 0), 0, 25);
        assert_eq!(window.label(), "Showing 0 to 0 of 0 entries");
        assert!(!window.has_next());
        assert!(!window.has_previous());
        assert!(window.numbers().is_empty());
    }

    #[test]
    fn test_total_pages_derived_when_missing() {
        let window = PageWindow::of(&page(10, 137, 0), 0, 10);
        assert_eq!(window.total_pages, 14);
    }

    #[test]
    fn test_page_numbers_stay_in_range() {
        let mut window = PageWindow::of(&page(10, 137, 14), 0, 10);
        assert_eq!(window.numbers(), vec![0, 1, 2, 3, 4]);
        window.index = 7;
        assert_eq!(window.numbers(), vec![5, 6, 7, 8, 9]);
        window.index = 13;
        assert_eq!(window.numbers(), vec![9, 10, 11, 12, 13]);

        let short = PageWindow::of(&page(3, 13, 2), 1, 10);
        assert_eq!(short.numbers(), vec![0, 1]);
    }
}
