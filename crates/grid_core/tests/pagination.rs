use grid_core::pagination::is_selectable;
use grid_core::{calculate_total_pages, page_window, PageLink};
use pretty_assertions::assert_eq;

fn labels(pages: &[PageLink]) -> Vec<String> {
    pages.iter().map(|p| p.label.clone()).collect()
}

#[test]
fn total_pages_is_at_least_one() {
    assert_eq!(calculate_total_pages(0, 10), 1);
    assert_eq!(calculate_total_pages(25, 10), 3);
    assert_eq!(calculate_total_pages(30, 10), 3);
    assert_eq!(calculate_total_pages(31, 10), 4);
    assert_eq!(calculate_total_pages(5, 0), 5);
}

#[test]
fn without_max_size_every_page_is_linked() {
    let pages = page_window(2, 4, None);
    assert_eq!(labels(&pages), vec!["1", "2", "3", "4"]);
    assert_eq!(
        pages.iter().filter(|p| p.is_active).map(|p| p.number).collect::<Vec<_>>(),
        vec![2]
    );

    let pages = page_window(1, 3, Some(5));
    assert_eq!(labels(&pages), vec!["1", "2", "3"]);
}

#[test]
fn window_jumps_by_blocks() {
    let pages = page_window(1, 10, Some(3));
    assert_eq!(labels(&pages), vec!["1", "2", "3", "..."]);
    assert_eq!(pages[3].number, 4);

    let pages = page_window(5, 10, Some(3));
    assert_eq!(labels(&pages), vec!["...", "4", "5", "6", "..."]);
    assert_eq!(pages[0].number, 3);
    assert_eq!(pages[4].number, 7);
    assert!(pages[2].is_active);

    let pages = page_window(10, 10, Some(3));
    assert_eq!(labels(&pages), vec!["...", "10"]);
    assert_eq!(pages[0].number, 9);
    assert!(pages[0].is_ellipsis());
}

#[test]
fn window_size_matches_block_and_ellipses() {
    for total in 2..=20u32 {
        for max_size in 1..total {
            for current in 1..=total {
                let pages = page_window(current, total, Some(max_size));
                let numbered: Vec<_> = pages.iter().filter(|p| !p.is_ellipsis()).collect();
                let starts_at_one = numbered.first().map(|p| p.number) == Some(1);
                let ends_at_last = numbered.last().map(|p| p.number) == Some(total);
                let expected = numbered.len()
                    + usize::from(!starts_at_one)
                    + usize::from(!ends_at_last);
                assert_eq!(pages.len(), expected);
                assert!(numbered.len() <= max_size as usize);
                assert!(numbered.iter().any(|p| p.number == current && p.is_active));
            }
        }
    }
}

#[test]
fn out_of_range_total_is_clamped() {
    let pages = page_window(1, 0, Some(3));
    assert_eq!(labels(&pages), vec!["1"]);
}

#[test]
fn selection_rules() {
    assert!(is_selectable(2, 1, 3));
    assert!(!is_selectable(1, 1, 3));
    assert!(!is_selectable(0, 1, 3));
    assert!(!is_selectable(4, 1, 3));
}
