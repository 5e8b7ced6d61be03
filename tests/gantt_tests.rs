use approx::assert_relative_eq;
use chrono::NaiveDate;
use ticket_chart::core::primitives::date_wall_clock_seconds;
use ticket_chart::core::{
    GanttItem, GanttLayout, LinearScale, Scale, VisibleWindow, clip_interval, gantt_bars,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

fn february() -> VisibleWindow {
    VisibleWindow::from_dates(date(2, 1), date(2, 28))
}

/// 27 days across 270 px, ten pixels per day.
fn february_scale() -> Scale {
    let window = february();
    LinearScale::new((window.start, window.end), (0.0, 270.0)).into()
}

#[test]
fn item_spanning_the_window_is_clipped_to_it_exactly() {
    let window = february();
    let items = [GanttItem::from_dates("migration", date(1, 10), Some(date(3, 1)))];
    let bars = gantt_bars(
        &items,
        window,
        date_wall_clock_seconds(date(2, 15)),
        &february_scale(),
        GanttLayout::default(),
    );

    assert_eq!(bars.len(), 1);
    let bar = &bars[0];
    assert_eq!(bar.clipped_start, window.start);
    assert_eq!(bar.clipped_end, window.end);
    assert!(bar.clipped_left);
    assert!(bar.clipped_right);
    assert!(!bar.ongoing);
    assert_eq!(bar.x, 0.0);
    assert_eq!(bar.width, 270.0);
}

#[test]
fn items_outside_the_window_produce_no_bar() {
    let items = [
        GanttItem::from_dates("january", date(1, 1), Some(date(1, 20))),
        GanttItem::from_dates("march", date(3, 2), Some(date(3, 9))),
    ];
    let bars = gantt_bars(
        &items,
        february(),
        date_wall_clock_seconds(date(2, 15)),
        &february_scale(),
        GanttLayout::default(),
    );
    assert!(bars.is_empty());
}

#[test]
fn items_touching_a_window_edge_produce_no_bar() {
    let window = february();
    let items = [
        GanttItem::from_dates("ended at start", date(1, 10), Some(date(2, 1))),
        GanttItem::from_dates("starts at end", date(2, 28), Some(date(3, 10))),
        GanttItem::from_dates("instant at start", date(2, 1), Some(date(2, 1))),
    ];
    let bars = gantt_bars(
        &items,
        window,
        date_wall_clock_seconds(date(2, 15)),
        &february_scale(),
        GanttLayout::default(),
    );
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].item_index, 2);
    assert_eq!(bars[0].width, 2.0);

    assert_eq!(clip_interval(window.start - 10.0, window.start, window), None);
    assert_eq!(
        clip_interval(window.start, window.start, window),
        Some((window.start, window.start))
    );
}

#[test]
fn ongoing_items_run_until_now() {
    let items = [
        GanttItem::from_dates("done early", date(1, 1), Some(date(1, 5))),
        GanttItem::from_dates("open", date(2, 20), None),
    ];
    let bars = gantt_bars(
        &items,
        february(),
        date_wall_clock_seconds(date(2, 25)),
        &february_scale(),
        GanttLayout::default(),
    );

    assert_eq!(bars.len(), 1);
    let bar = &bars[0];
    assert_eq!(bar.item_index, 1);
    assert_eq!(bar.row, 0);
    assert!(bar.ongoing);
    assert!(!bar.clipped_right);
    assert_eq!(bar.clipped_end, date_wall_clock_seconds(date(2, 25)));
    assert_relative_eq!(bar.x, 190.0, epsilon = 1e-9);
    assert_relative_eq!(bar.width, 50.0, epsilon = 1e-9);
}

#[test]
fn ongoing_items_past_the_window_are_clipped_right() {
    let items = [GanttItem::from_dates("open", date(2, 20), None)];
    let bars = gantt_bars(
        &items,
        february(),
        date_wall_clock_seconds(date(3, 10)),
        &february_scale(),
        GanttLayout::default(),
    );
    assert!(bars[0].clipped_right);
    assert_eq!(bars[0].clipped_end, february().end);
}

#[test]
fn visible_bars_take_consecutive_rows() {
    let items = [
        GanttItem::from_dates("a", date(2, 2), Some(date(2, 4))),
        GanttItem::from_dates("skipped", date(1, 2), Some(date(1, 4))),
        GanttItem::from_dates("b", date(2, 6), Some(date(2, 8))),
    ];
    let layout = GanttLayout::default();
    let bars = gantt_bars(
        &items,
        february(),
        date_wall_clock_seconds(date(2, 15)),
        &february_scale(),
        layout,
    );

    let rows: Vec<(usize, usize)> = bars.iter().map(|bar| (bar.item_index, bar.row)).collect();
    assert_eq!(rows, vec![(0, 0), (2, 1)]);
    assert_eq!(bars[0].y, 25.0);
    assert_eq!(bars[1].y, 53.0);
    assert_eq!(bars[1].height, layout.bar_height);
    assert!(bars[1].contains(bars[1].x + 1.0, bars[1].y + 1.0));
    assert!(!bars[1].contains(bars[1].x + 1.0, bars[0].y));
}

#[test]
fn zero_length_items_keep_a_minimum_width() {
    let items = [GanttItem::from_dates("same day", date(2, 10), Some(date(2, 10)))];
    let bars = gantt_bars(
        &items,
        february(),
        date_wall_clock_seconds(date(2, 15)),
        &february_scale(),
        GanttLayout::default(),
    );
    assert_eq!(bars[0].width, 2.0);
}

#[test]
fn reversed_or_non_finite_intervals_are_omitted() {
    let window = february();
    assert_eq!(clip_interval(window.end, window.start, window), None);
    assert_eq!(clip_interval(f64::NAN, window.end, window), None);
    assert_eq!(
        clip_interval(window.start - 10.0, window.start + 10.0, window),
        Some((window.start, window.start + 10.0))
    );
}

#[test]
fn window_orders_its_ends() {
    let forward = VisibleWindow::new(10.0, 20.0);
    assert_eq!(VisibleWindow::new(20.0, 10.0), forward);
    assert!(forward.is_valid());
    let broken = VisibleWindow {
        start: f64::NAN,
        end: 1.0,
    };
    assert!(!broken.is_valid());
}
