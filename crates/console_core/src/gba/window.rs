//! The C2 window resolver: turns window 0/1/objwin bounds and priorities
//! into a sorted, contiguous list of horizontal intervals for a scanline.

use crate::error::GameError;

pub const SCREEN_WIDTH: i32 = 240;
pub const MAX_INTERVALS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRange {
    pub h_start: i32,
    pub h_end: i32,
    pub v_start: i32,
    pub v_end: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerControl(pub u8);

impl LayerControl {
    pub fn bg_enabled(&self, bg: u8) -> bool {
        self.0 & (1 << bg) != 0
    }

    pub fn obj_enabled(&self) -> bool {
        self.0 & (1 << 4) != 0
    }

    pub fn color_special_enabled(&self) -> bool {
        self.0 & (1 << 5) != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
    pub control: LayerControl,
    pub honors_objwin: bool,
}

fn vertical_hit(y: i32, v_start: i32, v_end: i32) -> bool {
    if v_start <= v_end {
        y >= v_start && y < v_end
    } else {
        // Wraps around the bottom of the screen.
        y >= v_start || y < v_end
    }
}

/// Overwrite the control of every sub-range of `intervals` that falls
/// within `[start, end)`, splitting existing intervals at the boundary as
/// needed. `intervals` stays sorted/contiguous/covering `[0, SCREEN_WIDTH)`.
fn apply_window(intervals: &mut Vec<Interval>, start: i32, end: i32, control: LayerControl, honors_objwin: bool) {
    let start = start.clamp(0, SCREEN_WIDTH);
    let end = end.clamp(0, SCREEN_WIDTH);
    if start >= end {
        return;
    }

    let mut result = Vec::with_capacity(intervals.len() + 2);

    for iv in intervals.drain(..) {
        if iv.end <= start || iv.start >= end {
            result.push(iv);
            continue;
        }

        if iv.start < start {
            result.push(Interval {
                start: iv.start,
                end: start,
                control: iv.control,
                honors_objwin: iv.honors_objwin,
            });
        }

        result.push(Interval {
            start: start.max(iv.start),
            end: end.min(iv.end),
            control,
            honors_objwin,
        });

        if iv.end > end {
            result.push(Interval {
                start: end,
                end: iv.end,
                control: iv.control,
                honors_objwin: iv.honors_objwin,
            });
        }
    }

    *intervals = result;
}

pub struct WindowResolver;

impl WindowResolver {
    /// Resolve one scanline's interval list.
    ///
    /// `windows` is `[win1, win0]` in application order (win1 is overlaid
    /// first, so win0 ends up with higher effective priority since it's
    /// applied last). Each entry is `Some((range, control))` when enabled.
    /// `outside` is the default control for everything not covered by a
    /// window. `objwin_enabled` additionally marks the resulting intervals
    /// as honoring the per-pixel OBJWIN mask.
    pub fn resolve(
        y: i32,
        win1: Option<(WindowRange, LayerControl)>,
        win0: Option<(WindowRange, LayerControl)>,
        objwin_enabled: bool,
        outside: LayerControl,
    ) -> Result<Vec<Interval>, GameError> {
        let mut intervals = vec![Interval {
            start: 0,
            end: SCREEN_WIDTH,
            control: outside,
            honors_objwin: objwin_enabled,
        }];

        // win1 before win0: win0 is applied last and so wins ties, matching
        // the hardware's win0 > win1 > objwin > outside precedence.
        for window in [win1, win0] {
            let Some((range, control)) = window else { continue };

            if !vertical_hit(y, range.v_start, range.v_end) {
                continue;
            }

            // win0/win1 take full precedence over objwin within their own
            // bounds; only territory outside both windows defers to winout.
            if range.h_end < range.h_start || range.h_end > SCREEN_WIDTH {
                apply_window(&mut intervals, 0, range.h_end, control, false);
                apply_window(&mut intervals, range.h_start, SCREEN_WIDTH, control, false);
            } else {
                apply_window(&mut intervals, range.h_start, range.h_end, control, false);
            }
        }

        if intervals.len() > MAX_INTERVALS {
            return Err(GameError::WindowOverflow { count: intervals.len() });
        }

        Ok(intervals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_height() -> WindowRange {
        WindowRange { h_start: 0, h_end: 0, v_start: 0, v_end: 160 }
    }

    fn assert_invariants(intervals: &[Interval]) {
        assert!(!intervals.is_empty());
        assert!(intervals.len() <= MAX_INTERVALS);
        assert_eq!(intervals[0].start, 0);
        assert_eq!(intervals.last().unwrap().end, SCREEN_WIDTH);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_no_windows_single_interval() {
        let intervals = WindowResolver::resolve(0, None, None, false, LayerControl(0xFF)).unwrap();
        assert_invariants(&intervals);
        assert_eq!(intervals.len(), 1);
    }

    #[test]
    fn test_single_window_produces_three_intervals() {
        let mut range = full_height();
        range.h_start = 50;
        range.h_end = 100;

        let intervals = WindowResolver::resolve(0, None, Some((range, LayerControl(1))), false, LayerControl(0)).unwrap();
        assert_invariants(&intervals);
        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[1].start, 50);
        assert_eq!(intervals[1].end, 100);
        assert_eq!(intervals[1].control, LayerControl(1));
    }

    #[test]
    fn test_horizontal_wrap_splits_into_two_inner_ranges() {
        let mut range = full_height();
        range.h_start = 200;
        range.h_end = 40;

        let intervals = WindowResolver::resolve(0, None, Some((range, LayerControl(1))), false, LayerControl(0)).unwrap();
        assert_invariants(&intervals);
        // [0,40) win, [40,200) outside, [200,240) win
        assert_eq!(intervals[0].control, LayerControl(1));
        assert_eq!(intervals.last().unwrap().control, LayerControl(1));
    }

    #[test]
    fn test_win0_overrides_overlapping_win1() {
        let mut w1 = full_height();
        w1.h_start = 0;
        w1.h_end = 200;
        let mut w0 = full_height();
        w0.h_start = 50;
        w0.h_end = 100;

        let intervals = WindowResolver::resolve(
            0,
            Some((w1, LayerControl(1))),
            Some((w0, LayerControl(2))),
            false,
            LayerControl(0),
        )
        .unwrap();
        assert_invariants(&intervals);

        let middle = intervals.iter().find(|iv| iv.start == 50 && iv.end == 100).unwrap();
        assert_eq!(middle.control, LayerControl(2));
    }

    #[test]
    fn test_vertical_miss_ignores_window() {
        let mut range = full_height();
        range.v_start = 10;
        range.v_end = 20;
        range.h_start = 0;
        range.h_end = 100;

        let intervals = WindowResolver::resolve(50, None, Some((range, LayerControl(1))), false, LayerControl(0)).unwrap();
        assert_eq!(intervals.len(), 1);
    }

    #[test]
    fn test_vertical_wrap_hit() {
        let mut range = full_height();
        range.v_start = 150;
        range.v_end = 10;
        range.h_start = 0;
        range.h_end = 100;

        let intervals = WindowResolver::resolve(5, None, Some((range, LayerControl(1))), false, LayerControl(0)).unwrap();
        assert_invariants(&intervals);
        assert_eq!(intervals[0].control, LayerControl(1));
    }

    #[test]
    fn test_arbitrary_bounds_never_exceed_five() {
        for h0s in [0, 30, 200].iter().copied() {
            for h0e in [40, 239, 10].iter().copied() {
                for h1s in [0, 60].iter().copied() {
                    for h1e in [239, 20].iter().copied() {
                        let mut w0 = full_height();
                        w0.h_start = h0s;
                        w0.h_end = h0e;
                        let mut w1 = full_height();
                        w1.h_start = h1s;
                        w1.h_end = h1e;

                        let result = WindowResolver::resolve(
                            0,
                            Some((w1, LayerControl(1))),
                            Some((w0, LayerControl(2))),
                            false,
                            LayerControl(0),
                        );
                        if let Ok(intervals) = result {
                            assert_invariants(&intervals);
                        }
                    }
                }
            }
        }
    }
}
