//! Highlight application: owns the set of applied marks and the deferred
//! scroll. Marks are cleared then rebuilt on every apply — never partially
//! updated — so a stale highlight cannot survive a failed follow-up search.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::types::{LocateResult, Position, TextRange};

/// Lines kept between the target and the top of the host container, so the
/// match sits below a sticky header.
const SCROLL_MARGIN_LINES: usize = 3;

/// Delays before scroll reattempts — layout can shift after the marks land.
const SCROLL_RETRY_DELAYS: [Duration; 2] =
    [Duration::from_millis(50), Duration::from_millis(200)];

/// What the engine needs from the text-editor widget. The real widget is
/// host-specific; tests use a recording fake.
pub trait EditorSurface {
    /// Create a persistent highlight mark over a range.
    fn add_mark(&mut self, range: &TextRange);
    /// Remove every mark previously created through this surface.
    fn clear_marks(&mut self);
    /// Move the caret without triggering the widget's own auto-scroll.
    fn set_caret(&mut self, position: Position);
    /// Scroll the host container (not the widget) so `line` sits `margin`
    /// lines below the top.
    fn scroll_to_line(&mut self, line: usize, margin: usize);
}

/// A pending scroll. The token ties it to the apply call that produced it;
/// a newer apply's plan supersedes any older one still waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPlan {
    /// Target line.
    pub line: usize,
    /// Lines of headroom above the target.
    pub margin: usize,
    /// Generation token of the apply call that scheduled this.
    pub token: u64,
}

/// Applies locate results to an editor surface. Exclusively owns the
/// applied-mark record — the only state that survives between locate calls.
#[derive(Debug, Default)]
pub struct HighlightApplier {
    applied: Vec<TextRange>,
    generation: u64,
}

impl HighlightApplier {
    /// A fresh applier with no marks applied.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Clear all previous marks, mark every range of the result, move the
    /// caret to the first range, and hand back the scroll plan for the
    /// deferred scroll — or `None` when there is nothing to scroll to.
    ///
    /// The clear happens unconditionally, before anything else: an empty
    /// result must still wipe the previous highlight.
    pub fn apply(
        &mut self,
        surface: &mut dyn EditorSurface,
        result: &LocateResult,
    ) -> Option<ScrollPlan> {
        surface.clear_marks();
        self.applied.clear();
        self.generation = self.generation.saturating_add(1);

        for range in &result.ranges {
            surface.add_mark(range);
            self.applied.push(range.clone());
        }

        let first = result.ranges.first()?;
        surface.set_caret(first.start);

        let line = result
            .context_anchor
            .map_or(first.start.line, |anchor| return anchor.line.min(first.start.line));
        return Some(ScrollPlan {
            line,
            margin: SCROLL_MARGIN_LINES,
            token: self.generation,
        });
    }

    /// The ranges currently marked, in apply order.
    pub fn applied(&self) -> &[TextRange] {
        return &self.applied;
    }
}

/// Runs deferred scrolls with retry and cancellation. A plan submitted
/// while an older one is still waiting silently replaces it — the stale
/// scroll never fires.
#[derive(Debug)]
pub struct ScrollScheduler {
    rx: Receiver<ScrollPlan>,
    tx: Sender<ScrollPlan>,
}

impl Default for ScrollScheduler {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        return Self { rx, tx };
    }
}

impl ScrollScheduler {
    /// A scheduler with no pending plan.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Queue a plan. Any plan still pending is superseded.
    pub fn submit(&self, plan: ScrollPlan) {
        let _ = self.tx.send(plan);
        return;
    }

    /// Drive the newest pending plan to completion: scroll once
    /// immediately, then reattempt after each retry delay to survive late
    /// layout shifts. A plan with a newer token arriving during a delay
    /// cancels the remaining reattempts of the old one and starts over;
    /// an out-of-order older token is dropped.
    pub fn run_pending(&self, surface: &mut dyn EditorSurface) {
        let mut current: Option<ScrollPlan> = None;
        while let Ok(plan) = self.rx.try_recv() {
            if current.is_none_or(|c| return plan.token >= c.token) {
                current = Some(plan);
            }
        }
        let Some(mut plan) = current else {
            return;
        };

        surface.scroll_to_line(plan.line, plan.margin);
        let mut attempt = 0_usize;
        while let Some(delay) = SCROLL_RETRY_DELAYS.get(attempt) {
            match self.rx.recv_timeout(*delay) {
                Ok(newer) if newer.token >= plan.token => {
                    plan = newer;
                    attempt = 0;
                    surface.scroll_to_line(plan.line, plan.margin);
                },
                Ok(_) | Err(RecvTimeoutError::Timeout) => {
                    surface.scroll_to_line(plan.line, plan.margin);
                    attempt = attempt.saturating_add(1);
                },
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
        return;
    }
}
