//! Explicit frame scheduler.
//!
//! Components that animate register with a [`Scheduler`]; each frame the
//! scheduler converts elapsed time into whole ticks, advances every
//! component in registration order, then draws those that report changes.
//! All mutations of a tick complete before any component draws.

mod frame_timing;

use std::cell::RefCell;
use std::rc::Rc;

pub use frame_timing::FrameTiming;

/// A component driven by the [`Scheduler`].
pub trait Tickable {
    /// Advance `steps` animation ticks.
    fn animate(&mut self, steps: u32);

    /// Whether anything changed since the last draw.
    fn needs_draw(&self) -> bool;

    /// Consume pending changes. Called only when [`Tickable::needs_draw`]
    /// returned true this frame.
    fn draw_frame(&mut self);
}

/// Shared handle to a registered component.
pub type TickableHandle = Rc<RefCell<dyn Tickable>>;

/// Owns the ordered list of tickables and the frame clock.
pub struct Scheduler {
    tickables: Vec<TickableHandle>,
    timing: FrameTiming,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tickables", &self.tickables.len())
            .field("timing", &self.timing)
            .finish()
    }
}

impl Scheduler {
    /// Empty scheduler releasing one tick per `ms_per_step` milliseconds.
    #[must_use]
    pub fn new(ms_per_step: f64) -> Self {
        Self {
            tickables: Vec::new(),
            timing: FrameTiming::new(ms_per_step),
        }
    }

    /// Append a component; it runs after those already registered.
    pub fn register(&mut self, tickable: TickableHandle) {
        self.tickables.push(tickable);
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickables.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickables.is_empty()
    }

    /// Frame clock.
    #[must_use]
    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    /// Run one frame against the wall clock. Returns the ticks advanced.
    pub fn frame(&mut self) -> u32 {
        let steps = self.timing.steps_due();
        let _ = self.run_steps(steps);
        steps
    }

    /// Advance every component `steps` ticks, then draw the changed ones.
    /// Returns how many components drew.
    pub fn run_steps(&mut self, steps: u32) -> usize {
        if steps > 0 {
            for tickable in &self.tickables {
                match tickable.try_borrow_mut() {
                    Ok(mut t) => t.animate(steps),
                    Err(_) => log::warn!("tickable busy; skipped a frame"),
                }
            }
        }
        let mut drawn = 0;
        for tickable in &self.tickables {
            if let Ok(mut t) = tickable.try_borrow_mut() {
                if t.needs_draw() {
                    t.draw_frame();
                    drawn += 1;
                }
            }
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        log: Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
        ticks: u32,
        dirty: bool,
    }

    impl Tickable for Counter {
        fn animate(&mut self, steps: u32) {
            self.ticks += steps;
            self.dirty = true;
            self.log.borrow_mut().push(self.name);
        }

        fn needs_draw(&self) -> bool {
            self.dirty
        }

        fn draw_frame(&mut self) {
            self.dirty = false;
        }
    }

    #[test]
    fn runs_in_registration_order_then_draws() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::new(RefCell::new(Counter {
            log: Rc::clone(&log),
            name: "first",
            ..Counter::default()
        }));
        let second = Rc::new(RefCell::new(Counter {
            log: Rc::clone(&log),
            name: "second",
            ..Counter::default()
        }));
        let mut scheduler = Scheduler::new(17.0);
        scheduler.register(first.clone());
        scheduler.register(second.clone());

        assert_eq!(scheduler.run_steps(3), 2);
        assert_eq!(*log.borrow(), ["first", "second"]);
        assert_eq!(first.borrow().ticks, 3);
        assert!(!second.borrow().dirty);

        assert_eq!(scheduler.run_steps(0), 0);
        assert_eq!(log.borrow().len(), 2);
    }
}
