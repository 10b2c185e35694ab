use crate::loader::Outcome;
use tracing::debug;

/// Per-view lifecycle state. Each view owns exactly one controller; nothing
/// is shared between resources.
///
/// Activations are numbered. An outcome is only installed when it presents
/// the token of the current activation, so a response that resolves after a
/// newer activation has started is discarded instead of clobbering fresher
/// state. Arrival order is not trusted.
#[derive(Debug)]
pub struct ViewController<T> {
    state: Outcome<T>,
    generation: u64,
}

impl<T> ViewController<T> {
    pub fn new() -> Self {
        Self {
            state: Outcome::Loading,
            generation: 0,
        }
    }

    /// Forces the view back to `Loading`, discarding any held data, and
    /// returns the token the eventual outcome must present.
    pub fn begin_activation(&mut self) -> u64 {
        self.generation += 1;
        self.state = Outcome::Loading;
        self.generation
    }

    /// Installs an outcome. Returns false (and leaves the state untouched)
    /// when the token belongs to a superseded activation.
    pub fn apply(&mut self, token: u64, outcome: Outcome<T>) -> bool {
        if token != self.generation {
            debug!(token, current = self.generation, "discarding stale outcome");
            return false;
        }
        self.state = outcome;
        true
    }

    pub fn state(&self) -> &Outcome<T> {
        &self.state
    }

    /// Mutable access to the held records, for the optimistic merge after a
    /// successful edit. None unless the view is `Ready`.
    pub fn records_mut(&mut self) -> Option<&mut Vec<T>> {
        match &mut self.state {
            Outcome::Ready(records) => Some(records),
            _ => None,
        }
    }
}

impl<T> Default for ViewController<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_loading_and_applies_current_outcome() {
        let mut controller = ViewController::new();
        assert_eq!(*controller.state(), Outcome::<u32>::Loading);

        let token = controller.begin_activation();
        assert!(controller.apply(token, Outcome::Ready(vec![1, 2])));
        assert_eq!(*controller.state(), Outcome::Ready(vec![1, 2]));
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let mut controller = ViewController::new();
        let stale = controller.begin_activation();
        let current = controller.begin_activation();

        assert!(!controller.apply(stale, Outcome::Ready(vec![1])));
        assert_eq!(*controller.state(), Outcome::<u32>::Loading);

        assert!(controller.apply(current, Outcome::Failed("HTTP error! status: 500".into())));
        assert_eq!(
            *controller.state(),
            Outcome::Failed("HTTP error! status: 500".to_string())
        );
    }

    #[test]
    fn reactivation_discards_prior_data() {
        let mut controller = ViewController::new();
        let token = controller.begin_activation();
        controller.apply(token, Outcome::Ready(vec![7]));

        controller.begin_activation();
        assert_eq!(*controller.state(), Outcome::<u32>::Loading);
        assert!(controller.records_mut().is_none());
    }

    #[test]
    fn late_outcome_after_newer_apply_is_ignored() {
        let mut controller = ViewController::new();
        let old = controller.begin_activation();
        let new = controller.begin_activation();
        controller.apply(new, Outcome::Ready(vec![2]));

        // The superseded fetch resolves afterwards; it must not win.
        assert!(!controller.apply(old, Outcome::Ready(vec![1])));
        assert_eq!(*controller.state(), Outcome::Ready(vec![2]));
    }
}
