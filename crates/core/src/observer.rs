/// Receives solver events and optionally returns a control action.
///
/// Observers are how callers watch a solver as it runs, record its
/// progress, and steer it. Returning `None` lets the solver continue with
/// its default behavior.
///
/// `()` is the observer that ignores every event, and any
/// `FnMut(&E) -> Option<A>` closure is an observer.
pub trait Observer<E, A> {
    /// Observes an event and returns an action, if any.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Action {
        Stop,
    }

    fn drive<O: Observer<usize, Action>>(mut observer: O, events: usize) -> Option<usize> {
        (0..events).find(|event| observer.observe(event).is_some())
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), 10), None);
    }

    #[test]
    fn closure_observer_can_act() {
        let mut seen = Vec::new();
        let stop_at = drive(
            |event: &usize| {
                seen.push(*event);
                (*event == 3).then_some(Action::Stop)
            },
            10,
        );

        assert_eq!(stop_at, Some(3));
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
