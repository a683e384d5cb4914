/// Control actions supported by the implicit solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver and return the last accepted state.
    StopEarly,
}
