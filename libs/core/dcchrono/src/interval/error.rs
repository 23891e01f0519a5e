// -----------------------------------------------------------------------------
// IntervalError
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum IntervalError<T> {
    #[error("The finish {finish:?} precedes the start {start:?}")]
    FinishBeforeStart { start: T, finish: T },
    #[error("A single-point interval at {point:?} must include both ends or neither")]
    MixedDegenerate { point: T },
}
