/// Hard scores measure constraint violations, soft scores measure cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreLevel {
    Hard,
    Soft,
}
