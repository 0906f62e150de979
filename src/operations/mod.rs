mod align;
mod merge;

pub use align::are_direction_aligned;
pub use merge::{MergeParams, MergePlan, PlanMerge};
pub use crate::topology::MutationOp;
