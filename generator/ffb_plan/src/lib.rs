//! Binding plans: what the emitter serializes.
//!
//! Two planners, both pure functions over the resolved registry:
//!
//! - the accessor planner derives, per aggregate field, the accessor
//!   contract the generated artifact exposes (scalar get/set, indexed
//!   element access plus length-checked bulk replace for sequences, raw
//!   spans for embedded aggregates);
//! - the call-binding planner derives, per declared function, the
//!   ordered value layouts, the per-parameter marshalling strategy, and
//!   whether the generated call needs a call-scoped scratch region.
//!
//! Each function signature is planned independently; plans carry no
//! state and do not depend on planning order, so the driver is free to
//! plan interfaces in parallel.

mod accessor;
mod call;

pub use accessor::{plan_aggregate, AccessorKind, AccessorPlan, AggregatePlan};
pub use call::{
    plan_interface, CallBindingPlan, InterfacePlan, MarshalStrategy, PlannedParam, ReturnStrategy,
};
