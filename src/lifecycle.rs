//! Rescue operation status lifecycle and triage ordering.
//!
//! Status may move freely between `initiated`, `in-progress`, `completed` and
//! `failed`. The one rule enforced is on `end_time`: it is stamped the first
//! time the operation enters a terminal status and never re-stamped after
//! that, unless the caller supplies an explicit value.

use sea_orm::{
    sea_query::{CaseStatement, SimpleExpr},
    ColumnTrait, EntityTrait, Iterable, Order, QueryFilter, QueryOrder, Select,
};

use crate::entities::{
    enums::{OperationStatus, Priority},
    rescue_operation, RescueOperation,
};

/// Applies a status change and/or explicit end time to an operation.
pub fn transition(
    operation: &mut rescue_operation::Model,
    status: Option<OperationStatus>,
    end_time: Option<chrono::NaiveDateTime>,
    now: chrono::NaiveDateTime,
) {
    if let Some(status) = status {
        operation.status = status;
        if status.is_terminal() && operation.end_time.is_none() {
            operation.end_time = Some(now);
        }
    }

    if let Some(end_time) = end_time {
        operation.end_time = Some(end_time);
    }
}

/// End time for an operation that is being created.
///
/// An operation recorded directly as finished gets stamped like one that
/// finished later.
pub fn end_time_at_creation(
    status: OperationStatus,
    end_time: Option<chrono::NaiveDateTime>,
    now: chrono::NaiveDateTime,
) -> Option<chrono::NaiveDateTime> {
    end_time.or_else(|| status.is_terminal().then_some(now))
}

/// SQL expression mapping `priority` onto [`Priority::rank`].
///
/// Ordering on the raw column would be lexical, and `priority DESC` puts
/// `critical` last.
pub fn triage_rank() -> SimpleExpr {
    let lowest = Priority::iter().map(Priority::rank).max().unwrap_or(0);

    Priority::iter()
        .fold(CaseStatement::new(), |case, priority| {
            case.case(rescue_operation::Column::Priority.eq(priority), priority.rank())
        })
        .finally(lowest + 1)
        .into()
}

/// Every operation, most urgent first, newest start first within a priority.
pub fn triage_queue() -> Select<RescueOperation> {
    RescueOperation::find()
        .order_by(triage_rank(), Order::Asc)
        .order_by_desc(rescue_operation::Column::StartTime)
}

/// Operations still in the field, in triage order.
pub fn active_queue() -> Select<RescueOperation> {
    triage_queue()
        .filter(rescue_operation::Column::Status.is_in(OperationStatus::active()))
}

pub fn by_priority(priority: Priority) -> Select<RescueOperation> {
    RescueOperation::find()
        .filter(rescue_operation::Column::Priority.eq(priority))
        .order_by_desc(rescue_operation::Column::StartTime)
}
