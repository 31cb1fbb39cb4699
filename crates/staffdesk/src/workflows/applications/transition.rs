//! Guard for status changes.
//!
//! Only two edges are forbidden: anything out of `Rejected`, and `Approved`
//! back to `Requested`. Every other pair, including re-applying the current
//! status and leaving `Cancelled`, is allowed.

use super::domain::ApplicationStatus;

pub fn transition_permitted(current: ApplicationStatus, requested: ApplicationStatus) -> bool {
    let rejected = current == ApplicationStatus::Rejected;
    let reopening_approved =
        current == ApplicationStatus::Approved && requested == ApplicationStatus::Requested;
    !(rejected || reopening_approved)
}
