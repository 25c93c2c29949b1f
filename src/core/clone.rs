//! Repeating an earlier booking.

use crate::{
    core::booking::{Booking, IdSequence},
    errors::Result,
};

/// Creates a repeat of `source`: same customer, item and payment, with a new
/// id, the current time and `is_clone` set.
///
/// Only those three fields are copied; identity and timestamp are always fresh.
///
/// # Errors
/// Returns [`Error::IdsExhausted`](crate::errors::Error::IdsExhausted) if no id is left.
pub fn clone_booking(source: &Booking, ids: &IdSequence) -> Result<Booking> {
    Ok(Booking::new(
        ids.allocate()?,
        source.name.clone(),
        source.order.clone(),
        source.payment.clone(),
        true,
    ))
}
