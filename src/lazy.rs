//! Getters that run once per object and then turn into a plain value.
//!
//! [`lazy_getter`] wraps a getter so that its first successful call
//! replaces the property it was read through with a data property holding
//! the result. [`inject_lazy_getter`] installs such a getter on an object
//! directly, [`lazy_member`] rewrites a class member so every instance
//! caches its own result.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::class::Member;
use crate::error::{PResult, PropErr};
use crate::object::{Getter, Key, Object, PropertyDescriptor, Slot};
use crate::value::Value;


/// Wraps `getter` so that a successful call replaces the property `name`
/// on the receiver with its result. Arguments are passed through.
///
/// A failing `getter` leaves the receiver untouched, so the next read
/// tries again.
pub fn lazy_getter(name: impl Into<Key>, getter: Getter) -> Getter {
    let name = name.into();

    Rc::new(move |this: &Object, args: &[Value]| -> PResult<Value> {
        let value = getter(this, args).inspect_err(|err| {
            debug!(key = %name, %err, "lazy getter failed, keeping accessor");
        })?;

        this.delete(&name)?;
        this.define_property(name.clone(), PropertyDescriptor::data(value.clone()))?;

        trace!(key = %name, "lazy getter evaluated");
        Ok(value)
    })
}

/// Defines `name` on `target` as a configurable, enumerable accessor
/// without a setter, whose first successful read caches `getter`'s result
/// in place of the accessor.
///
/// Fails if `target` already owns a non-configurable `name`.
pub fn inject_lazy_getter<F>(target: &Object, name: impl Into<Key>, getter: F) -> PResult<&Object>
where
    F: Fn(&Object, &[Value]) -> PResult<Value> + 'static,
{
    let name = name.into();
    trace!(key = %name, "installing lazy getter");

    let getter = lazy_getter(name.clone(), Rc::new(getter));
    target.define_property(name, PropertyDescriptor::accessor(getter))
}

/// Rewrites `member`'s getter into a lazy one. Name and flags are kept,
/// no object is touched.
pub fn lazy_member(mut member: Member) -> PResult<Member> {
    let Slot::Accessor { get, .. } = &mut member.descriptor.slot else {
        return Err(PropErr::NoGetter(member.name));
    };

    let Some(getter) = get.take() else {
        return Err(PropErr::NoGetter(member.name));
    };

    *get = Some(lazy_getter(member.name.clone(), getter));
    Ok(member)
}
