use std::rc::Rc;

use crate::error::PResult;
use crate::lazy::lazy_member;
use crate::object::{Key, Object, PropertyDescriptor};
use crate::value::Value;

/// A named property description, applied by [`Class::member`].
#[derive(Clone, Debug)]
pub struct Member {
    pub name: Key,
    pub descriptor: PropertyDescriptor,
}

impl Member {
    #[must_use]
    pub fn new(name: impl Into<Key>, descriptor: PropertyDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    /// Read-only accessor member.
    pub fn getter<F>(name: impl Into<Key>, getter: F) -> Self
    where
        F: Fn(&Object, &[Value]) -> PResult<Value> + 'static,
    {
        Self::new(name, PropertyDescriptor::accessor(Rc::new(getter)))
    }
}

/// Members live on one prototype object shared by every instance.
#[derive(Debug)]
pub struct Class {
    name: Key,
    prototype: Object,
}

impl Class {
    #[must_use]
    pub fn new(name: impl Into<Key>) -> Self {
        Self {
            name: name.into(),
            prototype: Object::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn prototype(&self) -> &Object {
        &self.prototype
    }

    pub fn member(self, member: Member) -> PResult<Self> {
        self.prototype.define_property(member.name, member.descriptor)?;
        Ok(self)
    }

    /// Declares a getter that is evaluated once per instance.
    pub fn lazy<F>(self, name: impl Into<Key>, getter: F) -> PResult<Self>
    where
        F: Fn(&Object, &[Value]) -> PResult<Value> + 'static,
    {
        self.member(lazy_member(Member::getter(name, getter))?)
    }

    #[must_use]
    pub fn instantiate(&self) -> Object {
        Object::with_proto(self.prototype.clone())
    }

    /// Instance with its own data properties set from `fields`.
    pub fn instantiate_with<K, I>(&self, fields: I) -> PResult<Object>
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let instance = self.instantiate();

        for (key, value) in fields {
            instance.set(key, value)?;
        }

        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::PropErr;

    fn rect() -> Class {
        Class::new("Rect")
            .lazy("area", |this, _| {
                let w = this.get("w")?.as_int().unwrap_or_default();
                let h = this.get("h")?.as_int().unwrap_or_default();
                Ok(Value::Int(w * h))
            })
            .unwrap()
    }

    #[test]
    fn member_lives_on_prototype() {
        let class = rect();
        let desc = class.prototype().get_own_property_descriptor("area").unwrap();

        assert!(desc.getter().is_some());
        assert!(desc.value().is_none());
        assert_eq!(class.name(), "Rect");
    }

    #[test]
    fn each_instance_caches_its_own_value() {
        let class = rect();
        let a = class
            .instantiate_with([("w", Value::Int(2)), ("h", Value::Int(3))])
            .unwrap();
        let b = class
            .instantiate_with([("w", Value::Int(4)), ("h", Value::Int(5))])
            .unwrap();

        assert_eq!(a.get("area").unwrap(), Value::Int(6));
        assert_eq!(b.get("area").unwrap(), Value::Int(20));

        // cached on the instance, prototype keeps the accessor
        assert_eq!(
            a.get_own_property_descriptor("area").unwrap().value(),
            Some(&Value::Int(6))
        );
        assert!(class
            .prototype()
            .get_own_property_descriptor("area")
            .unwrap()
            .is_accessor());
        assert!(class.instantiate().get_own_property_descriptor("area").is_none());
    }

    #[test]
    fn cached_value_ignores_later_field_changes() {
        let class = rect();
        let r = class
            .instantiate_with([("w", Value::Int(2)), ("h", Value::Int(2))])
            .unwrap();

        assert_eq!(r.get("area").unwrap(), Value::Int(4));
        r.set("w", Value::Int(10)).unwrap();
        assert_eq!(r.get("area").unwrap(), Value::Int(4));
    }

    #[test]
    fn lazy_member_runs_once_per_instance() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);

        let class = Class::new("Counted")
            .lazy("id", move |_, _| {
                counter.set(counter.get() + 1);
                Ok(Value::Int(counter.get()))
            })
            .unwrap();

        let (a, b) = (class.instantiate(), class.instantiate());
        assert_eq!(calls.get(), 0);

        assert_eq!(a.get("id").unwrap(), Value::Int(1));
        assert_eq!(a.get("id").unwrap(), Value::Int(1));
        assert_eq!(b.get("id").unwrap(), Value::Int(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn failed_member_read_is_retried_per_instance() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);

        let class = Class::new("Flaky")
            .lazy("value", move |_, _| {
                counter.set(counter.get() + 1);
                if counter.get() == 1 {
                    Err(anyhow::anyhow!("not yet").into())
                } else {
                    Ok(Value::Int(counter.get()))
                }
            })
            .unwrap();

        let (a, b) = (class.instantiate(), class.instantiate());

        let err = a.get("value").unwrap_err();
        assert_eq!(err.to_string(), "not yet");
        assert!(a.get_own_property_descriptor("value").is_none());
        assert!(class
            .prototype()
            .get_own_property_descriptor("value")
            .unwrap()
            .is_accessor());

        assert_eq!(a.get("value").unwrap(), Value::Int(2));
        assert_eq!(
            a.get_own_property_descriptor("value").unwrap().value(),
            Some(&Value::Int(2))
        );
        assert!(b.get_own_property_descriptor("value").is_none());
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn lazy_member_keeps_name_and_flags() {
        let member = Member::new(
            "hidden",
            PropertyDescriptor::accessor(Rc::new(|_: &Object, _: &[Value]| -> PResult<Value> {
                Ok(Value::Nil)
            }))
            .with_enumerable(false),
        );

        let member = lazy_member(member).unwrap();

        assert_eq!(member.name.as_str(), "hidden");
        assert!(!member.descriptor.enumerable);
        assert!(member.descriptor.getter().is_some());
    }

    #[test]
    fn lazy_member_needs_a_getter() {
        let member = Member::new("plain", PropertyDescriptor::data(Value::Int(1)));

        assert!(matches!(lazy_member(member), Err(PropErr::NoGetter(k)) if k.as_str() == "plain"));
    }
}
