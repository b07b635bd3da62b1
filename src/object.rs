use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ecow::EcoString;
use fxhash::FxHashMap;

use crate::error::{PResult, PropErr};
use crate::value::Value;

pub use self::descriptor::{Getter, PropertyDescriptor, Setter, Slot};

mod descriptor;

pub type Key = EcoString;

struct Own {
    desc: PropertyDescriptor,
    // insertion stamp, keeps `keys` in definition order
    order: u64,
}

#[derive(Default)]
struct Inner {
    proto: Option<Object>,
    props: RefCell<FxHashMap<Key, Own>>,
    next: Cell<u64>,
}

/// Shared handle to a property table. Clones point at the same table.
#[derive(Clone, Default)]
pub struct Object(Rc<Inner>);

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:#}")
    }
}

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_proto(proto: Self) -> Self {
        Self(Rc::new(Inner {
            proto: Some(proto),
            ..Inner::default()
        }))
    }

    #[must_use]
    pub fn proto(&self) -> Option<Self> {
        self.0.proto.clone()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn next_order(&self) -> u64 {
        let order = self.0.next.get();
        self.0.next.set(order + 1);
        order
    }

    #[must_use]
    pub fn get_own_property_descriptor(&self, key: &str) -> Option<PropertyDescriptor> {
        self.0.props.borrow().get(key).map(|it| it.desc.clone())
    }

    /// Creates or replaces the own property `key`. A replaced property keeps
    /// its position in `keys`.
    pub fn define_property(
        &self,
        key: impl Into<Key>,
        desc: PropertyDescriptor,
    ) -> PResult<&Self> {
        let key = key.into();
        let mut props = self.0.props.borrow_mut();

        if let Some(own) = props.get_mut(&key) {
            if !own.desc.configurable {
                return Err(PropErr::NonConfigurable(key));
            }
            own.desc = desc;
        } else {
            let order = self.next_order();
            props.insert(key, Own { desc, order });
        }

        Ok(self)
    }

    /// Removes the own property `key`, returning its last descriptor.
    pub fn delete(&self, key: &str) -> PResult<Option<PropertyDescriptor>> {
        let mut props = self.0.props.borrow_mut();

        let configurable = match props.get(key) {
            None => return Ok(None),
            Some(own) => own.desc.configurable,
        };

        if !configurable {
            return Err(PropErr::NonConfigurable(key.into()));
        }

        Ok(props.remove(key).map(|it| it.desc))
    }

    fn lookup(&self, key: &str) -> Option<PropertyDescriptor> {
        // check own properties first,
        self.get_own_property_descriptor(key)
            // then delegate to the prototype
            .or_else(|| self.0.proto.as_ref().and_then(|it| it.lookup(key)))
    }

    /// Reads `key` through the prototype chain. Getters run with `self` as
    /// the receiver; a missing key or getter reads as `Nil`.
    pub fn get(&self, key: &str) -> PResult<Value> {
        match self.lookup(key).map(|it| it.slot) {
            Some(Slot::Data { value, .. }) => Ok(value),
            Some(Slot::Accessor {
                get: Some(getter), ..
            }) => getter(self, &[]),
            Some(Slot::Accessor { get: None, .. }) | None => Ok(Value::Nil),
        }
    }

    pub fn set(&self, key: impl Into<Key>, value: Value) -> PResult<()> {
        let key = key.into();

        match self.lookup(&key).map(|it| it.slot) {
            Some(Slot::Accessor {
                set: Some(setter), ..
            }) => setter(self, value),
            Some(Slot::Accessor { set: None, .. } | Slot::Data { writable: false, .. }) => {
                Err(PropErr::ReadOnly(key))
            }
            Some(Slot::Data { writable: true, .. }) | None => {
                self.put_own(key, value);
                Ok(())
            }
        }
    }

    // writes an own data property, keeping the flags of an existing one
    fn put_own(&self, key: Key, value: Value) {
        let mut props = self.0.props.borrow_mut();

        if let Some(Own {
            desc:
                PropertyDescriptor {
                    slot: Slot::Data { value: old, .. },
                    ..
                },
            ..
        }) = props.get_mut(&key)
        {
            *old = value;
            return;
        }

        let order = self.next_order();
        props.insert(
            key,
            Own {
                desc: PropertyDescriptor::data(value),
                order,
            },
        );
    }

    #[must_use]
    pub fn has_own(&self, key: &str) -> bool {
        self.0.props.borrow().contains_key(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.has_own(key) || self.0.proto.as_ref().is_some_and(|it| it.contains(key))
    }

    /// Own enumerable properties in definition order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Key, PropertyDescriptor)> {
        let mut own = self
            .0
            .props
            .borrow()
            .iter()
            .filter(|(_, it)| it.desc.enumerable)
            .map(|(k, it)| (it.order, k.clone(), it.desc.clone()))
            .collect::<Vec<_>>();

        own.sort_unstable_by_key(|(order, ..)| *order);
        own.into_iter().map(|(_, k, desc)| (k, desc)).collect()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.entries().into_iter().map(|(k, _)| k).collect()
    }
}
