use std::rc::Rc;

use crate::error::PResult;
use crate::object::Object;
use crate::value::Value;

/// Read half of an accessor. Receives the object the property was read
/// through and whatever arguments the caller passes along.
pub type Getter = Rc<dyn Fn(&Object, &[Value]) -> PResult<Value>>;

/// Write half of an accessor.
pub type Setter = Rc<dyn Fn(&Object, Value) -> PResult<()>>;

#[derive(Clone)]
pub enum Slot {
    Data { value: Value, writable: bool },
    Accessor {
        get: Option<Getter>,
        set: Option<Setter>,
    },
}

/// Everything an object knows about one of its own properties.
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub slot: Slot,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyDescriptor {
    /// writable, enumerable and configurable data property
    #[must_use]
    pub const fn data(value: Value) -> Self {
        Self {
            slot: Slot::Data {
                value,
                writable: true,
            },
            enumerable: true,
            configurable: true,
        }
    }

    /// enumerable, configurable accessor without a setter
    #[must_use]
    pub fn accessor(get: Getter) -> Self {
        Self {
            slot: Slot::Accessor {
                get: Some(get),
                set: None,
            },
            enumerable: true,
            configurable: true,
        }
    }

    #[must_use]
    pub fn with_setter(mut self, setter: Setter) -> Self {
        match &mut self.slot {
            Slot::Accessor { set, .. } => *set = Some(setter),
            Slot::Data { .. } => {
                self.slot = Slot::Accessor {
                    get: None,
                    set: Some(setter),
                };
            }
        }
        self
    }

    #[must_use]
    pub fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    #[must_use]
    pub fn with_configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }

    /// Has no effect on accessors.
    #[must_use]
    pub fn with_writable(mut self, writable: bool) -> Self {
        if let Slot::Data { writable: w, .. } = &mut self.slot {
            *w = writable;
        }
        self
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match &self.slot {
            Slot::Data { value, .. } => Some(value),
            Slot::Accessor { .. } => None,
        }
    }

    #[must_use]
    pub const fn getter(&self) -> Option<&Getter> {
        match &self.slot {
            Slot::Accessor { get, .. } => get.as_ref(),
            Slot::Data { .. } => None,
        }
    }

    #[must_use]
    pub const fn setter(&self) -> Option<&Setter> {
        match &self.slot {
            Slot::Accessor { set, .. } => set.as_ref(),
            Slot::Data { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_accessor(&self) -> bool {
        matches!(self.slot, Slot::Accessor { .. })
    }

    #[must_use]
    pub const fn writable(&self) -> bool {
        matches!(self.slot, Slot::Data { writable: true, .. })
    }
}

impl std::fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct(stringify!(PropertyDescriptor));

        match &self.slot {
            Slot::Data { value, writable } => {
                d.field("value", value).field("writable", writable);
            }
            Slot::Accessor { get, set } => {
                d.field("get", &get.as_ref().map(|_| "[Function]"))
                    .field("set", &set.as_ref().map(|_| "[Function]"));
            }
        }

        d.field("enumerable", &self.enumerable)
            .field("configurable", &self.configurable)
            .finish()
    }
}
