#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Properties that compute their value on first read and then keep it.
//!
//! ```
//! use lazy_getter::{inject_lazy_getter, Object, Value};
//!
//! let config = Object::new();
//! config.set("name", Value::from("demo")).unwrap();
//!
//! inject_lazy_getter(&config, "greeting", |this, _| {
//!     let name = this.get("name")?;
//!     Ok(Value::from(format!("hello {}", name.as_str().unwrap_or("?"))))
//! })
//! .unwrap();
//!
//! assert!(config.get_own_property_descriptor("greeting").unwrap().is_accessor());
//! assert_eq!(config.get("greeting").unwrap(), Value::from("hello demo"));
//! assert!(!config.get_own_property_descriptor("greeting").unwrap().is_accessor());
//! ```

pub mod binding;
pub mod class;
pub mod error;
pub mod lazy;
pub mod object;
pub mod print;
pub mod value;

pub use binding::{Binding, SyncBinding};
pub use class::{Class, Member};
pub use error::{PResult, PropErr};
pub use lazy::{inject_lazy_getter, lazy_getter, lazy_member};
pub use object::{Getter, Key, Object, PropertyDescriptor, Setter, Slot};
pub use print::pp_object;
pub use value::Value;
