use core::fmt;

use colored::Colorize;

use crate::{
    object::{Object, Slot},
    value::Value,
};

// nested objects below this depth print as `[Object]`
const MAX_DEPTH: usize = 2;

/// Prints `obj` with colours, e.g. `{ width: 3, area: [Getter] }`.
pub fn pp_object(obj: &Object) {
    println!(";; => {obj}");
}

const fn accessor_label(get: bool, set: bool) -> &'static str {
    match (get, set) {
        (true, true) => "[Getter/Setter]",
        (true, false) => "[Getter]",
        (false, true) => "[Setter]",
        (false, false) => "[Accessor]",
    }
}

fn write_object(f: &mut fmt::Formatter, obj: &Object, depth: usize) -> fmt::Result {
    let entries = obj.entries();

    if entries.is_empty() {
        return write!(f, "{{}}");
    }

    write!(f, "{{ ")?;

    for (i, (key, desc)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }

        if f.alternate() {
            write!(f, "{key}: ")?;
        } else {
            write!(f, "{}: ", key.as_str().bold())?;
        }

        match &desc.slot {
            Slot::Data { value, .. } => write_nested(f, value, depth + 1)?,
            Slot::Accessor { get, set } => {
                let label = accessor_label(get.is_some(), set.is_some());
                if f.alternate() {
                    write!(f, "{label}")?;
                } else {
                    write!(f, "{}", label.magenta())?;
                }
            }
        }
    }

    write!(f, " }}")
}

// values inside an object or list: strings get quoted, depth is tracked
fn write_nested(f: &mut fmt::Formatter, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::String(s) if f.alternate() => write!(f, "'{s}'"),
        Value::String(s) => write!(f, "{}", format!("'{s}'").bright_green()),
        Value::Object(_) if depth > MAX_DEPTH => {
            if f.alternate() {
                write!(f, "[Object]")
            } else {
                write!(f, "{}", "[Object]".cyan())
            }
        }
        Value::Object(obj) => write_object(f, obj, depth),
        Value::List(list) => write_list(f, list, depth),
        other => fmt::Display::fmt(other, f),
    }
}

fn write_list(f: &mut fmt::Formatter, list: &im::Vector<Value>, depth: usize) -> fmt::Result {
    write!(f, "[")?;

    for (i, item) in list.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_nested(f, item, depth + 1)?;
    }

    write!(f, "]")
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_object(f, self, 0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            match self {
                Self::Nil => f.write_str("nil"),
                Self::Bool(b) => write!(f, "{b}"),
                Self::Int(int) => write!(f, "{int}"),
                Self::Float(float) => write!(f, "{float}"),
                Self::String(string) => write!(f, "{string}"),
                Self::List(list) => write_list(f, list, 0),
                Self::Object(obj) => write_object(f, obj, 0),
            }
        } else {
            match self {
                Self::Nil => write!(f, "{}", "nil".bold().blue()),
                Self::Bool(b) => write!(f, "{}", b.to_string().bright_blue()),
                Self::Int(int) => write!(f, "{}", int.to_string().cyan()),
                Self::Float(float) => write!(f, "{}", float.to_string().cyan()),
                Self::String(string) => write!(f, "{string}"),
                Self::List(list) => write_list(f, list, 0),
                Self::Object(obj) => write_object(f, obj, 0),
            }
        }
    }
}
