//! # File Dialogs
//!
//! OS file pickers exposed to Ergo programs. Cancelling is a soft failure:
//! the program gets `null` back.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;
use crate::runtime::string::Str;
use crate::runtime::value::Value;

/// Native file picker provider
pub trait FileDialogs {
    fn open_file(&self, title: &str) -> Option<PathBuf>;
    fn save_file(&self, title: &str, suggested_name: &str) -> Option<PathBuf>;
}

thread_local! {
    static DIALOGS: RefCell<Option<Rc<dyn FileDialogs>>> = const { RefCell::new(None) };
}

pub fn set_dialogs(dialogs: Rc<dyn FileDialogs>) {
    DIALOGS.with(|d| *d.borrow_mut() = Some(dialogs));
}

fn dialogs() -> Option<Rc<dyn FileDialogs>> {
    DIALOGS.with(|d| d.borrow().clone())
}

fn path_value(path: Option<PathBuf>) -> Value {
    match path {
        Some(path) => Value::Str(Rc::new(Str::from_lit(&path.to_string_lossy()))),
        None => Value::Null,
    }
}

/// Ask the user for a file to open; `null` when cancelled or unavailable
pub fn open_file_dialog(title: &Value) -> Result<Value> {
    let title = title.try_as_str()?.to_string_lossy().into_owned();
    Ok(path_value(dialogs().and_then(|d| d.open_file(&title))))
}

/// Ask the user where to save; `null` when cancelled or unavailable
pub fn save_file_dialog(title: &Value, suggested_name: &Value) -> Result<Value> {
    let title = title.try_as_str()?.to_string_lossy().into_owned();
    let suggested = suggested_name.try_as_str()?.to_string_lossy().into_owned();
    Ok(path_value(dialogs().and_then(|d| d.save_file(&title, &suggested))))
}
