//! Recognizer adapters

mod process;

pub use process::{ProcessRecognizer, ACCESS_KEY_ENV, APP_ID_ENV};
