//! Render output: overlay elements and page chrome

mod display;

pub use display::{
    DisplayItem, DisplayList, HostElement, PageChrome, FOOTER_CLASS, SPACER_CLASS,
};
