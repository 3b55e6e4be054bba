// Presentation shell: terminal rendering of the form results and side panels.

pub mod panels;
pub mod shell;
